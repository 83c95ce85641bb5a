//! Wheel trail raster
//!
//! A square RGBA raster the ground shader samples as the platform's top
//! texture. Wheels near the surface stamp dark tracks into it; every paint
//! pass first fades the whole raster a small step back toward the base sand
//! color, so old tracks dissolve as new ones are laid down.

use glam::{Vec2, Vec3};

use crate::consts::*;
use crate::world_to_uv;

const TRACK_COLOR: [u8; 3] = [120, 100, 60];
const TRACK_ALPHA: f32 = 0.85;

pub struct TrailRaster {
    size: usize,
    pixels: Vec<[u8; 4]>,
    base: Vec<[u8; 4]>,
}

impl TrailRaster {
    pub fn new(size: usize) -> Self {
        let base = sand_base(size);
        Self {
            size,
            pixels: base.clone(),
            base,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.size + x]
    }

    /// One fade step: every pixel moves a small fraction toward the base.
    /// The step is at least one unit so quantization never strands a pixel
    /// partway.
    pub fn fade(&mut self) {
        for (px, base) in self.pixels.iter_mut().zip(&self.base) {
            for c in 0..4 {
                let diff = base[c] as f32 - px[c] as f32;
                if diff == 0.0 {
                    continue;
                }
                let step = (diff * TRAIL_FADE_ALPHA).abs().max(1.0).min(diff.abs());
                px[c] = (px[c] as f32 + step.copysign(diff)) as u8;
            }
        }
    }

    /// Stamp a filled track circle at a UV coordinate
    pub fn stamp(&mut self, uv: Vec2) {
        let cx = (uv.x * self.size as f32) as i32;
        let cy = (uv.y * self.size as f32) as i32;
        let r = TRAIL_STAMP_RADIUS;

        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
                    continue;
                }
                let px = &mut self.pixels[y as usize * self.size + x as usize];
                for c in 0..3 {
                    let cur = px[c] as f32;
                    px[c] = (cur + (TRACK_COLOR[c] as f32 - cur) * TRACK_ALPHA).round() as u8;
                }
            }
        }
    }

    /// Paint a wheel contact if the wheel is near the platform surface and
    /// inside the platform disc. Airborne wheels and wheels hanging past the
    /// rim leave no mark.
    pub fn paint_wheel(&mut self, wheel_world: Vec3, platform_radius: f32) {
        if (wheel_world.y - PLATFORM_TOP_Y).abs() > WHEEL_GROUND_BAND {
            return;
        }
        if Vec2::new(wheel_world.x, wheel_world.z).length() > platform_radius {
            return;
        }
        let uv = world_to_uv(wheel_world.x, wheel_world.z, platform_radius);
        self.stamp(uv);
    }
}

/// Procedural sand base: flat warm tone with a mild per-pixel jitter so the
/// faded raster never looks like a solid fill.
fn sand_base(size: usize) -> Vec<[u8; 4]> {
    let mut base = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            // Cheap deterministic hash jitter, +/- 6 per channel
            let h = (x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17))) % 13;
            let j = h as i16 - 6;
            base.push([
                (214 + j).clamp(0, 255) as u8,
                (188 + j).clamp(0, 255) as u8,
                (140 + j).clamp(0, 255) as u8,
                255,
            ]);
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_stamp_darkens_center() {
        let mut trail = TrailRaster::new(64);
        let before = trail.pixel(32, 32);
        trail.stamp(Vec2::new(0.5, 0.5));
        let after = trail.pixel(32, 32);
        assert!(after[0] < before[0]);
        assert!(after[2] < before[2]);
    }

    #[test]
    fn test_stamp_respects_radius() {
        let mut trail = TrailRaster::new(64);
        let outside = (32 + TRAIL_STAMP_RADIUS + 2) as usize;
        let far = trail.pixel(outside, 32);
        trail.stamp(Vec2::new(0.5, 0.5));
        assert_eq!(trail.pixel(outside, 32), far);
    }

    #[test]
    fn test_stamp_near_edge_does_not_panic() {
        let mut trail = TrailRaster::new(64);
        trail.stamp(Vec2::new(0.0, 0.0));
        trail.stamp(Vec2::new(1.0, 1.0));
        trail.stamp(Vec2::new(-0.1, 0.5));
    }

    #[test]
    fn test_fade_converges_to_base() {
        let mut trail = TrailRaster::new(16);
        let base = trail.pixel(8, 8);
        trail.stamp(Vec2::new(0.5, 0.5));
        assert_ne!(trail.pixel(8, 8), base);
        for _ in 0..2000 {
            trail.fade();
        }
        let faded = trail.pixel(8, 8);
        for c in 0..3 {
            assert!((faded[c] as i16 - base[c] as i16).abs() <= 1);
        }
    }

    #[test]
    fn test_airborne_wheel_leaves_no_mark() {
        let mut trail = TrailRaster::new(64);
        let before = trail.pixel(32, 32);
        trail.paint_wheel(
            Vec3::new(0.0, PLATFORM_TOP_Y + WHEEL_GROUND_BAND + 1.0, 0.0),
            PLATFORM_RADIUS,
        );
        assert_eq!(trail.pixel(32, 32), before);
    }

    #[test]
    fn test_wheel_past_rim_leaves_no_mark() {
        let mut trail = TrailRaster::new(64);
        let snapshot: Vec<_> = (0..64).map(|x| trail.pixel(x, 32)).collect();
        trail.paint_wheel(
            Vec3::new(PLATFORM_RADIUS + 2.0, PLATFORM_TOP_Y, 0.0),
            PLATFORM_RADIUS,
        );
        let after: Vec<_> = (0..64).map(|x| trail.pixel(x, 32)).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_grounded_wheel_marks_at_uv() {
        let mut trail = TrailRaster::new(64);
        // World origin maps to the raster center
        trail.paint_wheel(Vec3::new(0.0, PLATFORM_TOP_Y, 0.0), PLATFORM_RADIUS);
        let center = trail.pixel(32, 32);
        assert!(center[0] < 214);
    }
}
