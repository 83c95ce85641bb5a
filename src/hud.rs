//! HUD text surfaces
//!
//! Plain text sinks the core writes to: per-player coordinate readout, speed
//! in km/h, and score. Sinks are only written when the text actually changes,
//! so a DOM-backed sink does not thrash layout every frame.

use glam::Vec3;

use crate::consts::PLATFORM_TOP_Y;

/// Something that can display a line of text (DOM element, terminal, buffer)
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// Test/headless sink that just stores the last string
#[derive(Debug, Default)]
pub struct StringSink(pub String);

impl TextSink for StringSink {
    fn set_text(&mut self, text: &str) {
        self.0 = text.to_string();
    }
}

/// Coordinate readout. Y is reported relative to the platform surface.
pub fn format_coords(pos: Vec3) -> String {
    format!(
        "X: {:.2}  Y: {:.2}  Z: {:.2}",
        pos.x,
        pos.y - PLATFORM_TOP_Y,
        pos.z
    )
}

/// Speed readout: m/s converted to whole km/h
pub fn format_speed_kmh(speed_mps: f32) -> String {
    format!("{:.0} km/h", speed_mps * 3.6)
}

/// One player's HUD surfaces with change detection
pub struct PlayerHud {
    coords: Box<dyn TextSink>,
    speed: Box<dyn TextSink>,
    score: Box<dyn TextSink>,
    last_coords: String,
    last_speed: String,
    last_score: String,
}

impl PlayerHud {
    pub fn new(coords: Box<dyn TextSink>, speed: Box<dyn TextSink>, score: Box<dyn TextSink>) -> Self {
        Self {
            coords,
            speed,
            score,
            last_coords: String::new(),
            last_speed: String::new(),
            last_score: String::new(),
        }
    }

    pub fn update(&mut self, pos: Vec3, speed_mps: f32, score: u32) {
        let coords = format_coords(pos);
        if coords != self.last_coords {
            self.coords.set_text(&coords);
            self.last_coords = coords;
        }

        let speed = format_speed_kmh(speed_mps);
        if speed != self.last_speed {
            self.speed.set_text(&speed);
            self.last_speed = speed;
        }

        let score = score.to_string();
        if score != self.last_score {
            self.score.set_text(&score);
            self.last_score = score;
        }
    }
}
