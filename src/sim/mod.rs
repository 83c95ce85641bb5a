//! Deterministic game simulation
//!
//! Everything gameplay-visible lives here: session state, the vehicle
//! controller, arena rules (belts, falls, crown), the trail raster, and the
//! fixed-step tick that sequences them. The renderer and input host sit
//! outside and talk to this module through [`GameState`] and [`TickInput`].

pub mod arena;
pub mod state;
pub mod tick;
pub mod trail;
pub mod vehicle;

pub use arena::{Arena, ConveyorBelt};
pub use state::{Car, CarId, GamePhase, GameState};
pub use tick::{tick, TickInput};
pub use trail::TrailRaster;
