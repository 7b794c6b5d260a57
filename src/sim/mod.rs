//! Runner simulation module
//!
//! All gameplay logic lives here:
//! - Clamped delta-time stepping (variable or fixed)
//! - Seeded RNG for spawning
//! - Back-to-front entity iteration so in-place removal is safe
//! - No rendering or platform dependencies

pub mod actor;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod entities;
pub mod geometry;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actor::{Actor, JumpOutcome, ZoneTrack};
pub use autopilot::Autopilot;
pub use clock::{Clock, Stage};
pub use collision::{Crash, PassOutcome, obstacle_contact, resolve};
pub use entities::{Coin, Obstacle, ObstacleKind};
pub use geometry::{Aabb, circle_hits_box};
pub use spawner::{CoinPattern, Spawner, pick_coin_pattern, pick_obstacle_kind};
pub use state::{GameEvent, GamePhase, Session, Viewport, World};
pub use tick::{StepMode, step};
