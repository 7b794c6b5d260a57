//! Dino Dash - A side-scrolling runner with multi-charge jumps
//!
//! Core modules:
//! - `sim`: Simulation (clock, actor physics, spawner, collision, session)
//! - `game_loop`: Frame scheduling with cancellation
//! - `input`: Abstract commands from the input collaborator
//! - `render`: Pull-based snapshot for the presentation collaborator
//! - `persistence`: Profile/economy collaborator and local storage
//! - `platform`: Logger setup per target
//! - `tuning`: Data-driven game balance

pub mod game_loop;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod sim;
pub mod tuning;

pub use game_loop::{CancelToken, GameLoop, Schedule};
pub use input::Command;
pub use persistence::{MemoryProfile, Profile, ProfileData};
pub use render::{DrawInstance, FrameSnapshot, Hud};
pub use sim::{GameEvent, GamePhase, Session, Stage};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz) used by `StepMode::Fixed`
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Undrained events kept by a session before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 256;

    /// Reference viewport the scale factor is computed against
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 400.0;
    /// Upper bound on the uniform scale factor
    pub const MAX_SCALE: f32 = 1.5;
    /// Height of the ground strip below the actor's feet (pixels, unscaled)
    pub const GROUND_MARGIN: f32 = 20.0;

    /// Actor defaults (unscaled)
    pub const ACTOR_X: f32 = 50.0;
    pub const ACTOR_WIDTH: f32 = 40.0;
    pub const ACTOR_HEIGHT: f32 = 50.0;

    /// Jump capacity bounds (upgrade levels)
    pub const MIN_JUMP_CAPACITY: u8 = 1;
    pub const MAX_JUMP_CAPACITY: u8 = 4;

    /// Coin defaults (unscaled)
    pub const COIN_RADIUS: f32 = 12.0;
    /// Cosmetic spin, radians per second
    pub const COIN_SPIN: f32 = 3.0;
    pub const COIN_LINE_COUNT: usize = 5;
    pub const COIN_LINE_SPACING: f32 = 35.0;
    /// Single-coin height tiers above the actor's feet
    pub const COIN_TIERS: [f32; 3] = [15.0, 50.0, 80.0];
    /// Height of the reachable coin line above the actor's feet
    pub const COIN_LINE_HEIGHT: f32 = 50.0;
    /// Height of the elevated coin line (needs a second charge)
    pub const COIN_ELEVATED_HEIGHT: f32 = 100.0;

    /// Skin every profile owns
    pub const DEFAULT_SKIN: &str = "dino";
    /// Cosmetic flag for the gold mask
    pub const MASK_COSMETIC: &str = "mask";
}

/// Clamp a persisted jump capacity into the supported range.
///
/// Zero (missing/corrupt) becomes a single jump.
#[inline]
pub fn sanitize_capacity(raw: u8) -> u8 {
    raw.clamp(consts::MIN_JUMP_CAPACITY, consts::MAX_JUMP_CAPACITY)
}
