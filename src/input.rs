//! Abstract input commands
//!
//! Device handling (keyboard, touch, mouse, window resize events) lives in
//! the host; it translates raw events into `Command`s and feeds them to the
//! session between frames.

use serde::{Deserialize, Serialize};

use crate::persistence::Profile;
use crate::sim::{GamePhase, JumpOutcome, Session};

/// A device-independent command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Jump,
    PauseToggle,
    Resize { width: f32, height: f32 },
    /// Start from idle, or restart after game over
    Start,
}

impl<P: Profile> Session<P> {
    /// Dispatch one command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Jump => {
                self.on_jump_command();
            }
            Command::PauseToggle => self.on_pause_toggle(),
            Command::Resize { width, height } => self.on_viewport_resize(width, height),
            Command::Start => match self.phase() {
                GamePhase::Idle | GamePhase::Over => self.start(),
                _ => log::debug!("Start ignored while {:?}", self.phase()),
            },
        }
    }

    pub fn on_jump_command(&mut self) -> JumpOutcome {
        self.jump()
    }

    pub fn on_pause_toggle(&mut self) {
        self.toggle_pause();
    }

    pub fn on_viewport_resize(&mut self, width: f32, height: f32) {
        self.resize(width, height);
    }
}
