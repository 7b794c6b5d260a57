//! Frame scheduling with explicit cancellation
//!
//! The host (a browser animation-frame callback, a native event loop, or a
//! test) calls `GameLoop::frame` once per displayed frame and stops asking
//! for frames when it returns `Schedule::Stop`. Every run gets its own
//! `CancelToken`; a frame presented with a stale or cancelled token does
//! nothing, so stopping is synchronous and cancelling twice is harmless.

use std::cell::Cell;
use std::rc::Rc;

use crate::input::Command;
use crate::persistence::Profile;
use crate::sim::{GamePhase, Session};

/// Shared stop flag for one scheduled run
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    fn same_run(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Request another frame
    Continue,
    /// Stop requesting frames
    Stop,
}

/// Owns a session and the token of its current run
#[derive(Debug)]
pub struct GameLoop<P: Profile> {
    session: Session<P>,
    token: CancelToken,
}

impl<P: Profile> GameLoop<P> {
    pub fn new(session: Session<P>) -> Self {
        Self {
            session,
            token: CancelToken::new(),
        }
    }

    /// Token for the current run; hand it to the frame callback
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Cancel the current run. Later frames with its token are no-ops.
    pub fn cancel(&mut self) {
        if !self.token.is_cancelled() {
            log::debug!("Frame loop cancelled");
        }
        self.token.cancel();
    }

    /// One frame at wall-clock `now` (seconds)
    pub fn frame(&mut self, token: &CancelToken, now: f64) -> Schedule {
        if token.is_cancelled() || !token.same_run(&self.token) {
            return Schedule::Stop;
        }

        self.session.frame(now);

        match self.session.phase() {
            GamePhase::Running => Schedule::Continue,
            // Over: the final frame has been presented; a restart reschedules
            _ => {
                self.token.cancel();
                Schedule::Stop
            }
        }
    }

    /// Resume a paused run under a fresh token
    pub fn resume(&mut self) -> CancelToken {
        self.token.cancel();
        self.token = CancelToken::new();
        self.session.resume();
        self.token()
    }

    /// Start a new run. The previous run's token is cancelled first so a
    /// late callback from it cannot tick the new run.
    pub fn restart(&mut self) -> CancelToken {
        self.token.cancel();
        self.token = CancelToken::new();
        self.session.restart();
        self.token()
    }

    /// Dispatch a command and return the token frames should now carry.
    ///
    /// Commands that put the session back into `Running` (unpausing, starting
    /// after idle or game over) reschedule under a fresh token, since the
    /// previous one was cancelled when the run stopped.
    pub fn apply(&mut self, command: Command) -> CancelToken {
        match (command, self.session.phase()) {
            (Command::PauseToggle, GamePhase::Paused) => self.resume(),
            (Command::Start, GamePhase::Idle | GamePhase::Over) => self.restart(),
            _ => {
                self.session.apply(command);
                self.token()
            }
        }
    }

    /// Drive the loop at a fixed frame rate without a display.
    ///
    /// `before_frame` runs ahead of every frame (inputs, autopilot). Returns
    /// the number of frames presented.
    pub fn run_headless<F>(&mut self, start: f64, rate_hz: f64, duration: f64, mut before_frame: F) -> u64
    where
        F: FnMut(&mut Session<P>),
    {
        if rate_hz <= 0.0 || !rate_hz.is_finite() {
            log::warn!("Ignoring headless run at {} Hz", rate_hz);
            return 0;
        }

        let token = self.token();
        let frames = (duration * rate_hz).floor() as u64;
        let mut presented = 0;
        for i in 0..=frames {
            before_frame(&mut self.session);
            let now = start + i as f64 / rate_hz;
            presented += 1;
            if self.frame(&token, now) == Schedule::Stop {
                break;
            }
        }
        presented
    }

    #[inline]
    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session<P> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<P> {
        self.session
    }
}
