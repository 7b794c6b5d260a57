//! Session state and the start/pause/over state machine
//!
//! The session exclusively owns the actor and every live entity. Nothing is
//! stored at module level; callers own the `Session` value.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, JumpOutcome};
use super::clock::{Clock, Stage};
use super::collision::Crash;
use super::entities::{Coin, Obstacle};
use super::spawner::Spawner;
use super::tick::{self, StepMode};
use crate::consts::*;
use crate::persistence::Profile;
use crate::sanitize_capacity;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    Idle,
    /// Ticking
    Running,
    /// Suspended between ticks
    Paused,
    /// Run ended; only a restart leaves this phase
    Over,
}

/// Discrete notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { jump_capacity: u8 },
    Jumped { secondary: bool },
    Landed,
    CoinCollected { pos: Vec2, run_total: u32 },
    PauseEntered,
    Resumed,
    NewRecord { score: u64 },
    GameOver { score: u64, coins: u32 },
}

/// Drawing surface dimensions and the derived uniform scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let scale = (width / REFERENCE_WIDTH)
            .min(height / REFERENCE_HEIGHT)
            .min(MAX_SCALE);
        Self {
            width,
            height,
            scale,
        }
    }

    /// Zero-sized placeholder used until the first valid resize
    pub const fn unset() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scale: 0.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.scale > 0.0
    }

    /// Top of an actor of the given unscaled height standing on the ground
    pub fn ground_y(&self, actor_height: f32) -> f32 {
        self.height - actor_height * self.scale - GROUND_MARGIN
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::unset()
    }
}

/// Everything that moves: actor, obstacles, coins, scroll speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub viewport: Viewport,
    pub actor: Actor,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    /// Current scroll speed (pixels/s)
    pub speed: f32,
    next_id: u32,
}

impl World {
    pub fn new(actor: Actor, speed: f32) -> Self {
        Self {
            viewport: Viewport::unset(),
            actor,
            obstacles: Vec::new(),
            coins: Vec::new(),
            speed,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Right edge of the rightmost obstacle
    pub fn rightmost_obstacle_edge(&self) -> Option<f32> {
        self.obstacles
            .iter()
            .map(|o| o.bounds.right())
            .reduce(f32::max)
    }

    /// Apply a viewport; an invalid one is stored but leaves the actor alone
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if viewport.is_valid() {
            self.actor.place(&viewport);
        }
    }
}

/// A play session against a profile collaborator
#[derive(Debug)]
pub struct Session<P: Profile> {
    pub(crate) phase: GamePhase,
    pub(crate) tuning: Tuning,
    pub(crate) clock: Clock,
    pub(crate) spawner: Spawner,
    pub(crate) world: World,
    pub(crate) score: f32,
    /// Coins picked up this run
    pub(crate) run_coins: u32,
    pub(crate) step_mode: StepMode,
    pub(crate) accumulator: f32,
    /// Pending events, oldest dropped past `MAX_PENDING_EVENTS`
    pub(crate) events: VecDeque<GameEvent>,
    pub(crate) profile: P,
}

impl<P: Profile> Session<P> {
    /// Create an idle session. Nothing ticks until `start`.
    pub fn new(profile: P, tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.validated();
        let capacity = sanitize_capacity(profile.jump_capacity());
        Self {
            phase: GamePhase::Idle,
            clock: Clock::from_tuning(&tuning),
            spawner: Spawner::new(seed),
            world: World::new(Actor::new(capacity), tuning.base_speed),
            score: 0.0,
            run_coins: 0,
            step_mode: StepMode::Variable,
            accumulator: 0.0,
            events: VecDeque::new(),
            profile,
            tuning,
        }
    }

    /// Builder-style stepping mode selection
    pub fn with_step_mode(mut self, mode: StepMode) -> Self {
        self.step_mode = mode;
        self
    }

    /// Start (or restart) a run from scratch.
    ///
    /// Jump capacity and cosmetics are re-read from the profile, since
    /// upgrades may have been bought between runs.
    pub fn start(&mut self) {
        let raw_capacity = self.profile.jump_capacity();
        let capacity = sanitize_capacity(raw_capacity);
        if capacity != raw_capacity {
            log::warn!("Persisted jump capacity {} out of range, using {}", raw_capacity, capacity);
        }

        let mut actor = Actor::new(capacity);
        actor.skin = self.profile.selected_skin();
        actor.has_mask = self.profile.has_cosmetic(MASK_COSMETIC);

        let viewport = self.world.viewport;
        self.world = World::new(actor, self.tuning.base_speed);
        self.world.set_viewport(viewport);

        self.clock.reset();
        self.spawner.reset();
        self.score = 0.0;
        self.run_coins = 0;
        self.accumulator = 0.0;
        self.phase = GamePhase::Running;
        self.emit(GameEvent::Started {
            jump_capacity: capacity,
        });
        log::info!(
            "Run started: capacity={} skin={} viewport={}x{}",
            capacity,
            self.world.actor.skin,
            viewport.width,
            viewport.height
        );
    }

    /// Alias for `start`, valid from any phase
    pub fn restart(&mut self) {
        self.start();
    }

    /// Running → Paused. Takes effect between ticks.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.emit(GameEvent::PauseEntered);
        log::info!("Paused at {:.2}s", self.clock.elapsed());
        true
    }

    /// Paused → Running. The pause gap is not counted as elapsed time.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.clock.rebase();
        self.accumulator = 0.0;
        self.phase = GamePhase::Running;
        self.emit(GameEvent::Resumed);
        log::info!("Resumed at {:.2}s", self.clock.elapsed());
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Jump command; ignored unless running
    pub fn jump(&mut self) -> JumpOutcome {
        if self.phase != GamePhase::Running {
            return JumpOutcome::Denied;
        }
        let outcome = self
            .world
            .actor
            .jump(self.tuning.primary_impulse, self.tuning.secondary_impulse);
        if outcome != JumpOutcome::Denied {
            self.emit(GameEvent::Jumped {
                secondary: outcome == JumpOutcome::Secondary,
            });
        }
        outcome
    }

    /// Recompute scale and ground baseline. Invalid sizes suspend ticking.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            log::warn!("Ignoring invalid viewport {}x{}; simulation suspended", width, height);
        }
        self.world.set_viewport(viewport);
    }

    /// Frame callback with a wall-clock timestamp (seconds)
    pub fn frame(&mut self, now: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        if !self.world.viewport.is_valid() {
            self.clock.rebase();
            return;
        }

        let dt = self.clock.sample(now);
        match self.step_mode {
            StepMode::Variable => tick::step(self, dt),
            StepMode::Fixed => {
                self.accumulator += dt;
                let mut substeps = 0;
                while self.accumulator >= SIM_DT
                    && substeps < MAX_SUBSTEPS
                    && self.phase == GamePhase::Running
                {
                    tick::step(self, SIM_DT);
                    self.accumulator -= SIM_DT;
                    substeps += 1;
                }
            }
        }
    }

    /// Advance by an explicit delta, bypassing the timestamp clock
    pub fn step(&mut self, dt: f32) {
        tick::step(self, dt);
    }

    pub(crate) fn collect_coin(&mut self, pos: Vec2) {
        self.run_coins += 1;
        if self.tuning.grant_currency_on_pickup {
            self.profile.add_currency(1);
        }
        self.emit(GameEvent::CoinCollected {
            pos,
            run_total: self.run_coins,
        });
    }

    /// Enter `Over` and report to the profile. Runs once per run.
    pub(crate) fn end_run(&mut self, crash: Crash) {
        if self.phase == GamePhase::Over {
            return;
        }
        self.phase = GamePhase::Over;
        let final_score = self.score_points();

        if !self.tuning.grant_currency_on_pickup && self.run_coins > 0 {
            self.profile.add_currency(i64::from(self.run_coins));
        }
        let record = self.profile.report_score_if_record(final_score);
        if record {
            self.emit(GameEvent::NewRecord { score: final_score });
        }
        self.emit(GameEvent::GameOver {
            score: final_score,
            coins: self.run_coins,
        });
        log::info!(
            "Game over: hit {} #{} at {:.2}s, score={} coins={} record={}",
            crash.kind.as_str(),
            crash.obstacle_id,
            self.clock.elapsed(),
            final_score,
            self.run_coins,
            record
        );
    }

    /// Queue an event for the presentation layer
    pub(crate) fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Raw accumulated score
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Score as whole points
    pub fn score_points(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    #[inline]
    pub fn run_coins(&self) -> u32 {
        self.run_coins
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.clock.stage()
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[inline]
    pub fn profile(&self) -> &P {
        &self.profile
    }

    #[inline]
    pub fn profile_mut(&mut self) -> &mut P {
        &mut self.profile
    }

    /// Give the profile back, ending the session
    pub fn into_profile(self) -> P {
        self.profile
    }
}
