//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. The
//! defaults reproduce the shipped game; a JSON document can override any
//! subset of fields.

use serde::{Deserialize, Serialize};

use crate::sim::{ObstacleKind, Stage};

/// Relative spawn weights for each obstacle category within one stage.
///
/// Weights are probabilities of a single roll in `[0, 1)`. If they sum to
/// less than 1 the remainder is a "nothing" outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleWeights {
    pub flower: f32,
    pub cactus: f32,
    pub mountain: f32,
    pub ridge: f32,
}

impl ObstacleWeights {
    pub const fn new(flower: f32, cactus: f32, mountain: f32, ridge: f32) -> Self {
        Self {
            flower,
            cactus,
            mountain,
            ridge,
        }
    }

    pub fn weight(&self, kind: ObstacleKind) -> f32 {
        match kind {
            ObstacleKind::Flower => self.flower,
            ObstacleKind::Cactus => self.cactus,
            ObstacleKind::Mountain => self.mountain,
            ObstacleKind::Ridge => self.ridge,
        }
    }

    fn clamped(self) -> Self {
        Self {
            flower: self.flower.max(0.0),
            cactus: self.cactus.max(0.0),
            mountain: self.mountain.max(0.0),
            ridge: self.ridge.max(0.0),
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor physics ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Upward speed of the first jump from the ground (pixels/s)
    pub primary_impulse: f32,
    /// Upward speed of each aerial jump (pixels/s), stronger than primary
    pub secondary_impulse: f32,

    // === Scrolling ===
    /// Scroll speed at session start (pixels/s)
    pub base_speed: f32,
    /// Scroll acceleration (pixels/s per second). Zero means constant speed.
    pub speed_ramp: f32,
    /// Scroll speed ceiling (pixels/s)
    pub max_speed: f32,
    /// Minimum obstacle gap, expressed in seconds of travel
    pub spacing_seconds: f32,

    // === Clock ===
    /// Largest delta a single tick may advance (seconds)
    pub dt_cap: f32,
    /// Elapsed-time thresholds for early→mid and mid→late
    pub stage_thresholds: [f32; 2],
    /// Score points per second of running
    pub score_rate: f32,

    // === Spawner ===
    /// Base coin interval per stage (early, mid, late)
    pub coin_interval: [f32; 3],
    /// Extra random coin delay, uniform in [0, jitter)
    pub coin_jitter: f32,
    /// Base obstacle interval per stage
    pub obstacle_interval: [f32; 3],
    /// Extra random obstacle delay, uniform in [0, jitter)
    pub obstacle_jitter: f32,
    /// Obstacle category weights per stage
    pub obstacle_weights: [ObstacleWeights; 3],
    /// Cooldown after a mountain / ridge spawn (seconds)
    pub zone_cooldowns: [f32; 2],
    /// Probability of a single coin
    pub coin_single_chance: f32,
    /// Probability of a reachable 5-coin line (the remainder is the elevated line)
    pub coin_line_chance: f32,

    // === Economy ===
    /// Grant each coin to the profile on pickup; otherwise grant the run total at game over
    pub grant_currency_on_pickup: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2160.0,
            primary_impulse: 900.0,
            secondary_impulse: 1080.0,

            base_speed: 300.0,
            speed_ramp: 3.0,
            max_speed: 720.0,
            spacing_seconds: 1.5,

            dt_cap: 0.1,
            stage_thresholds: [20.0, 60.0],
            score_rate: 10.0,

            coin_interval: [1.5, 1.2, 1.0],
            coin_jitter: 0.5,
            obstacle_interval: [1.5, 1.5, 1.5],
            obstacle_jitter: 0.3,
            obstacle_weights: [
                ObstacleWeights::new(0.6, 0.4, 0.0, 0.0),
                ObstacleWeights::new(0.3, 0.55, 0.1, 0.05),
                ObstacleWeights::new(0.2, 0.45, 0.2, 0.15),
            ],
            zone_cooldowns: [3.0, 5.0],
            coin_single_chance: 0.7,
            coin_line_chance: 0.25,

            grant_currency_on_pickup: true,
        }
    }
}

impl Tuning {
    /// Defaults with a non-accelerating scroll speed
    pub fn constant_speed() -> Self {
        Self {
            speed_ramp: 0.0,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document, then validate it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Minimum gap between obstacles at the given scroll speed
    pub fn min_spacing(&self, speed: f32) -> f32 {
        speed * self.spacing_seconds
    }

    pub fn coin_interval_for(&self, stage: Stage) -> f32 {
        self.coin_interval[stage.index()]
    }

    pub fn obstacle_interval_for(&self, stage: Stage) -> f32 {
        self.obstacle_interval[stage.index()]
    }

    pub fn weights_for(&self, stage: Stage) -> &ObstacleWeights {
        &self.obstacle_weights[stage.index()]
    }

    /// Cooldown applied after spawning `kind` (zero for simple hazards)
    pub fn cooldown_for(&self, kind: ObstacleKind) -> f32 {
        match kind {
            ObstacleKind::Mountain => self.zone_cooldowns[0],
            ObstacleKind::Ridge => self.zone_cooldowns[1],
            _ => 0.0,
        }
    }

    /// Repair nonsensical values, logging each fix. Never panics.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        // Non-finite values first, so the range checks below compare numbers
        self.gravity = finite_or("gravity", self.gravity, defaults.gravity);
        self.primary_impulse = finite_or("primary_impulse", self.primary_impulse, defaults.primary_impulse);
        self.secondary_impulse =
            finite_or("secondary_impulse", self.secondary_impulse, defaults.secondary_impulse);
        self.base_speed = finite_or("base_speed", self.base_speed, defaults.base_speed);
        self.speed_ramp = finite_or("speed_ramp", self.speed_ramp, defaults.speed_ramp);
        self.max_speed = finite_or("max_speed", self.max_speed, defaults.max_speed);
        self.spacing_seconds = finite_or("spacing_seconds", self.spacing_seconds, defaults.spacing_seconds);
        self.dt_cap = finite_or("dt_cap", self.dt_cap, defaults.dt_cap);
        self.score_rate = finite_or("score_rate", self.score_rate, defaults.score_rate);
        self.coin_jitter = finite_or("coin_jitter", self.coin_jitter, defaults.coin_jitter);
        self.obstacle_jitter = finite_or("obstacle_jitter", self.obstacle_jitter, defaults.obstacle_jitter);
        self.coin_single_chance =
            finite_or("coin_single_chance", self.coin_single_chance, defaults.coin_single_chance);
        self.coin_line_chance = finite_or("coin_line_chance", self.coin_line_chance, defaults.coin_line_chance);
        for (value, default) in self.stage_thresholds.iter_mut().zip(defaults.stage_thresholds) {
            *value = finite_or("stage_thresholds", *value, default);
        }
        for (value, default) in self.zone_cooldowns.iter_mut().zip(defaults.zone_cooldowns) {
            *value = finite_or("zone_cooldowns", *value, default);
        }
        for (weights, default) in self.obstacle_weights.iter_mut().zip(defaults.obstacle_weights) {
            if ObstacleKind::ALL.iter().any(|&kind| !weights.weight(kind).is_finite()) {
                log::warn!("tuning: non-finite obstacle weights, using defaults for that stage");
                *weights = default;
            }
        }

        if self.dt_cap <= 0.0 {
            log::warn!("tuning: dt_cap {} invalid, using {}", self.dt_cap, defaults.dt_cap);
            self.dt_cap = defaults.dt_cap;
        }
        if self.gravity <= 0.0 {
            log::warn!("tuning: gravity {} invalid, using {}", self.gravity, defaults.gravity);
            self.gravity = defaults.gravity;
        }
        if self.secondary_impulse < self.primary_impulse {
            log::warn!(
                "tuning: secondary impulse {} weaker than primary {}",
                self.secondary_impulse,
                self.primary_impulse
            );
        }
        if self.base_speed < 0.0 {
            log::warn!("tuning: negative base_speed, using {}", defaults.base_speed);
            self.base_speed = defaults.base_speed;
        }
        if self.max_speed < self.base_speed {
            log::warn!("tuning: max_speed below base_speed, raising to {}", self.base_speed);
            self.max_speed = self.base_speed;
        }
        if self.speed_ramp < 0.0 {
            log::warn!("tuning: negative speed_ramp clamped to 0");
            self.speed_ramp = 0.0;
        }
        if self.stage_thresholds[1] < self.stage_thresholds[0] {
            log::warn!("tuning: stage thresholds out of order, swapping");
            self.stage_thresholds.swap(0, 1);
        }

        for interval in self
            .coin_interval
            .iter_mut()
            .chain(self.obstacle_interval.iter_mut())
        {
            if !interval.is_finite() || *interval <= 0.0 {
                log::warn!("tuning: spawn interval {} invalid, using 1.0", interval);
                *interval = 1.0;
            }
        }
        self.coin_jitter = self.coin_jitter.max(0.0);
        self.obstacle_jitter = self.obstacle_jitter.max(0.0);
        self.spacing_seconds = self.spacing_seconds.max(0.0);
        self.zone_cooldowns = self.zone_cooldowns.map(|c| c.max(0.0));
        self.obstacle_weights = self.obstacle_weights.map(ObstacleWeights::clamped);
        self.coin_single_chance = self.coin_single_chance.clamp(0.0, 1.0);
        self.coin_line_chance = self.coin_line_chance.clamp(0.0, 1.0 - self.coin_single_chance);

        self
    }
}

/// `value` if finite, else `default` with a warning
fn finite_or(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("tuning: {} is {}, using {}", name, value, default);
        default
    }
}
