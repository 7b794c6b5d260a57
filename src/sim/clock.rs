//! Frame clock: clamped delta time, elapsed session time, difficulty stage

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Coarse difficulty tier derived from elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Early,
    Mid,
    Late,
}

impl Stage {
    /// Stage for an elapsed time given the early→mid and mid→late thresholds
    pub fn for_elapsed(elapsed: f32, thresholds: [f32; 2]) -> Self {
        if elapsed < thresholds[0] {
            Stage::Early
        } else if elapsed < thresholds[1] {
            Stage::Mid
        } else {
            Stage::Late
        }
    }

    /// Index into per-stage tuning tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Stage::Early => 0,
            Stage::Mid => 1,
            Stage::Late => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Early => "early",
            Stage::Mid => "mid",
            Stage::Late => "late",
        }
    }
}

/// Session clock.
///
/// `sample` turns frame timestamps (seconds) into a delta clamped to
/// `dt_cap`; `advance` adds a delta to elapsed time and recomputes the stage.
/// The first sample after construction, `reset` or `rebase` yields zero.
#[derive(Debug, Clone)]
pub struct Clock {
    last_timestamp: Option<f64>,
    elapsed: f32,
    stage: Stage,
    dt_cap: f32,
    thresholds: [f32; 2],
}

impl Clock {
    pub fn new(dt_cap: f32, thresholds: [f32; 2]) -> Self {
        Self {
            last_timestamp: None,
            elapsed: 0.0,
            stage: Stage::Early,
            dt_cap,
            thresholds,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.dt_cap, tuning.stage_thresholds)
    }

    /// Clamped delta since the previous timestamp.
    ///
    /// Timestamps that go backwards yield zero.
    pub fn sample(&mut self, now: f64) -> f32 {
        let dt = match self.last_timestamp {
            None => 0.0,
            Some(prev) => ((now - prev).max(0.0) as f32).min(self.dt_cap),
        };
        self.last_timestamp = Some(now);
        dt
    }

    /// Advance elapsed time by a (re-clamped) delta; returns the delta applied
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.dt_cap) } else { 0.0 };
        self.elapsed += dt;
        self.stage = Stage::for_elapsed(self.elapsed, self.thresholds);
        dt
    }

    /// `sample` followed by `advance`
    pub fn tick(&mut self, now: f64) -> f32 {
        let dt = self.sample(now);
        self.advance(dt)
    }

    /// Forget the previous timestamp so the next sample is zero (resume after pause)
    pub fn rebase(&mut self) {
        self.last_timestamp = None;
    }

    /// Back to zero elapsed time at the early stage
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.elapsed = 0.0;
        self.stage = Stage::Early;
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn dt_cap(&self) -> f32 {
        self.dt_cap
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = Clock::default();
        assert_eq!(clock.tick(1234.5), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = Clock::default();
        clock.tick(10.0);
        let dt = clock.tick(15.0);
        assert!((dt - 0.1).abs() < 1e-6);
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = Clock::default();
        clock.tick(10.0);
        assert_eq!(clock.tick(9.0), 0.0);
    }

    #[test]
    fn test_stage_thresholds() {
        let t = [20.0, 60.0];
        assert_eq!(Stage::for_elapsed(0.0, t), Stage::Early);
        assert_eq!(Stage::for_elapsed(19.99, t), Stage::Early);
        assert_eq!(Stage::for_elapsed(20.0, t), Stage::Mid);
        assert_eq!(Stage::for_elapsed(59.9, t), Stage::Mid);
        assert_eq!(Stage::for_elapsed(60.0, t), Stage::Late);
    }

    #[test]
    fn test_stage_follows_elapsed() {
        let mut clock = Clock::default();
        for _ in 0..250 {
            clock.advance(0.1);
        }
        assert_eq!(clock.stage(), Stage::Mid);
    }

    #[test]
    fn test_rebase_skips_pause_gap() {
        let mut clock = Clock::default();
        clock.tick(1.0);
        clock.tick(1.05);
        clock.rebase();
        assert_eq!(clock.tick(500.0), 0.0);
        assert!((clock.tick(500.02) - 0.02).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_tick_never_exceeds_cap(
            start in 0.0f64..1.0e6,
            gaps in proptest::collection::vec(0.0f64..1.0e4, 1..64),
        ) {
            let mut clock = Clock::default();
            clock.tick(start);
            let mut now = start;
            for gap in gaps {
                now += gap;
                let before = clock.elapsed();
                let dt = clock.tick(now);
                prop_assert!(dt <= clock.dt_cap());
                prop_assert!(dt >= 0.0);
                prop_assert!(clock.elapsed() - before <= clock.dt_cap() + 1e-3);
            }
        }
    }
}
