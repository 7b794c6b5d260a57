//! One simulation tick
//!
//! Order: clock → scroll speed → actor physics → spawner → entity pass
//! (may end the run) → score accrual.

use serde::{Deserialize, Serialize};

use super::collision;
use super::state::{GameEvent, GamePhase, Session};
use crate::persistence::Profile;

/// How frame deltas are turned into simulation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepMode {
    /// One step per frame with the clamped frame delta
    #[default]
    Variable,
    /// Accumulate frame deltas and step in `SIM_DT` increments
    Fixed,
}

/// Advance a running session by `dt` seconds.
///
/// No-op unless running with a valid viewport. `dt` is clamped by the clock.
pub fn step<P: Profile>(session: &mut Session<P>, dt: f32) {
    if session.phase != GamePhase::Running || !session.world.viewport.is_valid() {
        return;
    }

    let dt = session.clock.advance(dt);
    let stage = session.clock.stage();
    let tuning = &session.tuning;
    let world = &mut session.world;

    world.speed = (world.speed + tuning.speed_ramp * dt).min(tuning.max_speed);

    let landed = world.actor.update(dt, tuning.gravity);

    session.spawner.update(dt, stage, tuning, world);

    let outcome = collision::resolve(world, dt);
    if landed {
        session.emit(GameEvent::Landed);
    }
    for pos in outcome.collected {
        session.collect_coin(pos);
    }
    if let Some(crash) = outcome.crash {
        session.end_run(crash);
        return;
    }

    session.score += session.tuning.score_rate * dt;
}
