//! Scripted jump decisions for the attract-mode demo and headless runs

use super::state::World;

/// Jumps over whatever is coming
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Seconds of travel ahead at which a grounded actor takes off
    pub lookahead: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { lookahead: 0.25 }
    }
}

impl Autopilot {
    pub fn new(lookahead: f32) -> Self {
        Self { lookahead }
    }

    /// Should a jump be issued this frame?
    pub fn decide(&self, world: &World) -> bool {
        let actor = &world.actor;
        let actor_box = actor.bounds();

        // Still owe jumps inside a zone: spend a charge on the way down
        let owes_zone = world.obstacles.iter().any(|o| {
            actor
                .zone_jumps(o.id)
                .is_some_and(|jumps| jumps < o.required_jumps())
        });
        if owes_zone && !actor.grounded && actor.vel_y > 0.0 && actor.charges > 0 {
            return true;
        }

        if !actor.grounded {
            return false;
        }

        let reach = world.speed * self.lookahead;
        world
            .obstacles
            .iter()
            .filter(|o| o.bounds.right() >= actor_box.left())
            .map(|o| o.bounds.left() - actor_box.right())
            .any(|gap| gap <= reach)
    }
}
