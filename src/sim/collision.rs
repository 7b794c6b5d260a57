//! Collision and zone resolution
//!
//! Simple hazards end the run on box overlap. Zone obstacles only do so when
//! the actor overlaps them without having jumped enough times since entering
//! their horizontal span.

use glam::Vec2;

use super::actor::Actor;
use super::entities::{Obstacle, ObstacleKind};
use super::state::World;

/// The obstacle that ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crash {
    pub obstacle_id: u32,
    pub kind: ObstacleKind,
}

/// Result of one entity pass
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    /// Set when an obstacle was hit; the pass stops there
    pub crash: Option<Crash>,
    /// Centers of coins picked up (already removed from the world)
    pub collected: Vec<Vec2>,
}

/// Test one obstacle against the actor, updating zone tracking.
///
/// For zone obstacles, entry is recorded before the requirement check, so an
/// unmet requirement can fail on the very tick the zone is entered.
pub fn obstacle_contact(actor: &mut Actor, obstacle: &Obstacle) -> bool {
    let actor_box = actor.bounds();

    if !obstacle.kind.is_zone() {
        return actor_box.overlaps(&obstacle.bounds);
    }

    if actor_box.overlaps_horizontally(&obstacle.bounds) {
        if actor.enter_zone(obstacle.id) {
            log::debug!("Entered {} zone #{}", obstacle.kind.as_str(), obstacle.id);
        }
    } else if actor_box.left() > obstacle.bounds.right() && actor.exit_zone(obstacle.id) {
        log::debug!("Cleared {} zone #{}", obstacle.kind.as_str(), obstacle.id);
    }

    match actor.zone_jumps(obstacle.id) {
        Some(jumps) => actor_box.overlaps(&obstacle.bounds) && jumps < obstacle.required_jumps(),
        None => false,
    }
}

/// Scroll every entity by `speed * dt` and resolve contacts.
///
/// Iterates back to front so removal in place is safe. Obstacles go first;
/// a crash returns immediately.
pub fn resolve(world: &mut World, dt: f32) -> PassOutcome {
    let mut outcome = PassOutcome::default();
    let dx = world.speed * dt;

    for i in (0..world.obstacles.len()).rev() {
        world.obstacles[i].scroll(dx);
        let obstacle = &world.obstacles[i];

        if obstacle_contact(&mut world.actor, obstacle) {
            outcome.crash = Some(Crash {
                obstacle_id: obstacle.id,
                kind: obstacle.kind,
            });
            return outcome;
        }

        if obstacle.is_off_screen() {
            let id = obstacle.id;
            world.actor.exit_zone(id);
            world.obstacles.swap_remove(i);
        }
    }

    for i in (0..world.coins.len()).rev() {
        let coin = &mut world.coins[i];
        coin.update(dx, dt);
        if coin.touches(&world.actor) {
            outcome.collected.push(coin.center);
            world.coins.swap_remove(i);
        } else if coin.is_off_screen() {
            world.coins.swap_remove(i);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::JumpOutcome;
    use crate::sim::entities::Coin;
    use crate::sim::state::Viewport;

    const PRIMARY: f32 = 900.0;
    const SECONDARY: f32 = 1080.0;

    fn world(capacity: u8) -> World {
        let mut world = World::new(Actor::new(capacity), 300.0);
        world.set_viewport(Viewport::new(800.0, 400.0));
        world
    }

    fn mountain_at(world: &mut World, x: f32) -> Obstacle {
        let id = world.next_entity_id();
        Obstacle::new(id, ObstacleKind::Mountain, x, 120.0, 80.0, &world.actor)
    }

    /// Lift the actor above an obstacle and mark it airborne with its first
    /// charge already spent.
    fn hover_above(actor: &mut Actor, obstacle: &Obstacle) {
        actor.pos.y = obstacle.bounds.top() - actor.size.y - 10.0;
        actor.grounded = false;
        actor.charges = actor.capacity - 1;
    }

    #[test]
    fn test_simple_hazard_overlap() {
        let mut world = world(1);
        let id = world.next_entity_id();
        let cactus = Obstacle::new(id, ObstacleKind::Cactus, 60.0, 30.0, 60.0, &world.actor);
        assert!(obstacle_contact(&mut world.actor, &cactus));

        let far = Obstacle::new(id, ObstacleKind::Cactus, 400.0, 30.0, 60.0, &world.actor);
        assert!(!obstacle_contact(&mut world.actor, &far));
    }

    #[test]
    fn test_zone_without_jumps_collides() {
        let mut world = world(2);
        let mountain = mountain_at(&mut world, 60.0);
        // Grounded actor inside the span: entry and failure on the same tick
        assert!(obstacle_contact(&mut world.actor, &mountain));
        assert_eq!(world.actor.zone_jumps(mountain.id), Some(0));
    }

    #[test]
    fn test_zone_with_enough_jumps_is_safe_despite_overlap() {
        let mut world = world(3);
        let mut mountain = mountain_at(&mut world, 60.0);
        hover_above(&mut world.actor, &mountain);

        // Entered while above: no overlap yet
        assert!(!obstacle_contact(&mut world.actor, &mountain));
        assert!(world.actor.in_zone(mountain.id));

        assert_eq!(world.actor.jump(PRIMARY, SECONDARY), JumpOutcome::Secondary);
        assert_eq!(world.actor.jump(PRIMARY, SECONDARY), JumpOutcome::Secondary);
        assert_eq!(world.actor.zone_jumps(mountain.id), Some(2));

        // Drop into the mountain's box: earned passage
        world.actor.pos.y = mountain.bounds.top() + 5.0;
        assert!(world.actor.bounds().overlaps(&mountain.bounds));
        assert!(!obstacle_contact(&mut world.actor, &mountain));

        // Scroll fully past: zone cleared
        mountain.scroll(200.0);
        assert!(!obstacle_contact(&mut world.actor, &mountain));
        assert!(!world.actor.in_zone(mountain.id));
    }

    #[test]
    fn test_zone_with_too_few_jumps_collides_on_overlap() {
        let mut world = world(3);
        let mountain = mountain_at(&mut world, 60.0);
        hover_above(&mut world.actor, &mountain);
        assert!(!obstacle_contact(&mut world.actor, &mountain));

        world.actor.jump(PRIMARY, SECONDARY);
        world.actor.pos.y = mountain.bounds.top() + 5.0;
        assert!(obstacle_contact(&mut world.actor, &mountain));
    }

    #[test]
    fn test_jumps_before_entry_do_not_count() {
        let mut world = world(3);
        let mountain = mountain_at(&mut world, 300.0);
        world.actor.jump(PRIMARY, SECONDARY);
        world.actor.grounded = false;
        world.actor.jump(PRIMARY, SECONDARY);
        assert!(!obstacle_contact(&mut world.actor, &mountain));
        assert_eq!(world.actor.zone_jumps(mountain.id), None);
    }

    #[test]
    fn test_reentry_keeps_jump_count() {
        let mut world = world(3);
        let mountain = mountain_at(&mut world, 60.0);
        hover_above(&mut world.actor, &mountain);
        obstacle_contact(&mut world.actor, &mountain);
        world.actor.jump(PRIMARY, SECONDARY);
        obstacle_contact(&mut world.actor, &mountain);
        obstacle_contact(&mut world.actor, &mountain);
        assert_eq!(world.actor.zone_jumps(mountain.id), Some(1));
    }

    #[test]
    fn test_resolve_scrolls_and_removes_off_screen() {
        let mut world = world(1);
        let id = world.next_entity_id();
        let flower = Obstacle::new(id, ObstacleKind::Flower, -15.0, 20.0, 30.0, &world.actor);
        world.obstacles.push(flower);
        let outcome = resolve(&mut world, 0.1);
        assert!(outcome.crash.is_none());
        assert!(world.obstacles.is_empty());
    }

    #[test]
    fn test_resolve_reports_crash() {
        let mut world = world(1);
        let id = world.next_entity_id();
        world
            .obstacles
            .push(Obstacle::new(id, ObstacleKind::Cactus, 70.0, 30.0, 60.0, &world.actor));
        let outcome = resolve(&mut world, 0.0);
        assert_eq!(
            outcome.crash,
            Some(Crash {
                obstacle_id: id,
                kind: ObstacleKind::Cactus
            })
        );
    }

    #[test]
    fn test_coin_pickup_is_once_per_coin() {
        let mut world = world(1);
        let center = world.actor.bounds().center();
        let id = world.next_entity_id();
        world.coins.push(Coin::new(id, center, 1.0));

        let first = resolve(&mut world, 0.0);
        assert_eq!(first.collected.len(), 1);
        assert!(world.coins.is_empty());

        let second = resolve(&mut world, 0.0);
        assert!(second.collected.is_empty());
    }

    #[test]
    fn test_off_screen_zone_is_forgotten() {
        let mut world = world(2);
        let mut mountain = mountain_at(&mut world, -100.0);
        world.actor.enter_zone(mountain.id);
        mountain.bounds.min.x = -130.0;
        world.obstacles.push(mountain);
        resolve(&mut world, 0.0);
        assert!(world.obstacles.is_empty());
        assert!(world.actor.zones.is_empty());
    }
}
