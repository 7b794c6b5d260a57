//! Stochastic obstacle and coin spawning with difficulty progression
//!
//! Two independent countdown timers (obstacles, coins) plus per-category
//! cooldowns for the zone obstacles. Everything counts down by simulation
//! delta time, so cadence does not depend on frame rate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::Stage;
use super::entities::{Coin, Obstacle, ObstacleKind};
use super::state::World;
use crate::consts::*;
use crate::tuning::{ObstacleWeights, Tuning};

/// Coin formations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinPattern {
    /// One coin at height tier 0..3
    Single,
    /// Five coins at single-jump height
    Line,
    /// Five coins that need a second charge to reach
    ElevatedLine,
}

/// Choose a coin pattern from a roll in `[0, 1)`.
///
/// The elevated line falls back to the reachable line when the actor has a
/// single charge.
pub fn pick_coin_pattern(roll: f32, capacity: u8, tuning: &Tuning) -> CoinPattern {
    if roll < tuning.coin_single_chance {
        CoinPattern::Single
    } else if roll < tuning.coin_single_chance + tuning.coin_line_chance || capacity < 2 {
        CoinPattern::Line
    } else {
        CoinPattern::ElevatedLine
    }
}

/// Walk the cumulative weights with a roll in `[0, 1)`.
///
/// Returns `None` when the roll lands past the total weight.
pub fn pick_obstacle_kind(roll: f32, weights: &ObstacleWeights) -> Option<ObstacleKind> {
    let mut cumulative = 0.0;
    for kind in ObstacleKind::ALL {
        let weight = weights.weight(kind);
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if roll < cumulative {
            return Some(kind);
        }
    }
    None
}

/// Spawn timers and RNG
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    coin_timer: f32,
    obstacle_timer: f32,
    /// Remaining cooldown for mountain / ridge
    zone_cooldowns: [f32; 2],
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            coin_timer: 0.0,
            obstacle_timer: 0.0,
            zone_cooldowns: [0.0; 2],
        }
    }

    /// Zero all timers; the RNG stream continues
    pub fn reset(&mut self) {
        self.coin_timer = 0.0;
        self.obstacle_timer = 0.0;
        self.zone_cooldowns = [0.0; 2];
    }

    /// Count down and spawn whatever is due
    pub fn update(&mut self, dt: f32, stage: Stage, tuning: &Tuning, world: &mut World) {
        if !world.viewport.is_valid() {
            return;
        }

        self.coin_timer -= dt;
        self.obstacle_timer -= dt;
        for cooldown in &mut self.zone_cooldowns {
            *cooldown -= dt;
        }

        if self.coin_timer <= 0.0 {
            self.spawn_coins(tuning, world);
            self.coin_timer =
                tuning.coin_interval_for(stage) + self.rng.random::<f32>() * tuning.coin_jitter;
        }

        if self.obstacle_timer <= 0.0 {
            self.spawn_obstacle(stage, tuning, world);
            self.obstacle_timer = tuning.obstacle_interval_for(stage)
                + self.rng.random::<f32>() * tuning.obstacle_jitter;
        }
    }

    /// Roll and place a coin pattern at the right edge
    pub fn spawn_coins(&mut self, tuning: &Tuning, world: &mut World) -> CoinPattern {
        let scale = world.viewport.scale;
        let x = world.viewport.width;
        let feet = world.actor.ground_y + world.actor.size.y;

        let roll = self.rng.random::<f32>();
        let pattern = pick_coin_pattern(roll, world.actor.capacity, tuning);
        match pattern {
            CoinPattern::Single => {
                let tier = COIN_TIERS[self.rng.random_range(0..COIN_TIERS.len())];
                let id = world.next_entity_id();
                world
                    .coins
                    .push(Coin::new(id, Vec2::new(x, feet - tier * scale), scale));
            }
            CoinPattern::Line | CoinPattern::ElevatedLine => {
                let height = if pattern == CoinPattern::ElevatedLine {
                    COIN_ELEVATED_HEIGHT
                } else {
                    COIN_LINE_HEIGHT
                };
                let y = feet - height * scale;
                for i in 0..COIN_LINE_COUNT {
                    let id = world.next_entity_id();
                    let cx = x + i as f32 * COIN_LINE_SPACING * scale;
                    world.coins.push(Coin::new(id, Vec2::new(cx, y), scale));
                }
            }
        }
        log::debug!("Spawned coins: {:?}", pattern);
        pattern
    }

    /// Whether the rightmost obstacle has cleared the minimum spacing
    pub fn spacing_clear(&self, tuning: &Tuning, world: &World) -> bool {
        match world.rightmost_obstacle_edge() {
            Some(edge) => world.viewport.width - edge >= tuning.min_spacing(world.speed),
            None => true,
        }
    }

    /// Whether `kind` may spawn now given capacity and cooldowns
    pub fn eligible(&self, kind: ObstacleKind, capacity: u8) -> bool {
        if capacity < kind.min_capacity() {
            return false;
        }
        match kind {
            ObstacleKind::Mountain => self.zone_cooldowns[0] <= 0.0,
            ObstacleKind::Ridge => self.zone_cooldowns[1] <= 0.0,
            _ => true,
        }
    }

    /// Try to spawn one obstacle at the right edge.
    ///
    /// Returns the kind spawned, or `None` when spacing, the roll, or
    /// eligibility rejects this attempt. A rejected attempt is not retried.
    pub fn spawn_obstacle(
        &mut self,
        stage: Stage,
        tuning: &Tuning,
        world: &mut World,
    ) -> Option<ObstacleKind> {
        if !self.spacing_clear(tuning, world) {
            return None;
        }

        let roll = self.rng.random::<f32>();
        let kind = pick_obstacle_kind(roll, tuning.weights_for(stage))?;
        if !self.eligible(kind, world.actor.capacity) {
            log::debug!("Skipped {} spawn (capacity or cooldown)", kind.as_str());
            return None;
        }

        let scale = world.viewport.scale;
        let (width, min_h, max_h) = kind.dimensions();
        let height = if max_h > min_h {
            self.rng.random_range(min_h..max_h)
        } else {
            min_h
        };
        let id = world.next_entity_id();
        let obstacle = Obstacle::new(
            id,
            kind,
            world.viewport.width,
            width * scale,
            height * scale,
            &world.actor,
        );
        world.obstacles.push(obstacle);

        match kind {
            ObstacleKind::Mountain => self.zone_cooldowns[0] = tuning.cooldown_for(kind),
            ObstacleKind::Ridge => self.zone_cooldowns[1] = tuning.cooldown_for(kind),
            _ => {}
        }
        log::debug!("Spawned {} #{} at stage {}", kind.as_str(), id, stage.as_str());
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Actor;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;

    fn world(capacity: u8) -> World {
        let mut world = World::new(Actor::new(capacity), 300.0);
        world.set_viewport(Viewport::new(800.0, 400.0));
        world
    }

    #[test]
    fn test_coin_pattern_weights() {
        let t = Tuning::default();
        assert_eq!(pick_coin_pattern(0.0, 2, &t), CoinPattern::Single);
        assert_eq!(pick_coin_pattern(0.69, 2, &t), CoinPattern::Single);
        assert_eq!(pick_coin_pattern(0.7, 2, &t), CoinPattern::Line);
        assert_eq!(pick_coin_pattern(0.94, 2, &t), CoinPattern::Line);
        assert_eq!(pick_coin_pattern(0.97, 2, &t), CoinPattern::ElevatedLine);
    }

    #[test]
    fn test_elevated_line_falls_back_without_double_jump() {
        let t = Tuning::default();
        assert_eq!(pick_coin_pattern(0.97, 1, &t), CoinPattern::Line);
        assert_eq!(pick_coin_pattern(0.999, 1, &t), CoinPattern::Line);
    }

    #[test]
    fn test_line_spawns_five_coins_at_reachable_height() {
        let mut world = world(1);
        let mut spawner = Spawner::new(11);
        let t = Tuning {
            coin_single_chance: 0.0,
            coin_line_chance: 0.0,
            ..Tuning::default()
        };
        // Every roll is an elevated line, which falls back with one charge
        assert_eq!(spawner.spawn_coins(&t, &mut world), CoinPattern::Line);
        assert_eq!(world.coins.len(), COIN_LINE_COUNT);
        let feet = world.actor.ground_y + world.actor.size.y;
        for coin in &world.coins {
            assert_eq!(coin.center.y, feet - COIN_LINE_HEIGHT);
        }
    }

    #[test]
    fn test_obstacle_weights_early_stage() {
        let t = Tuning::default();
        let early = t.weights_for(Stage::Early);
        assert_eq!(pick_obstacle_kind(0.1, early), Some(ObstacleKind::Flower));
        assert_eq!(pick_obstacle_kind(0.7, early), Some(ObstacleKind::Cactus));
        let late = t.weights_for(Stage::Late);
        assert_eq!(pick_obstacle_kind(0.7, late), Some(ObstacleKind::Mountain));
        assert_eq!(pick_obstacle_kind(0.9, late), Some(ObstacleKind::Ridge));
    }

    #[test]
    fn test_roll_past_total_weight_is_none() {
        let weights = ObstacleWeights::new(0.2, 0.2, 0.0, 0.0);
        assert_eq!(pick_obstacle_kind(0.5, &weights), None);
    }

    #[test]
    fn test_zone_gated_by_capacity() {
        let spawner = Spawner::new(1);
        assert!(!spawner.eligible(ObstacleKind::Mountain, 1));
        assert!(spawner.eligible(ObstacleKind::Mountain, 2));
        assert!(!spawner.eligible(ObstacleKind::Ridge, 2));
        assert!(spawner.eligible(ObstacleKind::Ridge, 3));
    }

    #[test]
    fn test_zone_cooldown_blocks_clustering() {
        let mut world = world(4);
        let mut spawner = Spawner::new(5);
        let t = Tuning {
            obstacle_weights: [ObstacleWeights::new(0.0, 0.0, 1.0, 0.0); 3],
            spacing_seconds: 0.0,
            ..Tuning::default()
        };
        assert_eq!(
            spawner.spawn_obstacle(Stage::Mid, &t, &mut world),
            Some(ObstacleKind::Mountain)
        );
        // Clear the field so spacing cannot be what rejects the next attempt
        world.obstacles.clear();
        assert_eq!(spawner.spawn_obstacle(Stage::Mid, &t, &mut world), None);
        assert!(world.obstacles.is_empty());

        // Let the cooldown lapse through the timer path
        spawner.update(3.1, Stage::Mid, &t, &mut world);
        assert_eq!(world.obstacles.len(), 1);
    }

    #[test]
    fn test_ineligible_roll_still_resets_timer() {
        let mut world = world(1);
        let mut spawner = Spawner::new(9);
        let t = Tuning {
            obstacle_weights: [ObstacleWeights::new(0.0, 0.0, 1.0, 0.0); 3],
            ..Tuning::default()
        };
        spawner.update(0.0, Stage::Early, &t, &mut world);
        assert!(world.obstacles.is_empty());
        assert!(spawner.obstacle_timer >= t.obstacle_interval[0]);
    }

    #[test]
    fn test_spacing_rejects_close_spawn() {
        let mut world = world(1);
        let mut spawner = Spawner::new(3);
        let t = Tuning::default();
        assert!(spawner.spawn_obstacle(Stage::Early, &t, &mut world).is_some());
        // Newly spawned obstacle sits at the spawn edge
        assert!(!spawner.spacing_clear(&t, &world));
        assert!(spawner.spawn_obstacle(Stage::Early, &t, &mut world).is_none());
        assert_eq!(world.obstacles.len(), 1);
    }

    #[test]
    fn test_invalid_viewport_spawns_nothing() {
        let mut world = World::new(Actor::new(1), 300.0);
        let mut spawner = Spawner::new(3);
        spawner.update(5.0, Stage::Early, &Tuning::default(), &mut world);
        assert!(world.obstacles.is_empty());
        assert!(world.coins.is_empty());
    }

    proptest! {
        #[test]
        fn prop_obstacles_respect_min_spacing(seed in any::<u64>(), capacity in 1u8..=4) {
            let t = Tuning::constant_speed();
            let mut world = world(capacity);
            let mut spawner = Spawner::new(seed);
            let dt = 1.0 / 60.0;
            let min_spacing = t.min_spacing(world.speed);

            for frame in 0..3000 {
                let stage = Stage::for_elapsed(frame as f32 * dt, t.stage_thresholds);
                let before = world.rightmost_obstacle_edge();
                let count = world.obstacles.len();
                spawner.update(dt, stage, &t, &mut world);
                if world.obstacles.len() > count {
                    let spawned = &world.obstacles[world.obstacles.len() - 1];
                    if let Some(edge) = before {
                        prop_assert!(spawned.bounds.left() - edge >= min_spacing - 1e-3);
                    }
                }
                let dx = world.speed * dt;
                for obstacle in &mut world.obstacles {
                    obstacle.scroll(dx);
                }
                world.obstacles.retain(|o| !o.is_off_screen());
            }
        }

        #[test]
        fn prop_min_spacing_holds_while_accelerating(seed in any::<u64>(), capacity in 1u8..=4) {
            let t = Tuning {
                speed_ramp: 20.0,
                ..Tuning::default()
            };
            let mut world = world(capacity);
            let mut spawner = Spawner::new(seed);
            let dt = 1.0 / 60.0;

            for frame in 0..3000 {
                let stage = Stage::for_elapsed(frame as f32 * dt, t.stage_thresholds);
                world.speed = (world.speed + t.speed_ramp * dt).min(t.max_speed);
                let min_spacing = t.min_spacing(world.speed);
                let before = world.rightmost_obstacle_edge();
                let count = world.obstacles.len();
                spawner.update(dt, stage, &t, &mut world);
                if world.obstacles.len() > count {
                    let spawned = &world.obstacles[world.obstacles.len() - 1];
                    if let Some(edge) = before {
                        prop_assert!(spawned.bounds.left() - edge >= min_spacing - 1e-3);
                    }
                }
                let dx = world.speed * dt;
                for obstacle in &mut world.obstacles {
                    obstacle.scroll(dx);
                }
                world.obstacles.retain(|o| !o.is_off_screen());
            }
            prop_assert_eq!(world.speed, t.max_speed);
        }
    }
}
