//! Scrolling entities: obstacles and coins

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::geometry::{Aabb, circle_hits_box};
use crate::consts::{COIN_RADIUS, COIN_SPIN};

/// Obstacle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low-profile hazard
    Flower,
    /// Tall hazard
    Cactus,
    /// Wide zone hazard, needs 2 jumps while inside
    Mountain,
    /// Wider zone hazard, needs 3 jumps while inside
    Ridge,
}

impl ObstacleKind {
    /// Roll order for weighted selection
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Flower,
        ObstacleKind::Cactus,
        ObstacleKind::Mountain,
        ObstacleKind::Ridge,
    ];

    /// Jumps needed inside the zone to pass safely (0 for simple hazards)
    pub fn required_jumps(self) -> u8 {
        match self {
            ObstacleKind::Flower | ObstacleKind::Cactus => 0,
            ObstacleKind::Mountain => 2,
            ObstacleKind::Ridge => 3,
        }
    }

    #[inline]
    pub fn is_zone(self) -> bool {
        self.required_jumps() > 0
    }

    /// Smallest jump capacity that may face this obstacle
    pub fn min_capacity(self) -> u8 {
        self.required_jumps().max(1)
    }

    /// Unscaled width and height range `(width, min_height, max_height)`
    pub fn dimensions(self) -> (f32, f32, f32) {
        match self {
            ObstacleKind::Flower => (20.0, 30.0, 45.0),
            ObstacleKind::Cactus => (30.0, 50.0, 70.0),
            ObstacleKind::Mountain => (120.0, 80.0, 80.0),
            ObstacleKind::Ridge => (180.0, 100.0, 100.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Flower => "flower",
            ObstacleKind::Cactus => "cactus",
            ObstacleKind::Mountain => "mountain",
            ObstacleKind::Ridge => "ridge",
        }
    }
}

/// An obstacle standing on the ground line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

impl Obstacle {
    /// Create an obstacle whose base sits level with the actor's feet
    pub fn new(id: u32, kind: ObstacleKind, x: f32, width: f32, height: f32, actor: &Actor) -> Self {
        let feet = actor.ground_y + actor.size.y;
        Self {
            id,
            kind,
            bounds: Aabb::new(x, feet - height, width, height),
        }
    }

    #[inline]
    pub fn required_jumps(&self) -> u8 {
        self.kind.required_jumps()
    }

    /// Move left by `dx` pixels
    pub fn scroll(&mut self, dx: f32) {
        self.bounds.translate_x(-dx);
    }

    /// Right edge has fully passed the left edge of the viewport
    pub fn is_off_screen(&self) -> bool {
        self.bounds.right() < 0.0
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub center: Vec2,
    pub radius: f32,
    /// Cosmetic spin phase (radians)
    pub rotation: f32,
}

impl Coin {
    pub fn new(id: u32, center: Vec2, scale: f32) -> Self {
        Self {
            id,
            center,
            radius: COIN_RADIUS * scale,
            rotation: 0.0,
        }
    }

    /// Scroll left by `dx` and advance the spin
    pub fn update(&mut self, dx: f32, dt: f32) {
        self.center.x -= dx;
        self.rotation = (self.rotation + COIN_SPIN * dt) % std::f32::consts::TAU;
    }

    pub fn is_off_screen(&self) -> bool {
        self.center.x + self.radius < 0.0
    }

    pub fn touches(&self, actor: &Actor) -> bool {
        circle_hits_box(self.center, self.radius, &actor.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    fn actor() -> Actor {
        let mut actor = Actor::new(2);
        actor.place(&Viewport::new(800.0, 400.0));
        actor
    }

    #[test]
    fn test_obstacle_rests_on_ground_line() {
        let actor = actor();
        let cactus = Obstacle::new(1, ObstacleKind::Cactus, 800.0, 30.0, 60.0, &actor);
        assert_eq!(cactus.bounds.bottom(), actor.ground_y + actor.size.y);
        assert_eq!(cactus.bounds.top(), 380.0 - 60.0);
    }

    #[test]
    fn test_required_jumps_per_kind() {
        assert_eq!(ObstacleKind::Flower.required_jumps(), 0);
        assert_eq!(ObstacleKind::Cactus.required_jumps(), 0);
        assert_eq!(ObstacleKind::Mountain.required_jumps(), 2);
        assert_eq!(ObstacleKind::Ridge.required_jumps(), 3);
        assert_eq!(ObstacleKind::Ridge.min_capacity(), 3);
        assert_eq!(ObstacleKind::Flower.min_capacity(), 1);
    }

    #[test]
    fn test_off_screen_after_right_edge_passes() {
        let actor = actor();
        let mut flower = Obstacle::new(1, ObstacleKind::Flower, 10.0, 20.0, 30.0, &actor);
        flower.scroll(25.0);
        assert!(!flower.is_off_screen());
        flower.scroll(10.0);
        assert!(flower.is_off_screen());
    }

    #[test]
    fn test_coin_spins_and_scrolls() {
        let mut coin = Coin::new(1, Vec2::new(100.0, 200.0), 1.0);
        coin.update(30.0, 0.5);
        assert_eq!(coin.center.x, 70.0);
        assert!((coin.rotation - 1.5).abs() < 1e-6);
    }
}
