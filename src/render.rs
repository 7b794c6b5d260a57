//! Presentation snapshot
//!
//! The presentation layer pulls a `FrameSnapshot` after each frame and draws
//! it however it likes. Shapes are flattened into `DrawInstance`s laid out
//! for direct upload as a GPU instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use crate::persistence::Profile;
use crate::sim::{GameEvent, GamePhase, ObstacleKind, Session, Stage};

/// Instance shape kinds
pub mod shape {
    pub const ACTOR: u32 = 0;
    pub const FLOWER: u32 = 1;
    pub const CACTUS: u32 = 2;
    pub const MOUNTAIN: u32 = 3;
    pub const RIDGE: u32 = 4;
    pub const COIN: u32 = 5;
    pub const GROUND: u32 = 6;
}

/// Colors for game elements
pub mod colors {
    pub const ACTOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0]; // #333
    pub const FLOWER: [f32; 4] = [1.0, 0.42, 0.616, 1.0]; // #FF6B9D
    pub const CACTUS: [f32; 4] = [0.18, 0.8, 0.443, 1.0]; // #2ecc71
    pub const MOUNTAIN: [f32; 4] = [0.545, 0.271, 0.075, 1.0]; // #8B4513
    pub const RIDGE: [f32; 4] = [0.427, 0.298, 0.255, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.843, 0.0, 1.0]; // #FFD700
    pub const GROUND: [f32; 4] = [0.33, 0.33, 0.33, 1.0];
}

/// One drawable rectangle or disc
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct DrawInstance {
    /// Top-left corner (circles: center)
    pub position: [f32; 2],
    /// Width/height (circles: diameter on both axes)
    pub size: [f32; 2],
    pub rotation: f32,
    pub kind: u32,
    pub color: [f32; 4],
}

impl DrawInstance {
    pub fn rect(position: Vec2, size: Vec2, kind: u32, color: [f32; 4]) -> Self {
        Self {
            position: [position.x, position.y],
            size: [size.x, size.y],
            rotation: 0.0,
            kind,
            color,
        }
    }
}

fn obstacle_style(kind: ObstacleKind) -> (u32, [f32; 4]) {
    match kind {
        ObstacleKind::Flower => (shape::FLOWER, colors::FLOWER),
        ObstacleKind::Cactus => (shape::CACTUS, colors::CACTUS),
        ObstacleKind::Mountain => (shape::MOUNTAIN, colors::MOUNTAIN),
        ObstacleKind::Ridge => (shape::RIDGE, colors::RIDGE),
    }
}

/// View the instances as raw bytes for a buffer upload
pub fn instance_bytes(instances: &[DrawInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// Actor state the presentation layer needs beyond its box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorPose {
    pub position: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub charges: u8,
    pub skin: String,
    pub has_mask: bool,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub run_coins: u32,
    pub total_coins: u64,
    pub jump_capacity: u8,
    pub charges: u8,
    pub high_score: u64,
    pub stage: Stage,
    pub speed: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub actor: ActorPose,
    pub instances: Vec<DrawInstance>,
    pub hud: Hud,
    /// Events raised since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl<P: Profile> Session<P> {
    /// Build a snapshot and take the pending events
    pub fn snapshot(&mut self) -> FrameSnapshot {
        let events = self.drain_events();
        let world = self.world();
        let actor = &world.actor;

        let mut instances = Vec::with_capacity(2 + world.obstacles.len() + world.coins.len());
        if world.viewport.is_valid() {
            let ground_top = actor.ground_y + actor.size.y;
            instances.push(DrawInstance::rect(
                Vec2::new(0.0, ground_top),
                Vec2::new(world.viewport.width, world.viewport.height - ground_top),
                shape::GROUND,
                colors::GROUND,
            ));
        }
        for obstacle in &world.obstacles {
            let (kind, color) = obstacle_style(obstacle.kind);
            instances.push(DrawInstance::rect(obstacle.bounds.min, obstacle.bounds.size, kind, color));
        }
        for coin in &world.coins {
            instances.push(DrawInstance {
                position: [coin.center.x, coin.center.y],
                size: [coin.radius * 2.0, coin.radius * 2.0],
                rotation: coin.rotation,
                kind: shape::COIN,
                color: colors::COIN,
            });
        }
        instances.push(DrawInstance::rect(actor.pos, actor.size, shape::ACTOR, colors::ACTOR));

        let profile = self.profile();
        FrameSnapshot {
            phase: self.phase(),
            actor: ActorPose {
                position: actor.pos,
                size: actor.size,
                grounded: actor.grounded,
                charges: actor.charges,
                skin: actor.skin.clone(),
                has_mask: actor.has_mask,
            },
            instances,
            hud: Hud {
                score: self.score_points(),
                run_coins: self.run_coins(),
                total_coins: profile.currency(),
                jump_capacity: actor.capacity,
                charges: actor.charges,
                high_score: profile.high_score(),
                stage: self.stage(),
                speed: world.speed,
            },
            events,
        }
    }
}
