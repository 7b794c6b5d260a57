//! The controllable runner: gravity, grounding, multi-charge jumps
//!
//! The actor only moves vertically; the world scrolls past it. Zone obstacles
//! it is currently traversing are tracked here so jumps can be credited to
//! every zone entered.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::state::Viewport;
use crate::consts::*;
use crate::sanitize_capacity;

/// Jumps performed while inside one zone obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTrack {
    pub obstacle_id: u32,
    pub jumps: u8,
}

/// What a jump command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// First jump from the ground
    Primary,
    /// Aerial jump spending another charge
    Secondary,
    /// No charge available
    Denied,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner (x fixed, y variable)
    pub pos: Vec2,
    /// Vertical velocity (pixels/s, positive is down)
    pub vel_y: f32,
    /// Scaled width/height
    pub size: Vec2,
    /// Top of the actor when standing on the ground
    pub ground_y: f32,
    /// Jump charges per airborne period (1..=4)
    pub capacity: u8,
    /// Charges left before landing
    pub charges: u8,
    /// Jumps spent since the last landing
    pub jumps_used: u8,
    pub grounded: bool,
    /// Zone obstacles currently being traversed
    pub zones: Vec<ZoneTrack>,
    /// Cosmetics read from the profile at (re)start
    pub skin: String,
    pub has_mask: bool,
}

impl Actor {
    pub fn new(capacity: u8) -> Self {
        let capacity = sanitize_capacity(capacity);
        Self {
            pos: Vec2::new(ACTOR_X, 0.0),
            vel_y: 0.0,
            size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            ground_y: 0.0,
            capacity,
            charges: capacity,
            jumps_used: 0,
            grounded: true,
            zones: Vec::new(),
            skin: DEFAULT_SKIN.to_string(),
            has_mask: false,
        }
    }

    /// Fit the actor to a viewport: scaled size, fixed x, ground baseline.
    ///
    /// A grounded actor is snapped to the new baseline; an airborne one is
    /// only kept from ending up below it.
    pub fn place(&mut self, viewport: &Viewport) {
        let scale = viewport.scale;
        self.size = Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT) * scale;
        self.pos.x = ACTOR_X * scale;
        self.ground_y = viewport.ground_y(ACTOR_HEIGHT);
        if self.grounded || self.pos.y > self.ground_y {
            self.pos.y = self.ground_y;
        }
    }

    /// Integrate gravity. Returns true on the tick the actor touches down.
    pub fn update(&mut self, dt: f32, gravity: f32) -> bool {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;

        if self.pos.y >= self.ground_y {
            let landed = !self.grounded;
            self.pos.y = self.ground_y;
            self.vel_y = 0.0;
            self.grounded = true;
            self.charges = self.capacity;
            self.jumps_used = 0;
            for zone in &mut self.zones {
                zone.jumps = 0;
            }
            landed
        } else {
            self.grounded = false;
            false
        }
    }

    /// Spend a charge if one is available.
    ///
    /// From the ground with a full set of charges the primary impulse is
    /// applied; in the air with charges left (and the first already used) the
    /// stronger secondary impulse is applied.
    pub fn jump(&mut self, primary_impulse: f32, secondary_impulse: f32) -> JumpOutcome {
        let outcome = if self.grounded && self.charges == self.capacity {
            self.vel_y = -primary_impulse;
            JumpOutcome::Primary
        } else if !self.grounded && self.charges > 0 && self.charges < self.capacity {
            self.vel_y = -secondary_impulse;
            JumpOutcome::Secondary
        } else {
            return JumpOutcome::Denied;
        };

        self.charges -= 1;
        self.jumps_used += 1;
        for zone in &mut self.zones {
            zone.jumps = zone.jumps.saturating_add(1);
        }
        outcome
    }

    /// Scaled bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Mark a zone as entered. Returns true if it was not tracked yet; an
    /// already-entered zone keeps its jump count.
    pub fn enter_zone(&mut self, obstacle_id: u32) -> bool {
        if self.in_zone(obstacle_id) {
            return false;
        }
        self.zones.push(ZoneTrack {
            obstacle_id,
            jumps: 0,
        });
        true
    }

    /// Clear a zone and its counter. Returns true if it was tracked.
    pub fn exit_zone(&mut self, obstacle_id: u32) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.obstacle_id != obstacle_id);
        self.zones.len() != before
    }

    pub fn in_zone(&self, obstacle_id: u32) -> bool {
        self.zones.iter().any(|z| z.obstacle_id == obstacle_id)
    }

    /// Jumps performed inside a zone, if it is currently entered
    pub fn zone_jumps(&self, obstacle_id: u32) -> Option<u8> {
        self.zones
            .iter()
            .find(|z| z.obstacle_id == obstacle_id)
            .map(|z| z.jumps)
    }
}
