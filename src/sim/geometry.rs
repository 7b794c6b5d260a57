//! Axis-aligned box geometry for the actor and obstacles
//!
//! Screen space, y grows downward:
//! - `min` is the top-left corner
//! - `size` is width/height (both non-negative)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Center point of the box
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_horizontally(other)
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Overlap of the horizontal spans only
    pub fn overlaps_horizontally(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Shift the box horizontally
    #[inline]
    pub fn translate_x(&mut self, dx: f32) {
        self.min.x += dx;
    }
}

/// Coin-vs-actor test: center distance against the coin radius plus half the
/// box's shorter side.
pub fn circle_hits_box(center: Vec2, radius: f32, bounds: &Aabb) -> bool {
    let reach = radius + bounds.size.min_element() / 2.0;
    center.distance_squared(bounds.center()) < reach * reach
}
