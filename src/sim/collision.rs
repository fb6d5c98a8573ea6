//! Collision predicates
//!
//! Both engines reduce their shapes to axis-aligned boxes in pixel space
//! (Engine A) or to center + half-extent pairs in normalized space (Engine B).

use glam::Vec2;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of `size` whose top edge sits at `top`, centered horizontally on `center_x`
    pub fn hanging(center_x: f32, top: f32, size: Vec2) -> Self {
        Self {
            min: Vec2::new(center_x - size.x / 2.0, top),
            max: Vec2::new(center_x + size.x / 2.0, top + size.y),
        }
    }

    /// Strict overlap with the horizontal span `[left, right]`
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }

    /// Strictly inside the vertical band `(top, bottom)`
    pub fn within_y(&self, top: f32, bottom: f32) -> bool {
        self.min.y > top && self.max.y < bottom
    }
}

/// Loose proximity test between two bodies described by center and extent.
///
/// Contact when the distance on each axis is below `tolerance` times the
/// combined extents. A tolerance under 1.0 lets bodies graze without a hit.
pub fn proximity_hit(a: Vec2, a_extent: Vec2, b: Vec2, b_extent: Vec2, tolerance: f32) -> bool {
    let distance = (a - b).abs();
    let reach = (a_extent + b_extent) * tolerance;
    distance.cmplt(reach).all()
}
