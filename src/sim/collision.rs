//! Overlap tests shared by particles, obstacles and power-ups
//!
//! Everything here is a boolean overlap test; collision *response* lives with
//! the entity that reacts (see `Particle::update_motion`).

use glam::Vec2;

/// Axis-aligned rectangle (top-left corner + size, +y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// True iff the two circles strictly overlap.
///
/// Touching circles (distance == r1 + r2) do not count.
#[inline]
pub fn circles_overlap(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    p1.distance(p2) < r1 + r2
}

/// Exact circle vs. axis-aligned rectangle test (strict, like
/// [`circles_overlap`])
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance(rect.closest_point(center)) < radius
}
