//! Axis-aligned collision tests
//!
//! The bird and both pipe barriers are axis-aligned boxes. Overlap is
//! strict on every edge: a bird exactly spanning the gap, or exactly
//! touching a barrier edge, is safe.

use glam::Vec2;

use super::state::Pipe;

/// Axis-aligned bounding box, `min` top-left, `max` bottom-right
/// (y grows downward, as in the rendered world)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap test; shared edges do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Test the bird's box against both forbidden regions of a pipe
///
/// A hit requires horizontal overlap with the pipe's column plus vertical
/// intersection with either the upper or the lower barrier.
pub fn bird_hits_pipe(bird: &Aabb, pipe: &Pipe) -> bool {
    bird.overlaps(&pipe.top_region()) || bird.overlaps(&pipe.bottom_region())
}
