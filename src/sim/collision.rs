//! Overlap tests for axis-aligned sprites
//!
//! Three flavours are used by the simulation step:
//! - circle vs circle (player vs mob)
//! - rectangle vs rectangle (player vs power-up)
//! - partial-overlap ratio (bullet vs mob)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in field pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn area(&self) -> f32 {
        let size = self.size();
        size.x.max(0.0) * size.y.max(0.0)
    }

    /// Overlapping region, if the boxes share positive area
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if max.x > min.x && max.y > min.y {
            Some(Aabb { min, max })
        } else {
            None
        }
    }

    /// True when the boxes share positive area (touching edges do not count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.intersection(other).is_some()
    }
}

/// Circle-circle overlap: centres closer than the sum of the radii
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Partial-overlap ratio test
///
/// Counts as a hit when the intersection covers at least `ratio` of the
/// smaller box's area. A ratio exactly at the threshold hits.
pub fn overlap_ratio_hit(a: &Aabb, b: &Aabb, ratio: f32) -> bool {
    let Some(shared) = a.intersection(b) else {
        return false;
    };
    let smaller = a.area().min(b.area());
    smaller > 0.0 && shared.area() >= ratio * smaller
}
