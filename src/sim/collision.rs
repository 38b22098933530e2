//! Axis-aligned bounding box overlap tests
//!
//! Every entity in the field is a box anchored at its top-left corner.
//! Touching edges do not count as an overlap.

use glam::Vec2;

/// An axis-aligned box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, s: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(s))
    }

    #[test]
    fn test_overlapping_boxes() {
        assert!(square(0.0, 0.0, 10.0).overlaps(&square(5.0, 5.0, 10.0)));
        assert!(square(5.0, 5.0, 10.0).overlaps(&square(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_contained_box() {
        assert!(square(0.0, 0.0, 40.0).overlaps(&square(10.0, 10.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        assert!(!square(0.0, 0.0, 10.0).overlaps(&square(10.0, 0.0, 10.0)));
        assert!(!square(0.0, 0.0, 10.0).overlaps(&square(0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_separated_boxes() {
        assert!(!square(0.0, 0.0, 10.0).overlaps(&square(50.0, 50.0, 10.0)));
    }
}
