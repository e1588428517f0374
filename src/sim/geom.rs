//! Axis-aligned bounding boxes in arena coordinates
//!
//! The arena's origin is the top-left corner, x grows right and y grows down.
//! Every drawable shape is tracked by its box `(x0, y0, x1, y1)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Bounds {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            x0: center.x - width / 2.0,
            y0: center.y - height / 2.0,
            x1: center.x + width / 2.0,
            y1: center.y + height / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x0 + self.x1) * 0.5, (self.y0 + self.y1) * 0.5)
    }

    /// Same box shifted by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x0: self.x0 + delta.x,
            y0: self.y0 + delta.y,
            x1: self.x1 + delta.x,
            y1: self.y1 + delta.y,
        }
    }

    /// Inclusive overlap test (touching edges count as overlapping)
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x1 >= other.x0 && self.x0 <= other.x1 && self.y1 >= other.y0 && self.y0 <= other.y1
    }

    /// Whether the box lies horizontally inside `[0, width]`
    pub fn within_width(&self, width: f32) -> bool {
        self.x0 >= 0.0 && self.x1 <= width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let b = Bounds::from_center(Vec2::new(305.0, 326.0), 80.0, 10.0);
        assert_eq!(b, Bounds::new(265.0, 321.0, 345.0, 331.0));
        assert_eq!(b.center(), Vec2::new(305.0, 326.0));
        assert_eq!(b.width(), 80.0);
        assert_eq!(b.height(), 10.0);
    }

    #[test]
    fn test_intersects_is_inclusive() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Bounds::new(10.0, 10.0, 20.0, 20.0)));
        assert!(a.intersects(&Bounds::new(5.0, 5.0, 6.0, 6.0)));
        assert!(!a.intersects(&Bounds::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!a.intersects(&Bounds::new(0.0, -5.0, 10.0, -0.1)));
    }

    #[test]
    fn test_translated() {
        let b = Bounds::new(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(8.0, -8.0));
        assert_eq!(b, Bounds::new(9.0, -6.0, 11.0, -4.0));
    }

    #[test]
    fn test_within_width() {
        assert!(Bounds::new(0.0, 0.0, 610.0, 1.0).within_width(610.0));
        assert!(!Bounds::new(-0.5, 0.0, 80.0, 1.0).within_width(610.0));
        assert!(!Bounds::new(540.0, 0.0, 620.0, 1.0).within_width(610.0));
    }
}
