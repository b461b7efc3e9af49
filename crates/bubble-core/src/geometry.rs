#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are `f64` in container space: origin at top-left, `y`
//! growing downward.

/// A point in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The shorter of the two sides, clamped to zero.
    #[inline]
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height).max(0.0)
    }

    /// Check if either side is zero, negative, or not a number.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius, never negative for circles produced by the layout.
    pub r: f64,
}

impl Circle {
    /// Create a new circle.
    #[inline]
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    /// Center point.
    #[inline]
    pub const fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Diameter (`2r`).
    #[inline]
    pub fn diameter(&self) -> f64 {
        self.r * 2.0
    }

    /// Check if a point lies inside or on the circle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        dx * dx + dy * dy <= self.r * self.r
    }

    /// Signed gap between the boundaries of two circles.
    ///
    /// Positive when the circles are apart, zero when tangent, negative when
    /// they overlap.
    #[inline]
    pub fn gap(&self, other: &Circle) -> f64 {
        self.center().distance(other.center()) - self.r - other.r
    }

    /// Distance from `other`'s boundary to this circle's boundary, measured
    /// inward. Non-negative iff `other` lies entirely inside `self`.
    #[inline]
    pub fn inner_clearance(&self, other: &Circle) -> f64 {
        self.r - other.r - self.center().distance(other.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn size_min_side_and_empty() {
        assert_eq!(Size::new(300.0, 200.0).min_side(), 200.0);
        assert_eq!(Size::new(-5.0, 10.0).min_side(), 0.0);
        assert!(Size::new(0.0, 10.0).is_empty());
        assert!(Size::new(f64::NAN, 10.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn circle_contains_boundary() {
        let c = Circle::new(10.0, 10.0, 5.0);
        assert!(c.contains(Point::new(15.0, 10.0)));
        assert!(c.contains(Point::new(10.0, 10.0)));
        assert!(!c.contains(Point::new(15.1, 10.0)));
    }

    #[test]
    fn gap_tangent_is_zero() {
        let a = Circle::new(0.0, 0.0, 2.0);
        let b = Circle::new(5.0, 0.0, 3.0);
        assert!(a.gap(&b).abs() < 1e-12);
    }

    #[test]
    fn gap_negative_when_overlapping() {
        let a = Circle::new(0.0, 0.0, 2.0);
        let b = Circle::new(1.0, 0.0, 2.0);
        assert!(a.gap(&b) < 0.0);
    }

    #[test]
    fn inner_clearance_for_nested_circle() {
        let outer = Circle::new(0.0, 0.0, 10.0);
        let inner = Circle::new(2.0, 0.0, 3.0);
        assert!((outer.inner_clearance(&inner) - 5.0).abs() < 1e-12);
        assert!(inner.inner_clearance(&outer) < 0.0);
    }

    #[test]
    fn diameter_is_twice_radius() {
        assert_eq!(Circle::new(1.0, 2.0, 6.0).diameter(), 12.0);
    }
}
