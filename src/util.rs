//! Geometry utilities shared by the tools.
//!
//! This module provides:
//! - [`Point`]: surface-local coordinates (origin top-left, y-down)
//! - [`Rect`]: normalized axis-aligned rectangles from arbitrary drag corners
//! - Polygon containment (ray casting) used by the lasso engine
//! - Angle helpers for the compass tool

use serde::{Deserialize, Serialize};

/// A point in surface-local coordinates.
///
/// The origin is the top-left corner of the drawing surface with y growing
/// downward, matching the pointer event coordinates delivered by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector from `self` to `other`, in radians.
    pub fn angle_to(&self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Axis-aligned rectangle with a non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Builds the normalized rectangle spanned by two opposite corners.
    ///
    /// The result is independent of drag direction: `x`/`y` are the minimum
    /// coordinates and `width`/`height` the absolute deltas.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Returns true if the rectangle has a positive drawable area.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns true if `p` lies inside the rectangle (inclusive edges).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Tests whether `point` lies inside the polygon described by `vertices`.
///
/// Classic ray-casting: a horizontal ray from the point is intersected with
/// each polygon edge and the crossing count parity decides containment. A
/// point exactly on an edge is implementation-defined, which is inherent to
/// the algorithm and acceptable for lasso hit testing.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    let (x, y) = (point.x, point.y);
    let mut inside = false;
    let mut j = vertices.len().wrapping_sub(1);
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].x, vertices[i].y);
        let (xj, yj) = (vertices[j].x, vertices[j].y);
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Z-component of the cross product of `center -> a` and `center -> b`.
///
/// The compass uses the sign to pick the arc sweep direction: a negative
/// value means the pointer is on the counter-clockwise side of the start
/// radius, so the shorter visual path is swept counter-clockwise.
pub fn cross_from_center(center: Point, a: Point, b: Point) -> f64 {
    (a.x - center.x) * (b.y - center.y) - (a.y - center.y) * (b.x - center.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_points_normalizes_any_drag_direction() {
        let expected = Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 15.0,
        };
        let a = Point::new(10.0, 20.0);
        let b = Point::new(40.0, 35.0);
        assert_eq!(Rect::from_points(a, b), expected);
        assert_eq!(Rect::from_points(b, a), expected);

        let c = Point::new(40.0, 20.0);
        let d = Point::new(10.0, 35.0);
        assert_eq!(Rect::from_points(c, d), expected);
    }

    #[test]
    fn degenerate_rect_is_invalid() {
        let p = Point::new(5.0, 5.0);
        let rect = Rect::from_points(p, Point::new(5.0, 42.0));
        assert!(!rect.is_valid());
    }

    #[test]
    fn point_in_polygon_square() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &square));
    }

    #[test]
    fn point_in_polygon_concave() {
        // L-shaped polygon; the notch must be outside.
        let shape = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(2.0, 8.0), &shape));
        assert!(!point_in_polygon(Point::new(8.0, 8.0), &shape));
    }

    #[test]
    fn cross_sign_picks_sweep_direction() {
        let center = Point::new(0.0, 0.0);
        let start = Point::new(10.0, 0.0);
        // y-down coordinates: a point below the start radius is clockwise.
        assert!(cross_from_center(center, start, Point::new(0.0, 10.0)) > 0.0);
        assert!(cross_from_center(center, start, Point::new(0.0, -10.0)) < 0.0);
    }
}
