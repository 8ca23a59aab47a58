//! Anchor-point index used for magnetic snapping.
//!
//! The point pen mode appends anchors here; ruler and compass endpoints are
//! magnetized to the nearest stored anchor within a fixed radius. The lasso
//! engine rewrites anchor coordinates in place when a cut region is
//! committed, so later snaps keep following the moved geometry.

use crate::util::Point;
use log::debug;

/// Snap radius in surface units.
pub const SNAP_DISTANCE: f64 = 15.0;

/// Ordered store of user-placed anchor points with radius queries.
///
/// Query resolution is first-match in insertion order, not nearest-of-many;
/// with the small fixed radius, candidate anchors rarely overlap and the
/// first placed one wins when they do.
#[derive(Debug, Default, Clone)]
pub struct SnapIndex {
    points: Vec<Point>,
}

impl SnapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first anchor within [`SNAP_DISTANCE`] of `p`, or `p`
    /// itself when nothing is close enough.
    ///
    /// Because stored anchors always return themselves, the query is
    /// idempotent: `query(query(p)) == query(p)`.
    pub fn query(&self, p: Point) -> Point {
        for anchor in &self.points {
            if p.distance_to(*anchor) < SNAP_DISTANCE {
                return *anchor;
            }
        }
        p
    }

    /// Appends an anchor point.
    pub fn push(&mut self, p: Point) {
        debug!("anchor point added at ({:.1}, {:.1})", p.x, p.y);
        self.points.push(p);
    }

    /// Removes all anchors (clear-all and load paths).
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn anchors(&self) -> &[Point] {
        &self.points
    }

    /// Mutable access for the lasso engine's in-place point migration.
    pub fn anchors_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Clones the anchor list for an undo snapshot.
    pub fn to_vec(&self) -> Vec<Point> {
        self.points.clone()
    }

    /// Replaces the anchor list wholesale (undo restore and session load).
    pub fn replace(&mut self, points: Vec<Point>) {
        self.points = points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_snaps_within_radius() {
        let mut index = SnapIndex::new();
        index.push(Point::new(100.0, 100.0));

        let snapped = index.query(Point::new(105.0, 95.0));
        assert_eq!(snapped, Point::new(100.0, 100.0));

        // Exactly at the radius boundary: strictly-less comparison misses.
        let missed = index.query(Point::new(115.0, 100.0));
        assert_eq!(missed, Point::new(115.0, 100.0));
    }

    #[test]
    fn query_without_match_returns_input() {
        let index = SnapIndex::new();
        let p = Point::new(3.0, 4.0);
        assert_eq!(index.query(p), p);
    }

    #[test]
    fn query_is_idempotent() {
        let mut index = SnapIndex::new();
        index.push(Point::new(50.0, 50.0));
        index.push(Point::new(58.0, 50.0));

        for probe in [
            Point::new(52.0, 48.0),
            Point::new(60.0, 51.0),
            Point::new(300.0, 300.0),
        ] {
            let once = index.query(probe);
            assert_eq!(index.query(once), once);
        }
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let mut index = SnapIndex::new();
        index.push(Point::new(0.0, 0.0));
        index.push(Point::new(6.0, 0.0));

        // Closer to the second anchor, but the first is inside the radius
        // and was inserted earlier.
        let snapped = index.query(Point::new(5.0, 0.0));
        assert_eq!(snapped, Point::new(0.0, 0.0));
    }
}
