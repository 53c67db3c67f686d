//! Reference-cloud preprocessing.
//!
//! The reference scan is projected once per match at the identity pose. The
//! per-segment deltas used by the interpolated closest-point rule depend only
//! on that cloud, so they are computed up front and owned by the match call.

use super::projection::ScanPoint;

/// Geometry of the segment between reference points `i` and `i + 1`.
///
/// Deltas are `point[i] - point[i + 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PreprocessedSegment {
    /// Δx
    pub dx: f64,
    /// Δy
    pub dy: f64,
    /// Δx²
    pub dx2: f64,
    /// Δy²
    pub dy2: f64,
    /// Δx·Δy
    pub dxdy: f64,
    /// Squared segment length.
    pub length_sq: f64,
}

impl PreprocessedSegment {
    /// Segment from `start` to `end`.
    #[inline]
    pub fn between(start: &ScanPoint, end: &ScanPoint) -> Self {
        let dx = start.x - end.x;
        let dy = start.y - end.y;
        let dx2 = dx * dx;
        let dy2 = dy * dy;
        Self {
            dx,
            dy,
            dx2,
            dy2,
            dxdy: dx * dy,
            length_sq: dx2 + dy2,
        }
    }
}

/// The fixed reference cloud and its segment table, immutable for one match.
#[derive(Clone, Debug, Default)]
pub struct PreparedReference {
    points: Vec<ScanPoint>,
    segments: Vec<PreprocessedSegment>,
}

impl PreparedReference {
    /// Precompute segments for every adjacent pair of `points`.
    pub fn new(points: Vec<ScanPoint>) -> Self {
        let segments = points
            .windows(2)
            .map(|pair| PreprocessedSegment::between(&pair[0], &pair[1]))
            .collect();
        Self { points, segments }
    }

    /// Reference points in bearing order.
    #[inline]
    pub fn points(&self) -> &[ScanPoint] {
        &self.points
    }

    /// All segments; `segments()[i]` joins points `i` and `i + 1`.
    #[inline]
    pub fn segments(&self) -> &[PreprocessedSegment] {
        &self.segments
    }

    /// Segment joining points `index` and `index + 1`.
    #[inline]
    pub fn segment(&self, index: usize) -> Option<&PreprocessedSegment> {
        self.segments.get(index)
    }

    /// Number of reference points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if there are no reference points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;

    fn point(x: f64, y: f64) -> ScanPoint {
        ScanPoint::from_cartesian(Point2D::new(x, y))
    }

    #[test]
    fn test_segment_fields() {
        let seg = PreprocessedSegment::between(&point(1.0, 2.0), &point(4.0, -2.0));
        assert_eq!(seg.dx, -3.0);
        assert_eq!(seg.dy, 4.0);
        assert_eq!(seg.dx2, 9.0);
        assert_eq!(seg.dy2, 16.0);
        assert_eq!(seg.dxdy, -12.0);
        assert_eq!(seg.length_sq, 25.0);
    }

    #[test]
    fn test_one_segment_per_adjacent_pair() {
        let reference = PreparedReference::new(vec![
            point(1.0, 0.0),
            point(1.0, 0.5),
            point(0.5, 1.0),
        ]);
        assert_eq!(reference.len(), 3);
        assert_eq!(reference.segments().len(), 2);
        assert_eq!(
            reference.segment(1),
            Some(&PreprocessedSegment::between(&point(1.0, 0.5), &point(0.5, 1.0)))
        );
        assert!(reference.segment(2).is_none());
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let reference = PreparedReference::new(vec![point(1.0, 0.0)]);
        assert!(reference.segments().is_empty());
        assert!(!reference.is_empty());
    }
}
