//! Projection of raw range scans into Cartesian point clouds.

use crate::core::math::normalize_angle;
use crate::core::{Point2D, Pose2D, RangeScan};

/// A projected scan point.
///
/// `range` and `bearing` are polar coordinates of `(x, y)` in the frame the
/// scan was projected into, not the raw sensor values. The bearing is what
/// orders points for the windowed correspondence search, so it is not
/// wrapped into [-π, π): a projected sample keeps the branch of its raw
/// bearing, and a full 360° scan stays sorted across the ±π seam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanPoint {
    /// X coordinate in the projection frame.
    pub x: f64,
    /// Y coordinate in the projection frame.
    pub y: f64,
    /// Distance from the projection-frame origin.
    pub range: f64,
    /// `atan2(y, x)` in the projection frame, up to a multiple of 2π.
    pub bearing: f64,
}

impl ScanPoint {
    /// Build a point from Cartesian coordinates, computing its polar fields.
    #[inline]
    pub fn from_cartesian(position: Point2D) -> Self {
        Self {
            x: position.x,
            y: position.y,
            range: position.norm(),
            bearing: position.bearing(),
        }
    }

    /// Like [`from_cartesian`](Self::from_cartesian), with the bearing
    /// unwrapped to lie within π of `bearing_hint`.
    #[inline]
    pub fn from_cartesian_near(position: Point2D, bearing_hint: f64) -> Self {
        let bearing = position.bearing();
        Self {
            x: position.x,
            y: position.y,
            range: position.norm(),
            bearing: bearing_hint + normalize_angle(bearing - bearing_hint),
        }
    }

    /// Cartesian position.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

#[inline]
fn usable_range(scan: &RangeScan, range: f64, max_range: f64) -> Option<f64> {
    let scaled = range * scan.unit_factor;
    (scaled.is_finite() && scaled < max_range).then_some(scaled)
}

/// Project a range scan at `pose`.
///
/// Invalid samples, non-finite ranges and ranges at or beyond `max_range`
/// (after unit scaling) are skipped. Sample order is preserved, and each
/// point's bearing stays within π of `sample.bearing + pose.theta`.
pub fn project_scan(scan: &RangeScan, pose: Pose2D, max_range: f64) -> Vec<ScanPoint> {
    let mut points = Vec::with_capacity(scan.len());
    for sample in scan.samples.iter().filter(|s| s.valid) {
        let Some(range) = usable_range(scan, sample.range, max_range) else {
            continue;
        };
        let local = Point2D::from_polar(range, sample.bearing);
        points.push(ScanPoint::from_cartesian_near(
            pose.transform_point(local),
            sample.bearing + pose.theta,
        ));
    }
    points
}

/// Number of samples [`project_scan`] would keep. Independent of the pose.
pub fn usable_samples(scan: &RangeScan, max_range: f64) -> usize {
    scan.samples
        .iter()
        .filter(|s| s.valid && usable_range(scan, s.range, max_range).is_some())
        .count()
}

/// Keep only points whose bearing does not decrease relative to the last kept point.
///
/// After a rotation/translation some points fall behind others as seen from
/// the reference origin; they cannot be observed and they would break the
/// bearing order the windowed search needs. The first point is always kept.
pub fn apply_projection_filter(points: &mut Vec<ScanPoint>) {
    let mut last_bearing = f64::NEG_INFINITY;
    points.retain(|p| {
        if p.bearing >= last_bearing {
            last_bearing = p.bearing;
            true
        } else {
            false
        }
    });
}
