//! Correlation types and the metric distance.
//!
//! A correlation pairs a current-scan point with a reference point (possibly
//! interpolated along a reference segment) and records their metric distance.

use crate::core::Point2D;

/// Metric-based squared distance between a current point and a reference point.
///
/// Squared Euclidean distance minus the share of the error that lies across
/// the reference point's bearing, scaled by `|q|² + L²`:
///
/// ```text
/// d(p, q) = |p - q|² - ((p - q) × q)² / (|q|² + L²)
/// ```
///
/// Far points (`|q| ≫ L`) tolerate more error along their bearing direction,
/// which models the range-dependent effect of a small rotation.
#[inline]
pub fn metric_distance(current: Point2D, reference: Point2D, metric_l_sq: f64) -> f64 {
    let e = current - reference;
    let cross = e.cross(reference);
    e.norm_squared() - cross * cross / (reference.norm_squared() + metric_l_sq)
}

/// A matched pair of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correlation {
    /// Point on the reference scan (a scan point or an interpolated segment point).
    pub reference: Point2D,
    /// Current-scan point, in the reference frame at the pose of the search.
    pub current: Point2D,
    /// Metric distance between the two.
    pub distance: f64,
}

impl Correlation {
    /// Create a new correlation.
    #[inline]
    pub fn new(reference: Point2D, current: Point2D, distance: f64) -> Self {
        Self {
            reference,
            current,
            distance,
        }
    }
}

/// Correlations produced by one search, plus the size of the untrimmed set.
///
/// `candidates` stays fixed through trimming so that the retained count is
/// always measured against the full set the correlations came from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrelationSet {
    correlations: Vec<Correlation>,
    candidates: usize,
}

impl CorrelationSet {
    /// Wrap a freshly searched, untrimmed set.
    pub fn new(correlations: Vec<Correlation>) -> Self {
        let candidates = correlations.len();
        Self {
            correlations,
            candidates,
        }
    }

    /// Create with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Add a correlation to an untrimmed set.
    #[inline]
    pub fn push(&mut self, correlation: Correlation) {
        self.correlations.push(correlation);
        self.candidates = self.candidates.max(self.correlations.len());
    }

    pub(crate) fn from_parts(correlations: Vec<Correlation>, candidates: usize) -> Self {
        Self {
            correlations,
            candidates,
        }
    }

    /// Number of correlations currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.correlations.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.correlations.is_empty()
    }

    /// Size of the untrimmed set.
    #[inline]
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// Borrow the correlations.
    #[inline]
    pub fn as_slice(&self) -> &[Correlation] {
        &self.correlations
    }

    /// Take ownership of the correlations.
    pub fn into_vec(self) -> Vec<Correlation> {
        self.correlations
    }

    /// Iterate over the correlations.
    pub fn iter(&self) -> std::slice::Iter<'_, Correlation> {
        self.correlations.iter()
    }

    /// Mean metric distance (0 when empty).
    pub fn mean_distance(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.correlations.iter().map(|c| c.distance).sum::<f64>() / self.len() as f64
    }

    /// Largest metric distance (0 when empty).
    pub fn max_distance(&self) -> f64 {
        self.correlations
            .iter()
            .map(|c| c.distance)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metric_distance_zero_for_same_point() {
        let p = Point2D::new(2.0, -1.0);
        assert_eq!(metric_distance(p, p, 9.0), 0.0);
    }

    #[test]
    fn test_metric_distance_radial_error_is_euclidean() {
        // Error along the bearing of q has no cross component
        let q = Point2D::new(2.0, 0.0);
        let p = Point2D::new(2.1, 0.0);
        assert_relative_eq!(metric_distance(p, q, 9.0), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_metric_distance_discounts_tangential_error() {
        let q = Point2D::new(3.0, 0.0);
        let p = Point2D::new(3.0, 0.1);
        // 0.01 - (0.1 * 3)^2 / (9 + 9) = 0.01 - 0.005
        assert_relative_eq!(metric_distance(p, q, 9.0), 0.005, epsilon = 1e-12);
        assert!(metric_distance(p, q, 9.0) < (p - q).norm_squared());
    }

    #[test]
    fn test_metric_distance_never_negative() {
        let q = Point2D::new(5.0, 1.0);
        for i in 0..20 {
            let angle = i as f64 * 0.3;
            let p = q + Point2D::from_polar(0.5, angle);
            assert!(metric_distance(p, q, 0.01) >= 0.0);
        }
    }

    #[test]
    fn test_set_statistics() {
        let mut set = CorrelationSet::with_capacity(2);
        set.push(Correlation::new(Point2D::zero(), Point2D::zero(), 0.1));
        set.push(Correlation::new(Point2D::zero(), Point2D::zero(), 0.3));
        assert_eq!(set.len(), 2);
        assert_eq!(set.candidates(), 2);
        assert_relative_eq!(set.mean_distance(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(set.max_distance(), 0.3);
    }
}
