//! Windowed metric-based correspondence search.
//!
//! For each current point, only reference points whose bearing lies within
//! `±Bw` of the current point's bearing are candidates. Both clouds are
//! walked in increasing bearing order, so the window bounds `L` and `R` only
//! ever move forward and the whole search is linear in the cloud sizes.
//!
//! ```text
//!   reference:  ──●────●────●────●────●────●──▶ bearing
//!                      L              R
//!                      └──── bearing ± Bw ────┘
//!   current:                   ○
//! ```
//!
//! Inside the window the closest point is chosen under the metric distance,
//! either a single reference point (`L == R`) or the best point over all
//! segments `[J-1, J]` with `L < J <= R`, interpolating along a segment when
//! it is short enough to trust.

use log::trace;

use crate::config::ScaledParams;
use crate::core::Point2D;

use super::correspondence::{Correlation, CorrelationSet, metric_distance};
use super::projection::ScanPoint;
use super::reference::PreparedReference;

/// Result of one correspondence search.
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    /// Accepted correlations, unsorted.
    pub set: CorrelationSet,
    /// Number of current points searched.
    pub considered: usize,
    /// `set.len() / considered`; 0 when nothing was searched.
    pub match_ratio: f64,
    /// Current points with no reference point inside their bearing window.
    pub empty_windows: usize,
}

/// Candidate reference indices for one current point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Window {
    /// Exactly one reference point.
    Single(usize),
    /// Points `left..=right`, i.e. segments `left..right`.
    Span { left: usize, right: usize },
    /// No reference point within the bearing window.
    Empty,
}

/// Two-pointer cursor over a bearing-sorted reference cloud.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WindowCursor {
    left: usize,
    right: usize,
}

impl WindowCursor {
    /// Move the window to `bearing ± half_width`.
    ///
    /// Successive calls must use non-decreasing bearings; the bounds never
    /// move backwards.
    pub(crate) fn advance(
        &mut self,
        reference: &[ScanPoint],
        bearing: f64,
        half_width: f64,
    ) -> Window {
        let Some(last) = reference.len().checked_sub(1) else {
            return Window::Empty;
        };

        // `left` may run past the end once the current bearing leaves the reference arc
        while self.left < reference.len() && bearing - half_width > reference[self.left].bearing {
            self.left += 1;
        }
        while self.right < last && bearing + half_width > reference[self.right + 1].bearing {
            self.right += 1;
        }

        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Equal => Window::Single(self.left),
            std::cmp::Ordering::Less => Window::Span {
                left: self.left,
                right: self.right,
            },
            std::cmp::Ordering::Greater => Window::Empty,
        }
    }
}

/// Metric-based closest-point search between a prepared reference and a current cloud.
#[derive(Clone, Copy, Debug)]
pub struct CorrespondenceSearch {
    angular_window: f64,
    radial_window: f64,
    max_interpolation_sq: f64,
    metric_l_sq: f64,
}

impl CorrespondenceSearch {
    /// Create a search from unit-scaled parameters and the angular window Bw.
    pub fn new(params: &ScaledParams, angular_window: f64) -> Self {
        Self {
            angular_window,
            radial_window: params.radial_window,
            max_interpolation_sq: params.max_interpolation_distance
                * params.max_interpolation_distance,
            metric_l_sq: params.metric_l_sq,
        }
    }

    /// Find a correspondence for every current point that has one within Br.
    ///
    /// `current` must be sorted by bearing (see
    /// [`apply_projection_filter`](super::apply_projection_filter)).
    pub fn search(&self, reference: &PreparedReference, current: &[ScanPoint]) -> SearchOutcome {
        let ref_points = reference.points();
        let mut set = CorrelationSet::with_capacity(current.len());

        let Some(first) = ref_points.first() else {
            return SearchOutcome {
                set,
                considered: current.len(),
                match_ratio: 0.0,
                empty_windows: current.len(),
            };
        };

        // Current points whose window closes before the first reference bearing
        let start = current
            .iter()
            .position(|c| c.bearing + self.angular_window >= first.bearing)
            .unwrap_or(current.len());

        let mut cursor = WindowCursor::default();
        let mut empty_windows = start;

        for point in &current[start..] {
            let p = point.position();
            let best = match cursor.advance(ref_points, point.bearing, self.angular_window) {
                Window::Single(index) => {
                    let q = ref_points[index].position();
                    Some((q, metric_distance(p, q, self.metric_l_sq)))
                }
                Window::Span { left, right } => self.closest_in_span(reference, left, right, p),
                Window::Empty => {
                    empty_windows += 1;
                    None
                }
            };

            if let Some((q, distance)) = best.filter(|&(_, d)| d < self.radial_window) {
                set.push(Correlation::new(q, p, distance));
            }
        }

        if empty_windows > 0 {
            trace!(
                "Correspondence search: {} points had an empty bearing window",
                empty_windows
            );
        }

        let considered = current.len();
        let match_ratio = if considered == 0 {
            0.0
        } else {
            set.len() as f64 / considered as f64
        };

        SearchOutcome {
            set,
            considered,
            match_ratio,
            empty_windows,
        }
    }

    /// Closest reference point to `p` over segments `left..right` under the metric.
    fn closest_in_span(
        &self,
        reference: &PreparedReference,
        left: usize,
        right: usize,
        p: Point2D,
    ) -> Option<(Point2D, f64)> {
        let points = reference.points();

        // Metric inverse around the current point
        let a = 1.0 / (p.norm_squared() + self.metric_l_sq);
        let b = 1.0 - a * p.y * p.y;
        let c = 1.0 - a * p.x * p.x;
        let d = a * p.x * p.y;

        let mut best: Option<(Point2D, f64)> = None;

        for j in (left + 1)..=right {
            let Some(seg) = reference.segment(j - 1) else {
                continue;
            };
            let q1 = points[j - 1].position();
            let q2 = points[j].position();

            let dqp = q1 - p;
            let numerator = d * (seg.dx * dqp.y + seg.dy * dqp.x)
                + b * seg.dx * dqp.x
                + c * seg.dy * dqp.y;
            let denominator = b * seg.dx2 + c * seg.dy2 + 2.0 * d * seg.dxdy;
            // Zero only for coincident endpoints
            let lambda = if denominator > 0.0 {
                numerator / denominator
            } else {
                0.0
            };

            let q = if lambda < 0.0 {
                q1
            } else if lambda > 1.0 {
                q2
            } else if seg.length_sq < self.max_interpolation_sq {
                q1.lerp(q2, lambda)
            } else if lambda < 0.5 {
                q1
            } else {
                q2
            };

            let distance = metric_distance(p, q, self.metric_l_sq);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((q, distance));
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MbIcpConfig;
    use approx::assert_relative_eq;

    fn arc(n: usize, range: f64, start: f64, step: f64) -> Vec<ScanPoint> {
        (0..n)
            .map(|i| ScanPoint::from_cartesian(Point2D::from_polar(range, start + i as f64 * step)))
            .collect()
    }

    fn search_with(config: &MbIcpConfig) -> CorrespondenceSearch {
        CorrespondenceSearch::new(&ScaledParams::new(config, 1.0), config.angular_window)
    }

    #[test]
    fn test_cursor_tracks_bearing_window() {
        // Reference bearings 0.0, 0.1, ..., 1.0
        let reference = arc(11, 2.0, 0.0, 0.1);
        let mut cursor = WindowCursor::default();

        assert_eq!(
            cursor.advance(&reference, 0.42, 0.15),
            Window::Span { left: 3, right: 5 }
        );
        assert_eq!(cursor.advance(&reference, 0.71, 0.05), Window::Single(7));
        assert_eq!(cursor.advance(&reference, 0.86, 0.02), Window::Empty);
        // Past the last reference bearing
        assert_eq!(cursor.advance(&reference, 1.5, 0.1), Window::Empty);
    }

    #[test]
    fn test_cursor_never_moves_backwards() {
        let reference = arc(11, 2.0, 0.0, 0.1);
        let mut cursor = WindowCursor::default();
        cursor.advance(&reference, 0.8, 0.05);
        let (left, right) = (cursor.left, cursor.right);

        cursor.advance(&reference, 0.1, 0.05);
        assert!(cursor.left >= left);
        assert!(cursor.right >= right);
    }

    #[test]
    fn test_cursor_on_empty_reference() {
        let mut cursor = WindowCursor::default();
        assert_eq!(cursor.advance(&[], 0.0, 0.5), Window::Empty);
    }

    #[test]
    fn test_single_candidate_match() {
        let config = MbIcpConfig::default().with_angular_window(0.01);
        let reference = PreparedReference::new(arc(3, 2.0, 0.0, 0.5));
        let current = vec![ScanPoint::from_cartesian(Point2D::from_polar(2.05, 0.5))];

        let outcome = search_with(&config).search(&reference, &current);
        assert_eq!(outcome.set.len(), 1);
        let corr = outcome.set.as_slice()[0];
        assert_relative_eq!(corr.reference.x, reference.points()[1].x, epsilon = 1e-12);
        assert_relative_eq!(corr.distance, 0.0025, epsilon = 1e-9);
        assert_relative_eq!(outcome.match_ratio, 1.0);
    }

    #[test]
    fn test_interpolates_inside_short_segment() {
        // Wall x = 2 sampled every 0.1m
        let points: Vec<ScanPoint> = (0..11)
            .map(|i| ScanPoint::from_cartesian(Point2D::new(2.0, -0.5 + i as f64 * 0.1)))
            .collect();
        let reference = PreparedReference::new(points);
        let current = vec![ScanPoint::from_cartesian(Point2D::new(2.02, 0.03))];

        let outcome = search_with(&MbIcpConfig::default()).search(&reference, &current);
        assert_eq!(outcome.set.len(), 1);
        let corr = outcome.set.as_slice()[0];
        // Closest point lies on the wall between samples, not on a sample
        assert_relative_eq!(corr.reference.x, 2.0, epsilon = 1e-9);
        assert!(corr.reference.y > 0.0 && corr.reference.y < 0.1);
        assert!(corr.distance < 0.02 * 0.02 + 1e-9);
    }

    #[test]
    fn test_long_segment_snaps_to_endpoint() {
        // Two points 2m apart on the wall x = 2
        let points = vec![
            ScanPoint::from_cartesian(Point2D::new(2.0, -1.0)),
            ScanPoint::from_cartesian(Point2D::new(2.0, 1.0)),
        ];
        let reference = PreparedReference::new(points);
        let current = vec![ScanPoint::from_cartesian(Point2D::new(2.0, -0.7))];

        let config = MbIcpConfig::default().with_angular_window(1.0);
        let outcome = search_with(&config).search(&reference, &current);
        let corr = outcome.set.as_slice()[0];
        assert_relative_eq!(corr.reference.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_points_outside_all_windows_are_not_matched() {
        let config = MbIcpConfig::default().with_angular_window(0.1);
        let reference = PreparedReference::new(arc(5, 2.0, 0.0, 0.05));
        let current = vec![
            ScanPoint::from_cartesian(Point2D::from_polar(2.0, -1.0)),
            ScanPoint::from_cartesian(Point2D::from_polar(2.0, 0.1)),
            ScanPoint::from_cartesian(Point2D::from_polar(2.0, 2.0)),
        ];

        let outcome = search_with(&config).search(&reference, &current);
        assert_eq!(outcome.considered, 3);
        assert_eq!(outcome.set.len(), 1);
        assert_relative_eq!(outcome.match_ratio, 1.0 / 3.0, epsilon = 1e-12);
        // One before the arc, one past it
        assert_eq!(outcome.empty_windows, 2);
    }

    #[test]
    fn test_rejects_beyond_radial_window() {
        let reference = PreparedReference::new(arc(5, 2.0, 0.0, 0.05));
        let current = vec![ScanPoint::from_cartesian(Point2D::from_polar(3.0, 0.1))];

        let outcome = search_with(&MbIcpConfig::default()).search(&reference, &current);
        assert!(outcome.set.is_empty());
        assert_eq!(outcome.match_ratio, 0.0);
        assert_eq!(outcome.empty_windows, 0);
    }

    #[test]
    fn test_duplicate_reference_points() {
        let p = ScanPoint::from_cartesian(Point2D::new(2.0, 0.0));
        let reference = PreparedReference::new(vec![p, p, p]);
        let current = vec![ScanPoint::from_cartesian(Point2D::new(2.01, 0.0))];

        let outcome = search_with(&MbIcpConfig::default()).search(&reference, &current);
        assert_eq!(outcome.set.len(), 1);
        assert!(outcome.set.as_slice()[0].distance.is_finite());
    }
}
