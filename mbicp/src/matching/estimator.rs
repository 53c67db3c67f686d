//! Incremental transform estimation from metric-based correlations.
//!
//! Each correlation contributes the linearized metric residual of the
//! current point moved by a small transform `(tx, ty, θ)` against its
//! reference point. Summing the closed-form partial derivatives yields a
//! symmetric 3×3 system `A·x = b`; the increment that minimizes the summed
//! residual is `-x`.
//!
//! The metric factor `k = |reference|² + L²` is the same one used by the
//! correspondence search, so the estimator minimizes the distance the
//! search ranked by.

use crate::core::Pose2D;
use crate::error::MatchFailure;

use super::correspondence::{Correlation, metric_distance};

/// Fewer correlations cannot constrain three unknowns.
const MIN_CORRELATIONS: usize = 3;

/// Relative determinant threshold for declaring the system singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Normal equations for the incremental pose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalEquations {
    /// Symmetric 3×3 matrix (row-major).
    pub a: [[f64; 3]; 3],
    /// Right-hand side.
    pub b: [f64; 3],
    /// Number of accumulated correlations.
    pub count: usize,
}

impl NormalEquations {
    /// Accumulate the system for `correlations` with metric constant `metric_l`.
    pub fn accumulate(correlations: &[Correlation], metric_l: f64) -> Self {
        let metric_l_sq = metric_l * metric_l;
        let mut system = Self::default();
        for corr in correlations {
            system.add(corr, metric_l_sq);
        }
        system.mirror();
        system
    }

    /// Add one correlation to the upper triangle and `b`.
    #[inline]
    fn add(&mut self, corr: &Correlation, metric_l_sq: f64) {
        let p = corr.reference;
        let c = corr.current;

        let k = p.norm_squared() + metric_l_sq;
        let dot = c.dot(p);
        let cross = c.cross(p);

        let a = &mut self.a;
        a[0][0] += 1.0 - p.y * p.y / k;
        a[0][1] += p.x * p.y / k;
        a[0][2] += -c.y + p.y / k * dot;
        a[1][1] += 1.0 - p.x * p.x / k;
        a[1][2] += c.x - p.x / k * dot;
        a[2][2] += c.norm_squared() - dot * dot / k;

        self.b[0] += c.x - p.x - p.y / k * cross;
        self.b[1] += c.y - p.y + p.x / k * cross;
        self.b[2] += (dot / k - 1.0) * cross;

        self.count += 1;
    }

    fn mirror(&mut self) {
        self.a[1][0] = self.a[0][1];
        self.a[2][0] = self.a[0][2];
        self.a[2][1] = self.a[1][2];
    }

    /// Solve for the incremental pose, or `None` if the system is singular.
    pub fn solve(&self) -> Option<Pose2D> {
        if self.count < MIN_CORRELATIONS {
            return None;
        }
        let [dx, dy, dtheta] = solve_3x3(&self.a, &self.b)?;
        // Not normalized: the increment stays small and is composed directly
        Some(Pose2D {
            x: dx,
            y: dy,
            theta: dtheta,
        })
    }
}

/// Solve `A·x = -b` by cofactor inversion.
fn solve_3x3(a: &[[f64; 3]; 3], b: &[f64; 3]) -> Option<[f64; 3]> {
    if a.iter().flatten().chain(b.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let c00 = a[1][1] * a[2][2] - a[1][2] * a[2][1];
    let c01 = a[1][2] * a[2][0] - a[1][0] * a[2][2];
    let c02 = a[1][0] * a[2][1] - a[1][1] * a[2][0];
    let det = a[0][0] * c00 + a[0][1] * c01 + a[0][2] * c02;

    let scale = (a[0][0] * a[1][1] * a[2][2]).abs();
    if !det.is_finite() || det.abs() <= SINGULAR_EPSILON * scale {
        return None;
    }

    let inv_det = 1.0 / det;
    let inv = [
        [
            c00 * inv_det,
            (a[0][2] * a[2][1] - a[0][1] * a[2][2]) * inv_det,
            (a[0][1] * a[1][2] - a[0][2] * a[1][1]) * inv_det,
        ],
        [
            c01 * inv_det,
            (a[0][0] * a[2][2] - a[0][2] * a[2][0]) * inv_det,
            (a[0][2] * a[1][0] - a[0][0] * a[1][2]) * inv_det,
        ],
        [
            c02 * inv_det,
            (a[0][1] * a[2][0] - a[0][0] * a[2][1]) * inv_det,
            (a[0][0] * a[1][1] - a[0][1] * a[1][0]) * inv_det,
        ],
    ];

    let x = [
        -(inv[0][0] * b[0] + inv[0][1] * b[1] + inv[0][2] * b[2]),
        -(inv[1][0] * b[0] + inv[1][1] * b[1] + inv[1][2] * b[2]),
        -(inv[2][0] * b[0] + inv[2][1] * b[1] + inv[2][2] * b[2]),
    ];
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Incremental pose that best aligns the current points of `correlations`
/// with their reference points.
pub fn estimate_increment(
    correlations: &[Correlation],
    metric_l: f64,
) -> Result<Pose2D, MatchFailure> {
    NormalEquations::accumulate(correlations, metric_l)
        .solve()
        .ok_or(MatchFailure::SingularSystem)
}

/// Summed metric distance of the correlations after moving each current
/// point by `increment`.
pub fn association_residual(correlations: &[Correlation], increment: Pose2D, metric_l: f64) -> f64 {
    let metric_l_sq = metric_l * metric_l;
    correlations
        .iter()
        .map(|c| metric_distance(increment.transform_point(c.current), c.reference, metric_l_sq))
        .sum()
}
