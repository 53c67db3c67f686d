//! Match result types.

use std::fmt;
use std::time::Duration;

use crate::core::Pose2D;
use crate::error::MatchFailure;

/// How a match terminated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchStatus {
    /// The convergence test held for enough consecutive iterations.
    Converged,
    /// The iteration budget ran out. A normal negative result, not an error.
    Exhausted,
    /// The match stopped early; the pose is the best one reached.
    Failed(MatchFailure),
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Converged => write!(f, "converged"),
            MatchStatus::Exhausted => write!(f, "exhausted"),
            MatchStatus::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Statistics for one iteration of the matcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationStats {
    /// Zero-based iteration index.
    pub iteration: u32,
    /// Summed metric distance of the kept correlations after the increment.
    pub residual: f64,
    /// `residual / previous residual`.
    pub ratio: f64,
    /// Increment computed in this iteration.
    pub increment: Pose2D,
    /// Consecutive iterations meeting the convergence test, including this one.
    pub converged_streak: u32,
    /// Correlations kept after trimming.
    pub correspondences: usize,
    /// Mean metric distance of the kept correlations before the increment.
    pub mean_distance: f64,
    /// Current points whose bearing window held no reference point.
    pub empty_windows: usize,
}

/// Outcome of matching a current scan against a reference scan.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Pose the match started from.
    pub initial_pose: Pose2D,
    /// Final estimate of the current scan's pose in the reference frame.
    pub pose: Pose2D,
    /// Iterations performed (`max_iterations` when exhausted).
    pub iterations: u32,
    /// Wall-clock time spent matching.
    pub elapsed: Duration,
    /// True only for [`MatchStatus::Converged`].
    pub converged: bool,
    /// Termination reason.
    pub status: MatchStatus,
    /// Fraction of current points with a correspondence in the last search.
    pub match_ratio: f64,
    /// Correlations used by the last solved iteration.
    pub correspondences: usize,
    /// Per-iteration statistics, empty unless tracing was enabled.
    pub trace: Vec<IterationStats>,
}

impl MatchResult {
    /// Elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Failure reason, if the match stopped early.
    pub fn failure(&self) -> Option<MatchFailure> {
        match self.status {
            MatchStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Pose change from the initial estimate to the final one.
    pub fn correction(&self) -> Pose2D {
        self.pose.compose(self.initial_pose.inverse())
    }
}
