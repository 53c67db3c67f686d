//! Metric-based ICP iteration controller.
//!
//! # Algorithm
//!
//! ```text
//! Input: reference scan R (pose fixed at identity), current scan C, initial pose q₀
//! Output: pose q aligning C to R
//!
//! 1. Project R once, precompute its segment table
//! 2. Repeat until converged or out of iterations:
//!    a. Project C at q (projection filter keeps it bearing-ordered)
//!    b. Windowed metric closest-point search → correlations
//!    c. Keep the best fraction F of correlations
//!    d. Solve the 3×3 normal equations for the increment Δ
//!    e. q = Δ ∘ q
//!    f. Residual of the kept correlations under Δ; compare with the last one
//! 3. Converged once more than `smooth_convergence_iterations` consecutive
//!    iterations either barely changed the residual or produced a tiny Δ
//! ```

use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::config::{MbIcpConfig, ScaledParams};
use crate::core::{Pose2D, RangeScan, ScanRole};
use crate::error::{MatchError, MatchFailure, Result};

use super::ScanMatcher;
use super::estimator::{association_residual, estimate_increment};
use super::filter::CorrelationFilter;
use super::projection::{apply_projection_filter, project_scan, usable_samples};
use super::reference::PreparedReference;
use super::search::CorrespondenceSearch;
use super::types::{IterationStats, MatchResult, MatchStatus};

/// Residual baseline before the first iteration, large enough that the first
/// ratio test cannot pass by accident.
const INITIAL_RESIDUAL: f64 = 1e6;

/// Metric-based ICP scan matcher.
///
/// Holds only read-only configuration; every call builds its own unit-scaled
/// parameters and reference table, so one matcher can serve several threads.
#[derive(Clone, Debug, Default)]
pub struct MbIcpMatcher {
    config: MbIcpConfig,
}

/// Iteration controller state.
#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Running,
    Converged,
    Failed(MatchFailure),
    Exhausted,
}

impl State {
    fn terminal_status(self) -> Option<MatchStatus> {
        match self {
            State::Running => None,
            State::Converged => Some(MatchStatus::Converged),
            State::Failed(reason) => Some(MatchStatus::Failed(reason)),
            State::Exhausted => Some(MatchStatus::Exhausted),
        }
    }
}

/// Per-call loop state.
struct Alignment<'a> {
    config: &'a MbIcpConfig,
    params: ScaledParams,
    reference: PreparedReference,
    current: &'a RangeScan,
    search: CorrespondenceSearch,
    filter: CorrelationFilter,

    pose: Pose2D,
    iteration: u32,
    streak: u32,
    previous_residual: f64,
    match_ratio: f64,
    correspondences: usize,
    trace: Vec<IterationStats>,
}

impl MbIcpMatcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: MbIcpConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MbIcpConfig {
        &self.config
    }

    /// Align `current` to `reference`, starting from `initial_pose`.
    ///
    /// Returns `Err` only for invalid input or configuration. Non-convergence
    /// and early failures are reported through [`MatchResult::status`].
    pub fn match_scans(
        &self,
        reference: &RangeScan,
        current: &RangeScan,
        initial_pose: Pose2D,
    ) -> Result<MatchResult> {
        self.run(reference, current, initial_pose, None)
    }

    /// Like [`match_scans`](Self::match_scans), but gives up with
    /// [`MatchFailure::DeadlineExceeded`] once `deadline` has passed.
    ///
    /// The deadline is checked at the start of every iteration.
    pub fn match_scans_until(
        &self,
        reference: &RangeScan,
        current: &RangeScan,
        initial_pose: Pose2D,
        deadline: Instant,
    ) -> Result<MatchResult> {
        self.run(reference, current, initial_pose, Some(deadline))
    }

    fn run(
        &self,
        reference: &RangeScan,
        current: &RangeScan,
        initial_pose: Pose2D,
        deadline: Option<Instant>,
    ) -> Result<MatchResult> {
        let start = Instant::now();

        self.config.validate()?;
        reference.validate(ScanRole::Reference)?;
        current.validate(ScanRole::Current)?;

        let params = ScaledParams::new(&self.config, reference.unit_factor);
        if usable_samples(reference, params.max_laser_range) == 0 {
            return Err(MatchError::NoValidPoints {
                role: ScanRole::Reference,
            });
        }
        if usable_samples(current, params.max_laser_range) == 0 {
            return Err(MatchError::NoValidPoints {
                role: ScanRole::Current,
            });
        }

        let reference_points =
            project_scan(reference, Pose2D::identity(), params.max_laser_range);
        let prepared = PreparedReference::new(reference_points);
        trace!(
            "MbICP reference: {} points, {} segments",
            prepared.len(),
            prepared.segments().len()
        );

        let mut alignment = Alignment {
            config: &self.config,
            params,
            reference: prepared,
            current,
            search: CorrespondenceSearch::new(&params, self.config.angular_window),
            filter: CorrelationFilter::new(self.config.trim_fraction),
            pose: initial_pose,
            iteration: 0,
            streak: 0,
            previous_residual: INITIAL_RESIDUAL,
            match_ratio: 0.0,
            correspondences: 0,
            trace: Vec::new(),
        };

        let status = loop {
            let state = if alignment.iteration >= self.config.max_iterations {
                State::Exhausted
            } else if deadline.is_some_and(|d| Instant::now() >= d) {
                State::Failed(MatchFailure::DeadlineExceeded)
            } else {
                alignment.step()
            };
            if let Some(status) = state.terminal_status() {
                break status;
            }
        };

        Ok(alignment.finish(initial_pose, status, start.elapsed()))
    }
}

impl Alignment<'_> {
    /// One full iteration.
    fn step(&mut self) -> State {
        let mut points = project_scan(self.current, self.pose, self.params.max_laser_range);
        if self.config.projection_filter {
            apply_projection_filter(&mut points);
        }

        let outcome = self.search.search(&self.reference, &points);
        self.match_ratio = outcome.match_ratio;
        if outcome.match_ratio < self.config.min_correspondence_ratio {
            return State::Failed(MatchFailure::InsufficientCorrespondences {
                ratio: outcome.match_ratio,
                min_ratio: self.config.min_correspondence_ratio,
            });
        }

        let kept = self.filter.apply(outcome.set);
        let increment = match estimate_increment(kept.as_slice(), self.params.metric_l) {
            Ok(increment) => increment,
            Err(failure) => return State::Failed(failure),
        };
        self.correspondences = kept.len();
        self.pose = increment.compose(self.pose);

        let residual = association_residual(kept.as_slice(), increment, self.params.metric_l);
        let ratio = residual_ratio(residual, self.previous_residual);

        let min_error = self.config.min_error;
        if (1.0 - ratio).abs() <= min_error || increment.is_within(min_error) {
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        trace!(
            "MbICP iter {}: residual={:.6e} ratio={:.6} inc=({:.5}, {:.5}, {:.5}) streak={} corr={} dist(mean={:.4e}, max={:.4e}) empty={}",
            self.iteration,
            residual,
            ratio,
            increment.x,
            increment.y,
            increment.theta,
            self.streak,
            kept.len(),
            kept.mean_distance(),
            kept.max_distance(),
            outcome.empty_windows
        );

        if self.config.record_trace {
            self.trace.push(IterationStats {
                iteration: self.iteration,
                residual,
                ratio,
                increment,
                converged_streak: self.streak,
                correspondences: kept.len(),
                mean_distance: kept.mean_distance(),
                empty_windows: outcome.empty_windows,
            });
        }

        self.previous_residual = residual;
        self.iteration += 1;

        if self.streak > self.config.smooth_convergence_iterations {
            State::Converged
        } else {
            State::Running
        }
    }

    fn finish(self, initial_pose: Pose2D, status: MatchStatus, elapsed: Duration) -> MatchResult {
        let iterations = match status {
            MatchStatus::Exhausted => self.config.max_iterations,
            _ => self.iteration,
        };

        match status {
            MatchStatus::Failed(reason) => warn!(
                "MbICP failed after {} iterations: {} (pose {:.3}, {:.3}, {:.3})",
                iterations, reason, self.pose.x, self.pose.y, self.pose.theta
            ),
            _ => debug!(
                "MbICP {} after {} iterations in {:.2}ms: pose ({:.4}, {:.4}, {:.4}), match ratio {:.2}",
                status,
                iterations,
                elapsed.as_secs_f64() * 1000.0,
                self.pose.x,
                self.pose.y,
                self.pose.theta,
                self.match_ratio
            ),
        }

        MatchResult {
            initial_pose,
            pose: self.pose,
            iterations,
            elapsed,
            converged: status == MatchStatus::Converged,
            status,
            match_ratio: self.match_ratio,
            correspondences: self.correspondences,
            trace: self.trace,
        }
    }
}

/// `residual / previous`, defined for a zero previous residual.
#[inline]
fn residual_ratio(residual: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        residual / previous
    } else if residual == 0.0 {
        1.0
    } else {
        f64::INFINITY
    }
}

impl ScanMatcher for MbIcpMatcher {
    fn match_scans(
        &self,
        reference: &RangeScan,
        current: &RangeScan,
        initial_pose: Pose2D,
    ) -> Result<MatchResult> {
        MbIcpMatcher::match_scans(self, reference, current, initial_pose)
    }

    fn name(&self) -> &str {
        "MbICP"
    }
}
