//! Traits for scan matching algorithms.
//!
//! This module defines the `ScanMatcher` trait so that scan-to-scan
//! matchers can be swapped behind one interface.

use crate::core::{Pose2D, RangeScan};
use crate::error::Result;

use super::MatchResult;

/// Trait for scan-to-scan matching algorithms.
///
/// # Example
///
/// ```rust,ignore
/// use mbicp::matching::{MbIcpMatcher, ScanMatcher};
/// use mbicp::core::Pose2D;
///
/// fn odometry_step<M: ScanMatcher>(
///     matcher: &M,
///     previous: &RangeScan,
///     latest: &RangeScan,
///     predicted: Pose2D,
/// ) -> Pose2D {
///     match matcher.match_scans(previous, latest, predicted) {
///         Ok(result) if result.converged => result.pose,
///         _ => predicted,
///     }
/// }
/// ```
pub trait ScanMatcher: Send + Sync {
    /// Estimate the pose of `current` in the frame of `reference`.
    ///
    /// # Arguments
    /// * `reference` - Scan whose pose is fixed at identity
    /// * `current` - Scan to align
    /// * `initial_pose` - Starting estimate (e.g. from odometry)
    fn match_scans(
        &self,
        reference: &RangeScan,
        current: &RangeScan,
        initial_pose: Pose2D,
    ) -> Result<MatchResult>;

    /// Get the name of this matcher for logging/debugging
    fn name(&self) -> &str;
}
