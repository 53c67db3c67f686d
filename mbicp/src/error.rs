//! Error types for the matcher.

use thiserror::Error;

use crate::core::ScanRole;

/// Result type alias
pub type Result<T> = std::result::Result<T, MatchError>;

/// Input or configuration problems detected before iterating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// The scan has no samples at all.
    #[error("{role} scan is empty")]
    EmptyScan {
        /// Offending scan
        role: ScanRole,
    },

    /// Every sample was invalid or beyond the maximum range.
    #[error("{role} scan has no valid samples within range")]
    NoValidPoints {
        /// Offending scan
        role: ScanRole,
    },

    /// A bearing is smaller than the one before it.
    #[error("{role} scan bearings decrease at sample {index}")]
    NonMonotonicBearing {
        /// Offending scan
        role: ScanRole,
        /// Index of the first out-of-order sample
        index: usize,
    },

    /// A bearing is NaN or infinite.
    #[error("{role} scan has a non-finite bearing at sample {index}")]
    NonFiniteBearing {
        /// Offending scan
        role: ScanRole,
        /// Index of the sample
        index: usize,
    },

    /// Unit factor is zero, negative or not finite.
    #[error("{role} scan has invalid unit factor {factor}")]
    InvalidUnitFactor {
        /// Offending scan
        role: ScanRole,
        /// The rejected factor
        factor: f64,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Reasons a match stopped early without converging.
///
/// These are reported inside [`MatchResult`](crate::matching::MatchResult),
/// together with the best pose found so far.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MatchFailure {
    /// Too few current-scan points found an acceptable correspondence.
    #[error("insufficient correspondences: {ratio:.3} of points matched, {min_ratio:.3} required")]
    InsufficientCorrespondences {
        /// Fraction of current points that matched
        ratio: f64,
        /// Configured minimum fraction
        min_ratio: f64,
    },

    /// The least-squares normal equations are singular or ill-conditioned.
    #[error("singular least-squares system")]
    SingularSystem,

    /// The caller-supplied deadline passed before convergence.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}
