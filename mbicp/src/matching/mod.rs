//! Scan-to-scan matching with metric-based ICP.
//!
//! # Components
//!
//! - **Projection**: range scans to bearing-ordered point clouds
//! - **Reference**: the fixed reference cloud and its segment table
//! - **Search**: windowed metric closest-point correspondences
//! - **Filter**: trimming of the worst correspondences
//! - **Estimator**: 3×3 normal equations for the incremental pose
//! - **Matcher**: the iteration controller tying it together
//!
//! # Usage
//!
//! ```rust,no_run
//! use mbicp::config::MbIcpConfig;
//! use mbicp::core::{Pose2D, RangeScan};
//! use mbicp::matching::MbIcpMatcher;
//!
//! # fn scans() -> (RangeScan, RangeScan) { unimplemented!() }
//! let (previous, latest) = scans();
//! let matcher = MbIcpMatcher::new(MbIcpConfig::default());
//!
//! let result = matcher.match_scans(&previous, &latest, Pose2D::identity())?;
//! if result.converged {
//!     println!("Pose: ({:.3}, {:.3}, {:.3})",
//!         result.pose.x, result.pose.y, result.pose.theta);
//! }
//! # Ok::<(), mbicp::error::MatchError>(())
//! ```

pub mod correspondence;
pub mod estimator;
pub mod filter;
pub mod matcher;
pub mod projection;
pub mod reference;
pub mod search;
mod traits;
mod types;

// Re-export main types
pub use correspondence::{Correlation, CorrelationSet, metric_distance};
pub use estimator::{NormalEquations, association_residual, estimate_increment};
pub use filter::CorrelationFilter;
pub use matcher::MbIcpMatcher;
pub use projection::{ScanPoint, apply_projection_filter, project_scan, usable_samples};
pub use reference::{PreparedReference, PreprocessedSegment};
pub use search::{CorrespondenceSearch, SearchOutcome};
pub use traits::ScanMatcher;
pub use types::{IterationStats, MatchResult, MatchStatus};
