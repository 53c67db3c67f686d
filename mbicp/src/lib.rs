//! # MbICP: Metric-Based 2D Laser Scan Matching
//!
//! Estimates the rigid 2D transform (translation + rotation) that aligns a
//! laser range scan with a reference scan, using the metric-based variant of
//! Iterative Closest Point. The metric discounts error along each reference
//! point's bearing in proportion to its range, so rotations are found as
//! readily as translations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mbicp::{MbIcpConfig, MbIcpMatcher, Pose2D, RangeScan};
//!
//! let bearings: Vec<f64> = (0..181).map(|i| (i as f64 - 90.0).to_radians()).collect();
//! let previous = RangeScan::from_ranges(&vec![2.0; 181], &bearings);
//! let latest = RangeScan::from_ranges(&vec![1.95; 181], &bearings);
//!
//! let matcher = MbIcpMatcher::new(MbIcpConfig::default());
//! let result = matcher.match_scans(&previous, &latest, Pose2D::identity())?;
//! println!("Pose: ({:.3}, {:.3}, {:.3}) after {} iterations [{}]",
//!     result.pose.x, result.pose.y, result.pose.theta,
//!     result.iterations, result.status);
//! # Ok::<(), mbicp::MatchError>(())
//! ```
//!
//! ## Coordinate Frame
//!
//! - The reference scan's sensor sits at the origin with pose identity
//! - Bearings are radians, counter-clockwise positive from the sensor X-axis
//! - A pose maps points from the current sensor frame into the reference frame
//!
//! ## Data Flow
//!
//! ```text
//!   reference scan            current scan ◄──────────────┐
//!        │                         │ project at pose       │
//!        ▼                         ▼                       │
//!   PreparedReference ──► CorrespondenceSearch             │
//!   (points + segments)            │                       │
//!                                  ▼                       │
//!                          CorrelationFilter               │
//!                                  │                       │
//!                                  ▼                       │
//!                        estimate_increment ── pose = Δ ∘ pose
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Points, poses, range scans, angle math
//! - [`config`]: Matcher configuration and YAML loading
//! - [`matching`]: The matching engine
//! - [`error`]: Error types

pub mod config;
pub mod core;
pub mod error;
pub mod matching;

// Re-export main types at crate root
pub use crate::config::{ConfigLoadError, MbIcpConfig, ScaledParams};
pub use crate::core::{Point2D, Pose2D, RangeSample, RangeScan, ScanRole};
pub use error::{MatchError, MatchFailure, Result};
pub use matching::{IterationStats, MatchResult, MatchStatus, MbIcpMatcher, ScanMatcher};
