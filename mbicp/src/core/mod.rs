//! Core types for the matcher.
//!
//! - [`Point2D`]: 2D point / vector
//! - [`Pose2D`]: rigid 2D transform with composition
//! - [`RangeScan`] and [`RangeSample`]: raw bearing-sorted laser scans
//! - [`math`]: angle helpers

pub mod math;
mod point;
mod pose;
mod scan;

pub use point::Point2D;
pub use pose::Pose2D;
pub use scan::{RangeSample, RangeScan, ScanRole};
