//! 2D pose type for sensor position and orientation.
//!
//! Coordinate frame follows ROS REP-103:
//! - X-forward, Y-left, Z-up (right-handed)
//! - Counter-clockwise positive rotation

use serde::{Deserialize, Serialize};

use super::math::{angles_approx_equal, normalize_angle};
use super::point::Point2D;

/// A 2D rigid transform: translation `(x, y)` and rotation `theta`.
///
/// # Composition
///
/// ```
/// use mbicp::core::Pose2D;
/// use std::f64::consts::FRAC_PI_2;
///
/// let a = Pose2D::new(1.0, 0.0, FRAC_PI_2);
/// let b = Pose2D::new(1.0, 0.0, 0.0);
/// let c = a.compose(b); // apply `b`, then `a`
/// assert!((c.x - 1.0).abs() < 1e-12);
/// assert!((c.y - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f64,
    /// Y position in meters.
    pub y: f64,
    /// Heading angle in radians, CCW positive from X-axis.
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose. The angle is normalized to [-π, π).
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Identity transform.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Translation part.
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Map a point from this pose's local frame into the parent frame.
    #[inline]
    pub fn transform_point(self, point: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        Point2D {
            x: self.x + point.x * cos - point.y * sin,
            y: self.y + point.x * sin + point.y * cos,
        }
    }

    /// Compose this pose with another.
    ///
    /// The result maps a point `p` to `self.transform_point(other.transform_point(p))`,
    /// i.e. `other` is applied first and `self` second.
    #[inline]
    pub fn compose(self, other: Pose2D) -> Self {
        let pos = self.transform_point(other.position());
        Self::new(pos.x, pos.y, self.theta + other.theta)
    }

    /// Inverse transform: `pose.compose(pose.inverse()) ≈ identity`.
    #[inline]
    pub fn inverse(self) -> Self {
        let (sin, cos) = self.theta.sin_cos();
        Self::new(
            -self.x * cos - self.y * sin,
            self.x * sin - self.y * cos,
            -self.theta,
        )
    }

    /// Componentwise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
            theta: self.theta.abs(),
        }
    }

    /// Largest absolute component.
    #[inline]
    pub fn max_abs(self) -> f64 {
        let a = self.abs();
        a.x.max(a.y).max(a.theta)
    }

    /// True if every component is strictly below `tolerance` in magnitude.
    #[inline]
    pub fn is_within(self, tolerance: f64) -> bool {
        self.x.abs() < tolerance && self.y.abs() < tolerance && self.theta.abs() < tolerance
    }

    /// Check if this pose is approximately equal to another.
    #[inline]
    pub fn approx_eq(self, other: Pose2D, pos_epsilon: f64, angle_epsilon: f64) -> bool {
        (self.x - other.x).abs() <= pos_epsilon
            && (self.y - other.y).abs() <= pos_epsilon
            && angles_approx_equal(self.theta, other.theta, angle_epsilon)
    }
}
