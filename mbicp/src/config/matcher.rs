//! Matcher configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

use super::defaults;
use super::error::ConfigLoadError;

/// Tunables for [`MbIcpMatcher`](crate::matching::MbIcpMatcher).
///
/// Length-valued fields are expressed in scan units and are scaled by the
/// reference scan's unit factor at the start of every match (see
/// [`ScaledParams`](super::ScaledParams)). The config itself is never modified
/// by matching, so one value can be shared across threads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MbIcpConfig {
    /// Samples at or beyond this range are dropped.
    /// Default: 7.9
    #[serde(default = "defaults::max_laser_range")]
    pub max_laser_range: f64,

    /// Radial window Br: maximum metric distance for an accepted correspondence.
    /// Default: 0.3
    #[serde(default = "defaults::radial_window")]
    pub radial_window: f64,

    /// Angular window Bw (radians) around each current point's bearing.
    /// Default: 0.5233 (~30°)
    #[serde(default = "defaults::angular_window")]
    pub angular_window: f64,

    /// Metric constant LMET. Larger values weight rotation error less.
    /// Default: 3.0
    #[serde(default = "defaults::metric_l")]
    pub metric_l: f64,

    /// Reference segments at least this long are never interpolated.
    /// Default: 0.5
    #[serde(default = "defaults::max_interpolation_distance")]
    pub max_interpolation_distance: f64,

    /// Fraction F of best correspondences kept by the trimming filter, in (0, 1].
    /// Default: 0.95
    #[serde(default = "defaults::trim_fraction")]
    pub trim_fraction: f64,

    /// Convergence tolerance on the residual ratio and the incremental pose.
    /// Default: 1e-4
    #[serde(default = "defaults::min_error")]
    pub min_error: f64,

    /// Converged once more than this many consecutive iterations meet the tolerance.
    /// Default: 2
    #[serde(default = "defaults::smooth_convergence_iterations")]
    pub smooth_convergence_iterations: u32,

    /// Iteration budget.
    /// Default: 200
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: u32,

    /// Drop current points that are hidden or out of bearing order after projection.
    /// Default: true
    #[serde(default = "defaults::enabled")]
    pub projection_filter: bool,

    /// Minimum fraction of current points that must find a correspondence.
    /// Default: 0.1
    #[serde(default = "defaults::min_correspondence_ratio")]
    pub min_correspondence_ratio: f64,

    /// Record per-iteration statistics in the match result.
    /// Default: false
    #[serde(default)]
    pub record_trace: bool,
}

impl Default for MbIcpConfig {
    fn default() -> Self {
        Self {
            max_laser_range: defaults::max_laser_range(),
            radial_window: defaults::radial_window(),
            angular_window: defaults::angular_window(),
            metric_l: defaults::metric_l(),
            max_interpolation_distance: defaults::max_interpolation_distance(),
            trim_fraction: defaults::trim_fraction(),
            min_error: defaults::min_error(),
            smooth_convergence_iterations: defaults::smooth_convergence_iterations(),
            max_iterations: defaults::max_iterations(),
            projection_filter: defaults::enabled(),
            min_correspondence_ratio: defaults::min_correspondence_ratio(),
            record_trace: false,
        }
    }
}

impl MbIcpConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file and validate it.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse from a YAML string and validate. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, ConfigLoadError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> std::result::Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every value is inside its meaningful range.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MatchError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )))
            }
        }

        positive("max_laser_range", self.max_laser_range)?;
        positive("radial_window", self.radial_window)?;
        positive("angular_window", self.angular_window)?;
        positive("metric_l", self.metric_l)?;
        positive("max_interpolation_distance", self.max_interpolation_distance)?;
        positive("min_error", self.min_error)?;

        if !(self.trim_fraction > 0.0 && self.trim_fraction <= 1.0) {
            return Err(MatchError::InvalidConfig(format!(
                "trim_fraction must be in (0, 1], got {}",
                self.trim_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.min_correspondence_ratio) {
            return Err(MatchError::InvalidConfig(format!(
                "min_correspondence_ratio must be in [0, 1], got {}",
                self.min_correspondence_ratio
            )));
        }
        if self.max_iterations == 0 {
            return Err(MatchError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style setter for the maximum laser range.
    pub fn with_max_laser_range(mut self, range: f64) -> Self {
        self.max_laser_range = range;
        self
    }

    /// Builder-style setter for the radial window Br.
    pub fn with_radial_window(mut self, window: f64) -> Self {
        self.radial_window = window;
        self
    }

    /// Builder-style setter for the angular window Bw.
    pub fn with_angular_window(mut self, radians: f64) -> Self {
        self.angular_window = radians;
        self
    }

    /// Builder-style setter for the metric constant LMET.
    pub fn with_metric_l(mut self, l: f64) -> Self {
        self.metric_l = l;
        self
    }

    /// Builder-style setter for the interpolation threshold.
    pub fn with_max_interpolation_distance(mut self, distance: f64) -> Self {
        self.max_interpolation_distance = distance;
        self
    }

    /// Builder-style setter for the trim fraction F.
    pub fn with_trim_fraction(mut self, fraction: f64) -> Self {
        self.trim_fraction = fraction;
        self
    }

    /// Builder-style setter for the convergence tolerance.
    pub fn with_min_error(mut self, tolerance: f64) -> Self {
        self.min_error = tolerance;
        self
    }

    /// Builder-style setter for the consecutive-convergence requirement.
    pub fn with_smooth_convergence_iterations(mut self, iterations: u32) -> Self {
        self.smooth_convergence_iterations = iterations;
        self
    }

    /// Builder-style setter for the iteration budget.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Builder-style setter for the projection filter.
    pub fn with_projection_filter(mut self, enabled: bool) -> Self {
        self.projection_filter = enabled;
        self
    }

    /// Builder-style setter for the minimum correspondence ratio.
    pub fn with_min_correspondence_ratio(mut self, ratio: f64) -> Self {
        self.min_correspondence_ratio = ratio;
        self
    }

    /// Builder-style setter for per-iteration trace recording.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }
}
