//! Call-local, unit-scaled matcher parameters.

use super::MbIcpConfig;

/// Length parameters rescaled by a scan's unit factor.
///
/// Built once at the start of each match from a shared [`MbIcpConfig`]; the
/// config is left untouched so calls with different unit factors can run
/// side by side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledParams {
    /// Maximum usable range.
    pub max_laser_range: f64,
    /// Metric constant LMET.
    pub metric_l: f64,
    /// LMET², cached.
    pub metric_l_sq: f64,
    /// Radial window Br. Bounds a squared (metric) distance, so it scales
    /// with the square of the unit factor.
    pub radial_window: f64,
    /// Interpolation threshold on segment length.
    pub max_interpolation_distance: f64,
}

impl ScaledParams {
    /// Scale the length-valued fields of `config` by `unit_factor`.
    pub fn new(config: &MbIcpConfig, unit_factor: f64) -> Self {
        let metric_l = config.metric_l * unit_factor;
        Self {
            max_laser_range: config.max_laser_range * unit_factor,
            metric_l,
            metric_l_sq: metric_l * metric_l,
            radial_window: config.radial_window * unit_factor * unit_factor,
            max_interpolation_distance: config.max_interpolation_distance * unit_factor,
        }
    }
}
