//! Default value functions for serde deserialization.
//!
//! Lengths are in scan units before unit-factor scaling.

pub fn max_laser_range() -> f64 {
    7.9
}

pub fn radial_window() -> f64 {
    0.3
}

pub fn angular_window() -> f64 {
    0.523333333
}

pub fn metric_l() -> f64 {
    3.0
}

pub fn max_interpolation_distance() -> f64 {
    0.5
}

pub fn trim_fraction() -> f64 {
    0.95
}

pub fn min_error() -> f64 {
    1e-4
}

pub fn smooth_convergence_iterations() -> u32 {
    2
}

pub fn max_iterations() -> u32 {
    200
}

pub fn enabled() -> bool {
    true
}

pub fn min_correspondence_ratio() -> f64 {
    0.1
}
