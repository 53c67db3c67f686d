//! Matcher configuration.
//!
//! All tunables live in [`MbIcpConfig`], which can be built in code or loaded
//! from a YAML file. Missing keys take the defaults below.
//!
//! ## Example YAML
//!
//! ```yaml
//! max_laser_range: 7.9          # drop returns at or beyond this range
//! radial_window: 0.3            # Br, max metric distance of a correspondence
//! angular_window: 0.523333333   # Bw, ±30° bearing window
//! metric_l: 3.0                 # LMET
//! max_interpolation_distance: 0.5
//! trim_fraction: 0.95           # keep best 95% of correspondences
//! min_error: 0.0001
//! smooth_convergence_iterations: 2
//! max_iterations: 200
//! projection_filter: true
//! min_correspondence_ratio: 0.1
//! ```
//!
//! Length values are in scan units. [`ScaledParams`] applies a scan's unit
//! factor to them for the duration of one match.

mod defaults;
mod error;
mod matcher;
mod scaled;

pub use error::ConfigLoadError;
pub use matcher::MbIcpConfig;
pub use scaled::ScaledParams;
