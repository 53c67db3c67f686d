//! Raw range scan representation.
//!
//! A [`RangeScan`] is the sensor-side input to the matcher: an ordered list of
//! `(range, bearing, valid)` samples plus a unit factor that converts the stored
//! ranges to the matcher's length unit. Samples must be sorted by bearing; the
//! windowed correspondence search depends on that order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MatchError, Result};

/// Which scan of a matched pair a value refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanRole {
    /// The fixed scan (pose = identity).
    Reference,
    /// The scan being aligned to the reference.
    Current,
}

impl fmt::Display for ScanRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanRole::Reference => write!(f, "reference"),
            ScanRole::Current => write!(f, "current"),
        }
    }
}

/// One beam of a range scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSample {
    /// Measured range, in scan units (multiplied by [`RangeScan::unit_factor`]).
    pub range: f64,
    /// Beam bearing in radians, CCW positive from the sensor X-axis.
    pub bearing: f64,
    /// False if the sensor flagged this return as unusable.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl RangeSample {
    /// Create a valid sample.
    #[inline]
    pub fn new(range: f64, bearing: f64) -> Self {
        Self {
            range,
            bearing,
            valid: true,
        }
    }

    /// Create a sample flagged as invalid.
    #[inline]
    pub fn invalid(range: f64, bearing: f64) -> Self {
        Self {
            range,
            bearing,
            valid: false,
        }
    }
}

/// A bearing-sorted laser range scan.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeScan {
    /// Samples ordered by non-decreasing bearing.
    pub samples: Vec<RangeSample>,
    /// Multiplier converting stored ranges to meters (or the configured unit).
    #[serde(default = "default_unit_factor")]
    pub unit_factor: f64,
}

fn default_unit_factor() -> f64 {
    1.0
}

impl RangeScan {
    /// Create a scan from samples and a unit factor.
    pub fn new(samples: Vec<RangeSample>, unit_factor: f64) -> Self {
        Self {
            samples,
            unit_factor,
        }
    }

    /// Create an all-valid scan with unit factor 1 from parallel range/bearing slices.
    ///
    /// Extra elements of the longer slice are ignored.
    pub fn from_ranges(ranges: &[f64], bearings: &[f64]) -> Self {
        let samples = ranges
            .iter()
            .zip(bearings)
            .map(|(&r, &b)| RangeSample::new(r, b))
            .collect();
        Self::new(samples, 1.0)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the scan has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples flagged valid.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.valid).count()
    }

    /// Check the structural preconditions the matcher relies on.
    ///
    /// Fails if the scan is empty, the unit factor is not a positive finite
    /// number, or bearings are non-finite or decrease anywhere.
    pub fn validate(&self, role: ScanRole) -> Result<()> {
        if self.samples.is_empty() {
            return Err(MatchError::EmptyScan { role });
        }
        if !(self.unit_factor.is_finite() && self.unit_factor > 0.0) {
            return Err(MatchError::InvalidUnitFactor {
                role,
                factor: self.unit_factor,
            });
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, sample) in self.samples.iter().enumerate() {
            if !sample.bearing.is_finite() {
                return Err(MatchError::NonFiniteBearing { role, index });
            }
            if sample.bearing < previous {
                return Err(MatchError::NonMonotonicBearing { role, index });
            }
            previous = sample.bearing;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan(n: usize) -> RangeScan {
        let bearings: Vec<f64> = (0..n).map(|i| -1.0 + i as f64 * 0.1).collect();
        let ranges = vec![2.0; n];
        RangeScan::from_ranges(&ranges, &bearings)
    }

    #[test]
    fn test_from_ranges() {
        let scan = fan(5);
        assert_eq!(scan.len(), 5);
        assert_eq!(scan.valid_count(), 5);
        assert_eq!(scan.unit_factor, 1.0);
        assert!(scan.validate(ScanRole::Reference).is_ok());
    }

    #[test]
    fn test_validate_empty() {
        let scan = RangeScan::default();
        assert_eq!(
            scan.validate(ScanRole::Current),
            Err(MatchError::EmptyScan {
                role: ScanRole::Current
            })
        );
    }

    #[test]
    fn test_validate_non_monotonic() {
        let mut scan = fan(5);
        scan.samples[3].bearing = -2.0;
        assert_eq!(
            scan.validate(ScanRole::Reference),
            Err(MatchError::NonMonotonicBearing {
                role: ScanRole::Reference,
                index: 3
            })
        );
    }

    #[test]
    fn test_validate_unit_factor() {
        let mut scan = fan(3);
        scan.unit_factor = 0.0;
        assert!(matches!(
            scan.validate(ScanRole::Current),
            Err(MatchError::InvalidUnitFactor { .. })
        ));
    }

    #[test]
    fn test_equal_bearings_are_allowed() {
        let scan = RangeScan::from_ranges(&[1.0, 1.0], &[0.5, 0.5]);
        assert!(scan.validate(ScanRole::Reference).is_ok());
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = "samples:\n  - { range: 1.5, bearing: 0.0 }\n  - { range: 1.6, bearing: 0.1, valid: false }\n";
        let scan: RangeScan = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scan.unit_factor, 1.0);
        assert!(scan.samples[0].valid);
        assert!(!scan.samples[1].valid);
    }
}
