use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// Columns every input table must provide, in export order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "pmin", "pmax", "fmin", "fmax"];

/// One device row: a power range and a performance range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub name: String,
    pub pmin: f64,
    pub pmax: f64,
    pub fmin: f64,
    pub fmax: f64,
}

impl DeviceRecord {
    pub fn new(name: impl Into<String>, pmin: f64, pmax: f64, fmin: f64, fmax: f64) -> Self {
        Self {
            name: name.into(),
            pmin,
            pmax,
            fmin,
            fmax,
        }
    }

    /// Check the bounds are finite and ordered. Log-scale positivity is
    /// checked by the geometry engine since it depends on the render mode.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        for (label, value) in [
            ("pmin", self.pmin),
            ("pmax", self.pmax),
            ("fmin", self.fmin),
            ("fmax", self.fmax),
        ] {
            if !value.is_finite() {
                return Err(EnvelopeError::domain(format!("{label} is not finite ({value})")));
            }
        }
        if self.pmin > self.pmax {
            return Err(EnvelopeError::domain(format!(
                "pmin {} is greater than pmax {}",
                self.pmin, self.pmax
            )));
        }
        if self.fmin > self.fmax {
            return Err(EnvelopeError::domain(format!(
                "fmin {} is greater than fmax {}",
                self.fmin, self.fmax
            )));
        }
        Ok(())
    }

    pub fn min_corner(&self) -> [f64; 2] {
        [self.pmin, self.fmin]
    }

    pub fn max_corner(&self) -> [f64; 2] {
        [self.pmax, self.fmax]
    }
}

impl Default for DeviceRecord {
    fn default() -> Self {
        Self::new("New device", 1.0, 2.0, 1.0, 2.0)
    }
}

/// Sample table shown on first launch.
pub fn sample_records() -> Vec<DeviceRecord> {
    vec![
        DeviceRecord::new("Jetson Nano", 5.0, 10.0, 0.2, 0.5),
        DeviceRecord::new("Jetson TX2", 7.5, 15.0, 0.6, 1.3),
        DeviceRecord::new("Jetson Xavier NX", 10.0, 20.0, 14.0, 21.0),
        DeviceRecord::new("Jetson AGX Orin 64GB", 15.0, 60.0, 50.0, 275.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_finite_record_is_valid() {
        assert!(DeviceRecord::new("a", 1.0, 1.0, 0.0, 3.0).validate().is_ok());
    }

    #[test]
    fn reversed_power_range_is_rejected() {
        let err = DeviceRecord::new("a", 10.0, 5.0, 1.0, 2.0).validate().unwrap_err();
        assert!(matches!(err, EnvelopeError::Domain(ref m) if m.contains("pmin")));
    }

    #[test]
    fn reversed_performance_range_is_rejected() {
        let err = DeviceRecord::new("a", 1.0, 2.0, 5.0, 4.0).validate().unwrap_err();
        assert!(matches!(err, EnvelopeError::Domain(ref m) if m.contains("fmin")));
    }

    #[test]
    fn nan_bound_is_rejected() {
        assert!(DeviceRecord::new("a", f64::NAN, 2.0, 1.0, 2.0).validate().is_err());
    }

    #[test]
    fn sample_records_are_valid() {
        for r in sample_records() {
            r.validate().unwrap();
        }
    }
}
