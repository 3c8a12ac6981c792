use crate::error::EnvelopeError;
use crate::state::device_record::DeviceRecord;

/// Bounding box of every valid record, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetExtent {
    /// Aggregate over records that pass validation, so a malformed row cannot
    /// skew the normalization shared by the others.
    pub fn from_records(records: &[DeviceRecord]) -> Option<Self> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for r in records.iter().filter(|r| r.validate().is_ok()) {
            x_min = x_min.min(r.pmin);
            x_max = x_max.max(r.pmax);
            y_min = y_min.min(r.fmin);
            y_max = y_max.max(r.fmax);
        }

        if x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite() {
            Some(Self { x_min, x_max, y_min, y_max })
        } else {
            None
        }
    }

    pub fn x_range(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_range(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Factor applied to performance values in linear mode.
    pub fn scale_y(&self) -> Result<f64, EnvelopeError> {
        Self::scale_from_ranges(self.x_range(), self.y_range())
    }

    pub fn scale_from_ranges(x_range: f64, y_range: f64) -> Result<f64, EnvelopeError> {
        if !(y_range.is_finite() && y_range > 0.0) {
            return Err(EnvelopeError::configuration(format!(
                "performance range across the dataset is {y_range}"
            )));
        }
        // A zero scale would collapse every ellipse and divide by zero on the way back.
        if !(x_range.is_finite() && x_range > 0.0) {
            return Err(EnvelopeError::configuration(format!(
                "power range across the dataset is {x_range}"
            )));
        }
        Ok(x_range / y_range)
    }
}

/// Resolve the linear-mode scale factor, falling back to `1.0` when the
/// dataset cannot provide one.
pub fn normalization_scale(extent: Option<&DatasetExtent>) -> f64 {
    let Some(extent) = extent else {
        tracing::debug!("no valid records, normalization defaults to 1.0");
        return 1.0;
    };
    match extent.scale_y() {
        Ok(scale) => {
            tracing::debug!(scale, x_range = extent.x_range(), y_range = extent.y_range(), "normalization");
            scale
        }
        Err(e) => {
            tracing::warn!(error = %e, "falling back to unit normalization");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<DeviceRecord> {
        vec![
            DeviceRecord::new("a", 5.0, 10.0, 0.2, 0.5),
            DeviceRecord::new("b", 15.0, 60.0, 50.0, 275.0),
        ]
    }

    #[test]
    fn extent_spans_all_records() {
        let e = DatasetExtent::from_records(&records()).unwrap();
        assert_eq!(e.x_range(), 55.0);
        assert!((e.y_range() - 274.8).abs() < 1e-9);
        assert!((e.scale_y().unwrap() - 55.0 / 274.8).abs() < 1e-12);
    }

    #[test]
    fn invalid_records_do_not_contribute() {
        let mut rs = records();
        rs.push(DeviceRecord::new("bad", 1000.0, 1.0, 0.0, 1e9));
        let e = DatasetExtent::from_records(&rs).unwrap();
        assert_eq!(e.x_max, 60.0);
        assert_eq!(e.y_max, 275.0);
    }

    #[test]
    fn flat_performance_range_is_configuration_error() {
        let rs = vec![
            DeviceRecord::new("a", 1.0, 2.0, 3.0, 3.0),
            DeviceRecord::new("b", 4.0, 8.0, 3.0, 3.0),
        ];
        let e = DatasetExtent::from_records(&rs).unwrap();
        assert!(matches!(e.scale_y(), Err(EnvelopeError::Configuration(_))));
        assert_eq!(normalization_scale(Some(&e)), 1.0);
    }

    #[test]
    fn flat_power_range_is_configuration_error() {
        let rs = vec![DeviceRecord::new("a", 2.0, 2.0, 1.0, 3.0)];
        let e = DatasetExtent::from_records(&rs).unwrap();
        assert!(e.scale_y().is_err());
        assert_eq!(normalization_scale(Some(&e)), 1.0);
    }

    #[test]
    fn empty_dataset_uses_unit_scale() {
        assert!(DatasetExtent::from_records(&[]).is_none());
        assert_eq!(normalization_scale(None), 1.0);
    }
}
