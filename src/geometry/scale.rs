use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;
use crate::geometry::extent::{normalization_scale, DatasetExtent};
use crate::state::device_record::DeviceRecord;

/// How the performance axis is displayed. Chosen once per chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    #[default]
    Log,
    Linear,
}

impl ScaleMode {
    pub fn from_log_flag(log_y: bool) -> Self {
        if log_y {
            ScaleMode::Log
        } else {
            ScaleMode::Linear
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, ScaleMode::Log)
    }

    /// Performance value to chart coordinate. The chart itself is always
    /// linear, so log mode plots `log10(y)`.
    pub fn to_plot_y(&self, y: f64) -> f64 {
        match self {
            ScaleMode::Log => y.log10(),
            ScaleMode::Linear => y,
        }
    }

    pub fn from_plot_y(&self, y: f64) -> f64 {
        match self {
            ScaleMode::Log => 10f64.powf(y),
            ScaleMode::Linear => y,
        }
    }
}

/// Coordinate space the envelope geometry is computed in.
///
/// `Log` and `Linear` intentionally differ in more than the axis transform:
/// log mode skips normalization and derives the minor axis from the
/// rectangle, linear mode normalizes and uses a fixed thickness ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    /// Performance in log10 space, no aspect correction.
    Log,
    /// Performance multiplied by `scale_y` before geometry so the tilt follows
    /// the data diagonal rather than the raw magnitudes.
    Linear { scale_y: f64 },
}

impl RenderMode {
    /// Resolve the mode for one render pass. In linear mode the scale factor
    /// is computed once from every record and shared by all of them.
    pub fn for_records(scale: ScaleMode, records: &[DeviceRecord]) -> Self {
        match scale {
            ScaleMode::Log => RenderMode::Log,
            ScaleMode::Linear => RenderMode::Linear {
                scale_y: normalization_scale(DatasetExtent::from_records(records).as_ref()),
            },
        }
    }

    /// Linear mode from explicit dataset ranges, for callers that already
    /// know the x and y spans instead of holding the records.
    pub fn linear_from_ranges(x_range: f64, y_range: f64) -> Self {
        let scale_y = DatasetExtent::scale_from_ranges(x_range, y_range).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to unit normalization");
            1.0
        });
        RenderMode::Linear { scale_y }
    }

    pub fn scale(&self) -> ScaleMode {
        match self {
            RenderMode::Log => ScaleMode::Log,
            RenderMode::Linear { .. } => ScaleMode::Linear,
        }
    }

    pub fn scale_y(&self) -> f64 {
        match self {
            RenderMode::Log => 1.0,
            RenderMode::Linear { scale_y } => *scale_y,
        }
    }

    /// Reject performance bounds this mode cannot transform.
    pub fn check_domain(&self, fmin: f64, fmax: f64) -> Result<(), EnvelopeError> {
        match self {
            RenderMode::Log if fmin <= 0.0 || fmax <= 0.0 => Err(EnvelopeError::domain(format!(
                "log scale needs positive performance bounds, got fmin={fmin}, fmax={fmax}"
            ))),
            _ => Ok(()),
        }
    }

    /// Display units to geometry space.
    pub fn forward_y(&self, y: f64) -> f64 {
        match self {
            RenderMode::Log => y.log10(),
            RenderMode::Linear { scale_y } => y * scale_y,
        }
    }

    /// Geometry space back to display units.
    pub fn inverse_y(&self, y: f64) -> f64 {
        match self {
            RenderMode::Log => 10f64.powf(y),
            RenderMode::Linear { scale_y } => y / scale_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_flag_maps_to_mode() {
        assert_eq!(ScaleMode::from_log_flag(true), ScaleMode::Log);
        assert_eq!(ScaleMode::from_log_flag(false), ScaleMode::Linear);
    }

    #[test]
    fn forward_and_inverse_agree() {
        let modes = [RenderMode::Log, RenderMode::Linear { scale_y: 0.04 }];
        for mode in modes {
            for y in [0.5, 3.0, 275.0] {
                assert!((mode.inverse_y(mode.forward_y(y)) - y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn log_mode_rejects_zero() {
        assert!(RenderMode::Log.check_domain(0.0, 5.0).is_err());
        assert!(RenderMode::Linear { scale_y: 1.0 }.check_domain(0.0, 5.0).is_ok());
    }

    #[test]
    fn degenerate_ranges_fall_back_to_unit_scale() {
        assert_eq!(RenderMode::linear_from_ranges(10.0, 0.0).scale_y(), 1.0);
        assert_eq!(RenderMode::linear_from_ranges(10.0, 5.0).scale_y(), 2.0);
    }

    #[test]
    fn plot_y_round_trip() {
        assert!((ScaleMode::Log.from_plot_y(ScaleMode::Log.to_plot_y(141.0)) - 141.0).abs() < 1e-9);
        assert_eq!(ScaleMode::Linear.to_plot_y(3.5), 3.5);
    }
}
