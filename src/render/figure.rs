use crate::error::RecordError;
use crate::geometry::{compute_envelope_with, EnvelopeParams, EnvelopeShape, RenderMode, ScaleMode};
use crate::state::device_record::DeviceRecord;
use crate::state::palette::assign_color;

/// One device ready to draw: envelope, markers and label share `name` and `color`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeTrace {
    /// Position of the record in the input table.
    pub index: usize,
    pub name: String,
    pub color: [u8; 4],
    pub shape: EnvelopeShape,
}

/// All drawable traces of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub mode: RenderMode,
    pub traces: Vec<EnvelopeTrace>,
    /// Records whose geometry failed, in input order.
    pub skipped: Vec<RecordError>,
}

impl Figure {
    pub fn build(records: &[DeviceRecord], scale: ScaleMode, palette: &[[u8; 4]]) -> Self {
        Self::build_with(records, scale, palette, &EnvelopeParams::default())
    }

    /// The render mode is resolved once for the whole pass so every record
    /// shares the same normalization. Colors follow the record's position
    /// among all rows, including the ones that end up skipped.
    pub fn build_with(
        records: &[DeviceRecord],
        scale: ScaleMode,
        palette: &[[u8; 4]],
        params: &EnvelopeParams,
    ) -> Self {
        let mode = RenderMode::for_records(scale, records);
        let total = records.len();
        let mut traces = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match compute_envelope_with(record, mode, params) {
                Ok(shape) => traces.push(EnvelopeTrace {
                    index,
                    name: record.name.clone(),
                    color: assign_color(index, total, palette).unwrap_or([128, 128, 128, 255]),
                    shape,
                }),
                Err(source) => {
                    tracing::warn!(index, name = %record.name, error = %source, "skipping record");
                    skipped.push(RecordError {
                        index,
                        name: record.name.clone(),
                        source,
                    });
                }
            }
        }

        tracing::debug!(
            traces = traces.len(),
            skipped = skipped.len(),
            mode = ?mode,
            "built figure"
        );
        Self { mode, traces, skipped }
    }

    pub fn scale(&self) -> ScaleMode {
        self.mode.scale()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Plot-space bounds `[x_min, y_min], [x_max, y_max]` of every outline and
    /// anchor, padded by 5% per side. `None` when there is nothing to draw.
    pub fn plot_bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let scale = self.scale();
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        let points = self
            .traces
            .iter()
            .flat_map(|t| t.shape.outline.points().iter().chain(t.shape.anchors.iter()));
        for p in points {
            let y = scale.to_plot_y(p[1]);
            if p[0].is_finite() && y.is_finite() {
                x_min = x_min.min(p[0]);
                x_max = x_max.max(p[0]);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }

        if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
            return None;
        }

        let x_pad = (x_max - x_min) * 0.05;
        let y_pad = (y_max - y_min) * 0.05;
        let x_pad = if x_pad.abs() < 1e-15 { 0.5 } else { x_pad };
        let y_pad = if y_pad.abs() < 1e-15 { 0.5 } else { y_pad };

        Some(([x_min - x_pad, y_min - y_pad], [x_max + x_pad, y_max + y_pad]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvelopeError;
    use crate::geometry::Outline;
    use crate::state::device_record::sample_records;
    use crate::state::palette::CIVIDIS;

    #[test]
    fn one_trace_per_valid_record_in_order() {
        let fig = Figure::build(&sample_records(), ScaleMode::Log, &CIVIDIS);
        assert!(fig.skipped.is_empty());
        let names: Vec<&str> = fig.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Jetson Nano", "Jetson TX2", "Jetson Xavier NX", "Jetson AGX Orin 64GB"]);
        assert_eq!(fig.traces[0].color, CIVIDIS[0]);
        assert_eq!(fig.traces[3].color, CIVIDIS[9]);
    }

    #[test]
    fn bad_record_is_skipped_without_shifting_colors() {
        let mut records = sample_records();
        records[1].fmin = 0.0;
        let fig = Figure::build(&records, ScaleMode::Log, &CIVIDIS);

        assert_eq!(fig.traces.len(), 3);
        assert_eq!(fig.skipped.len(), 1);
        assert_eq!(fig.skipped[0].index, 1);
        assert_eq!(fig.skipped[0].name, "Jetson TX2");
        assert!(matches!(fig.skipped[0].source, EnvelopeError::Domain(_)));
        // last record keeps the last color even though a row before it failed
        assert_eq!(fig.traces[2].index, 3);
        assert_eq!(fig.traces[2].color, CIVIDIS[9]);
    }

    #[test]
    fn bad_record_does_not_change_others_geometry() {
        let clean = sample_records();
        let mut dirty = clean.clone();
        dirty.push(DeviceRecord::new("broken", 500.0, 1.0, 1.0, 2.0));

        let a = Figure::build(&clean, ScaleMode::Linear, &CIVIDIS);
        let b = Figure::build(&dirty, ScaleMode::Linear, &CIVIDIS);
        assert_eq!(a.mode, b.mode);
        for (ta, tb) in a.traces.iter().zip(&b.traces) {
            assert_eq!(ta.shape, tb.shape);
        }
    }

    #[test]
    fn linear_figure_shares_one_scale() {
        let fig = Figure::build(&sample_records(), ScaleMode::Linear, &CIVIDIS);
        let RenderMode::Linear { scale_y } = fig.mode else {
            panic!("expected linear mode");
        };
        assert!((scale_y - 55.0 / 274.8).abs() < 1e-12);
    }

    #[test]
    fn degenerate_record_still_draws_a_point() {
        let records = vec![DeviceRecord::new("dot", 3.0, 3.0, 7.0, 7.0)];
        let fig = Figure::build(&records, ScaleMode::Log, &CIVIDIS);
        assert!(matches!(fig.traces[0].shape.outline, Outline::Point(_)));
        let (min, max) = fig.plot_bounds().unwrap();
        assert_eq!(min[0], 2.5);
        assert_eq!(max[0], 3.5);
    }

    #[test]
    fn log_bounds_are_in_log_space() {
        let records = vec![DeviceRecord::new("a", 10.0, 20.0, 10.0, 1000.0)];
        let fig = Figure::build(&records, ScaleMode::Log, &CIVIDIS);
        let (min, max) = fig.plot_bounds().unwrap();
        // ellipse spans roughly 0.61..3.39 in log10 units before padding
        assert!(min[1] < 1.0 && min[1] > 0.3);
        assert!(max[1] > 3.0 && max[1] < 3.7);
    }

    #[test]
    fn empty_figure_has_no_bounds() {
        let fig = Figure::build(&[], ScaleMode::Log, &CIVIDIS);
        assert!(fig.is_empty());
        assert!(fig.plot_bounds().is_none());
    }
}
