use std::collections::{HashMap, HashSet};

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

use crate::render::figure::Figure;

/// Leaf bucket size. A split fails if a whole bucket shares one coordinate,
/// so the tree is only used while no axis value repeats this often.
const BUCKET: usize = 64;

type AnchorTree = KdTree<f64, u64, 2, BUCKET, u32>;

/// Which marker a hover lookup landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRef {
    /// Index into `Figure::traces`.
    pub trace: usize,
    /// 0 for the min corner, 1 for the max corner.
    pub corner: usize,
}

/// Wrapper around a 2D KD-tree for fast nearest-anchor hover lookup.
///
/// Points are stored in plot coordinates divided by the visible span of each
/// axis, so "nearest" matches what the user sees regardless of units.
/// Markers drawn on the same spot are stored once, keeping the first trace
/// that put a marker there.
pub struct HoverTree {
    tree: Option<AnchorTree>,
    points: Vec<[f64; 2]>,
    anchors: Vec<AnchorRef>,
    x_span: f64,
    y_span: f64,
}

impl HoverTree {
    /// Build from every anchor of `figure`. Non-finite points are left out.
    pub fn build(figure: &Figure, x_span: f64, y_span: f64) -> Self {
        let x_span = if x_span.abs() > 1e-15 { x_span.abs() } else { 1.0 };
        let y_span = if y_span.abs() > 1e-15 { y_span.abs() } else { 1.0 };
        let scale = figure.scale();

        let mut seen: HashSet<(u64, u64)> = HashSet::new();
        let mut points = Vec::new();
        let mut anchors = Vec::new();

        for (trace_idx, trace) in figure.traces.iter().enumerate() {
            for (corner, p) in trace.shape.anchors.iter().enumerate() {
                // + 0.0 folds -0.0 into 0.0 so both hash alike
                let x = p[0] / x_span + 0.0;
                let y = scale.to_plot_y(p[1]) / y_span + 0.0;
                if !(x.is_finite() && y.is_finite()) {
                    continue;
                }
                if seen.insert((x.to_bits(), y.to_bits())) {
                    points.push([x, y]);
                    anchors.push(AnchorRef { trace: trace_idx, corner });
                }
            }
        }

        let tree = if max_shared_coordinate(&points) < BUCKET {
            let mut tree = AnchorTree::new();
            for (idx, point) in points.iter().enumerate() {
                tree.add(point, idx as u64);
            }
            Some(tree)
        } else {
            tracing::debug!(markers = points.len(), "many markers share an axis value, hover falls back to a scan");
            None
        };

        Self { tree, points, anchors, x_span, y_span }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nearest anchor to the plot-space point `(qx, qy)`, with its distance
    /// as a fraction of the visible span.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<(AnchorRef, f64)> {
        if self.is_empty() {
            return None;
        }
        let query = [qx / self.x_span, qy / self.y_span];
        let (idx, dist2) = match &self.tree {
            Some(tree) => {
                let result = tree.nearest_one::<SquaredEuclidean>(&query);
                (result.item as usize, result.distance)
            }
            None => self
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| (i, (p[0] - query[0]).powi(2) + (p[1] - query[1]).powi(2)))
                .min_by(|a, b| a.1.total_cmp(&b.1))?,
        };
        let anchor = *self.anchors.get(idx)?;
        Some((anchor, dist2.sqrt()))
    }
}

/// Largest number of points sharing one x or one y value.
fn max_shared_coordinate(points: &[[f64; 2]]) -> usize {
    let mut most = 0;
    for axis in 0..2 {
        let mut counts: HashMap<u64, usize> = HashMap::new();
        for p in points {
            let n = counts.entry(p[axis].to_bits()).or_insert(0);
            *n += 1;
            most = most.max(*n);
        }
    }
    most
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScaleMode;
    use crate::state::device_record::DeviceRecord;
    use crate::state::palette::CIVIDIS;

    fn figure() -> Figure {
        let records = vec![
            DeviceRecord::new("a", 5.0, 10.0, 1.0, 10.0),
            DeviceRecord::new("b", 20.0, 40.0, 100.0, 1000.0),
        ];
        Figure::build(&records, ScaleMode::Log, &CIVIDIS)
    }

    #[test]
    fn finds_nearest_corner_in_plot_space() {
        let tree = HoverTree::build(&figure(), 40.0, 3.0);
        // log10(1000) = 3
        let (hit, dist) = tree.nearest(39.0, 3.0).unwrap();
        assert_eq!(hit, AnchorRef { trace: 1, corner: 1 });
        assert!((dist - 1.0 / 40.0).abs() < 1e-9);

        let (hit, _) = tree.nearest(5.5, 0.1).unwrap();
        assert_eq!(hit, AnchorRef { trace: 0, corner: 0 });
    }

    #[test]
    fn empty_figure_has_no_hits() {
        let fig = Figure::build(&[], ScaleMode::Log, &CIVIDIS);
        let tree = HoverTree::build(&fig, 1.0, 1.0);
        assert!(tree.is_empty());
        assert!(tree.nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn identical_devices_share_one_marker() {
        let records = vec![DeviceRecord::default(); 40];
        let fig = Figure::build(&records, ScaleMode::Log, &CIVIDIS);
        assert_eq!(fig.traces.len(), 40);

        let tree = HoverTree::build(&fig, 2.0, 1.0);
        assert_eq!(tree.points.len(), 2);
        assert!(tree.tree.is_some());
        // default record spans (1, 1) to (2, 2); log10(2) on the y axis
        let (hit, dist) = tree.nearest(2.0, 2f64.log10()).unwrap();
        assert_eq!(hit, AnchorRef { trace: 0, corner: 1 });
        assert!(dist < 1e-12);
    }

    #[test]
    fn shared_power_bound_on_many_devices() {
        let records: Vec<DeviceRecord> = (0..200)
            .map(|i| {
                let f = (i + 1) as f64;
                DeviceRecord::new(format!("d{i}"), 1.0, 2.0, f, f + 0.5)
            })
            .collect();
        let fig = Figure::build(&records, ScaleMode::Linear, &CIVIDIS);
        assert_eq!(fig.traces.len(), 200);

        let tree = HoverTree::build(&fig, 1.0, 1.0);
        assert_eq!(tree.points.len(), 400);
        assert!(tree.tree.is_none());
        let (hit, dist) = tree.nearest(1.0, 100.0).unwrap();
        assert_eq!(hit, AnchorRef { trace: 99, corner: 0 });
        assert!(dist < 1e-12);
    }
}
