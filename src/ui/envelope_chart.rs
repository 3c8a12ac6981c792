use egui_plot::{
    Corner, GridInput, GridMark, Legend, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Polygon,
    Text,
};

use envelope_plot::geometry::Outline;
use envelope_plot::processing::kd_tree::{AnchorRef, HoverTree};
use envelope_plot::render::axis::{format_coordinate, format_tick_value, format_y_tick};
use envelope_plot::render::figure::Figure;
use envelope_plot::state::palette::color32;
use envelope_plot::state::plot_settings::PlotSettings;

/// Hover snaps to a marker closer than this fraction of the visible span.
const HOVER_SNAP: f64 = 0.03;

/// View state of the chart that outlives a frame.
#[derive(Default)]
pub struct ChartView {
    /// Reset the bounds to the data on the next frame.
    pub fit_requested: bool,
    /// Screen rect of the plot, used to crop screenshots.
    pub last_rect: Option<egui::Rect>,
    /// Marker under the pointer during the last frame.
    pub hovered: Option<AnchorRef>,
}

/// Zoomed out past this many decades, marks step in powers of ten decades.
const MAX_DECADE_MARKS: f64 = 50.0;

/// Decade marks (and 2..9 sub-marks when zoomed in) for a log10 axis.
fn log_grid_spacer(input: GridInput) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    if !lo.is_finite() || !hi.is_finite() || hi <= lo || !(hi - lo).is_finite() {
        return Vec::new();
    }
    let decades = hi - lo;
    let step = if decades > MAX_DECADE_MARKS {
        10f64.powf((decades / MAX_DECADE_MARKS).log10().ceil())
    } else {
        1.0
    };
    let start = (lo / step).floor() * step;
    let count = ((hi - start) / step).ceil().clamp(0.0, 2.0 * MAX_DECADE_MARKS) as usize;

    let mut marks = Vec::new();
    for i in 0..=count {
        let base = start + i as f64 * step;
        if (lo..=hi).contains(&base) {
            marks.push(GridMark { value: base, step_size: step });
        }
        if decades < 4.0 {
            for k in 2..10 {
                let v = base + (k as f64).log10();
                if (lo..=hi).contains(&v) {
                    marks.push(GridMark { value: v, step_size: 0.1 });
                }
            }
        }
    }
    marks
}

pub fn show_envelope_chart(
    ui: &mut egui::Ui,
    figure: &Figure,
    settings: &PlotSettings,
    view: &mut ChartView,
    height: f32,
) {
    let scale = figure.scale();
    let y_title = settings.y_axis_title();
    let label_title = y_title.clone();
    let label_color = settings.theme.label_color();
    let fill_alpha = (settings.fill_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

    let mut plot = Plot::new("envelope_chart")
        .height(height)
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_label(settings.x_label.clone())
        .y_axis_label(y_title)
        .x_axis_formatter(|mark: GridMark, _range: &std::ops::RangeInclusive<f64>| format_tick_value(mark.value))
        .y_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            format_y_tick(mark.value, scale)
        })
        .label_formatter(move |name: &str, value: &PlotPoint| {
            format_coordinate(name, value.x, value.y, scale, &label_title)
        });
    if scale.is_log() {
        plot = plot.y_grid_spacer(log_grid_spacer);
    }

    let fit_bounds = if view.fit_requested { figure.plot_bounds() } else { None };
    view.fit_requested = false;
    let mut hovered = None;

    let response = plot.show(ui, |plot_ui| {
        if let Some((min, max)) = fit_bounds {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
        }

        for trace in &figure.traces {
            let [r, g, b, _] = trace.color;
            let line = color32(trace.color);
            let to_plot = |p: &[f64; 2]| [p[0], scale.to_plot_y(p[1])];

            match &trace.shape.outline {
                Outline::Ellipse(points) => {
                    let pts: PlotPoints = points.iter().map(to_plot).collect();
                    plot_ui.polygon(
                        Polygon::new(pts)
                            .fill_color(egui::Color32::from_rgba_unmultiplied(r, g, b, fill_alpha))
                            .stroke(egui::Stroke::new(1.5, line))
                            .name(&trace.name),
                    );
                }
                Outline::Point(p) => {
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![to_plot(p)]))
                            .radius(7.0)
                            .shape(MarkerShape::Diamond)
                            .color(line)
                            .name(&trace.name),
                    );
                }
            }

            let anchors: PlotPoints = trace.shape.anchors.iter().map(to_plot).collect();
            plot_ui.points(
                Points::new(anchors)
                    .radius(4.0)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .color(line)
                    .name(&trace.name),
            );

            if settings.show_labels {
                let label = to_plot(&trace.shape.label);
                plot_ui.text(Text::new(
                    PlotPoint::new(label[0], label[1]),
                    egui::RichText::new(&trace.name).size(12.0).color(label_color),
                ));
            }
        }

        // Snap to the nearest corner marker.
        if let Some(pointer) = plot_ui.pointer_coordinate() {
            let bounds = plot_ui.plot_bounds();
            let tree = HoverTree::build(figure, bounds.width(), bounds.height());
            if let Some((anchor, dist)) = tree.nearest(pointer.x, pointer.y) {
                if dist < HOVER_SNAP {
                    if let Some(trace) = figure.traces.get(anchor.trace) {
                        let p = trace.shape.anchors[anchor.corner];
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![[p[0], scale.to_plot_y(p[1])]]))
                                .radius(7.0)
                                .shape(MarkerShape::Circle)
                                .filled(false)
                                .color(label_color),
                        );
                        hovered = Some(anchor);
                    }
                }
            }
        }
    });

    view.last_rect = Some(response.response.rect);
    view.hovered = hovered;
}

/// One-line readout of a hovered marker for the status bar.
pub fn describe_anchor(figure: &Figure, anchor: AnchorRef, settings: &PlotSettings) -> Option<String> {
    let trace = figure.traces.get(anchor.trace)?;
    let p = trace.shape.anchors.get(anchor.corner)?;
    let which = if anchor.corner == 0 { "min" } else { "max" };
    let unit = settings.y_unit.trim();
    Some(format!(
        "{} ({which}): {} W, {} {unit}",
        trace.name,
        format_tick_value(p[0]),
        format_tick_value(p[1]),
    ))
}
