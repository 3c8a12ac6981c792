//! Standalone HTML page with an interactive Plotly chart.

use std::path::Path;

use serde_json::{json, Value};

use crate::error::ExportError;
use crate::geometry::ScaleMode;
use crate::render::figure::Figure;
use crate::state::palette::css_rgba;
use crate::state::plot_settings::PlotSettings;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Plotly `data` array: envelope, markers and label per device, grouped by name.
pub fn plotly_traces(figure: &Figure, settings: &PlotSettings) -> Vec<Value> {
    let mut traces = Vec::with_capacity(figure.traces.len() * 3);
    // f32 setting, keep the CSS short: 0.3 rather than 0.30000001192092896
    let opacity = (settings.fill_opacity as f64 * 1000.0).round() / 1000.0;

    for trace in &figure.traces {
        let shape = &trace.shape;
        let line_color = css_rgba(trace.color, 1.0);
        let fill_color = css_rgba(trace.color, opacity);
        let outline_mode = if shape.outline.is_degenerate() { "markers" } else { "lines" };
        let (xs, ys): (Vec<f64>, Vec<f64>) = shape.outline.points().iter().map(|p| (p[0], p[1])).unzip();

        traces.push(json!({
            "type": "scatter",
            "x": xs,
            "y": ys,
            "mode": outline_mode,
            "fill": "toself",
            "fillcolor": fill_color,
            "line": { "color": line_color, "width": 1.5 },
            "name": trace.name,
            "legendgroup": trace.name,
            "hoverinfo": "skip",
        }));

        traces.push(json!({
            "type": "scatter",
            "x": [shape.anchors[0][0], shape.anchors[1][0]],
            "y": [shape.anchors[0][1], shape.anchors[1][1]],
            "mode": "markers",
            "marker": { "color": line_color, "size": 8, "symbol": "circle" },
            "name": format!("{} Range", trace.name),
            "legendgroup": trace.name,
            "showlegend": false,
        }));

        if settings.show_labels {
            traces.push(json!({
                "type": "scatter",
                "x": [shape.label[0]],
                "y": [shape.label[1]],
                "mode": "text",
                "text": [trace.name],
                "textposition": "middle center",
                "name": trace.name,
                "legendgroup": trace.name,
                "showlegend": false,
                "hoverinfo": "skip",
            }));
        }
    }

    traces
}

pub fn plotly_layout(scale: ScaleMode, settings: &PlotSettings) -> Value {
    let theme = settings.theme;
    let grid = theme.grid_css();
    let axis_type = if scale.is_log() { "log" } else { "linear" };
    json!({
        "title": { "text": settings.title },
        "paper_bgcolor": theme.background_css(),
        "plot_bgcolor": theme.background_css(),
        "font": { "color": theme.text_css() },
        "height": 600,
        "xaxis": { "title": { "text": settings.x_label }, "gridcolor": grid, "zeroline": false },
        "yaxis": {
            "title": { "text": settings.y_axis_title() },
            "type": axis_type,
            "gridcolor": grid,
        },
    })
}

/// Full page. plotly.js is loaded from the CDN.
pub fn render_html(figure: &Figure, settings: &PlotSettings) -> Result<String, ExportError> {
    let data = serde_json::to_string(&plotly_traces(figure, settings))?;
    let layout = serde_json::to_string(&plotly_layout(figure.scale(), settings))?;
    let title = escape_html(&settings.title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="envelope-plot" style="width:100%;height:600px;"></div>
<script>
Plotly.newPlot("envelope-plot", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
        data = escape_script(&data),
        layout = escape_script(&layout),
    ))
}

pub fn save_html(path: &Path, figure: &Figure, settings: &PlotSettings) -> Result<(), ExportError> {
    if figure.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    std::fs::write(path, render_html(figure, settings)?)?;
    tracing::info!(path = %path.display(), traces = figure.traces.len(), "exported HTML");
    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Keep `</script>` inside JSON strings from closing the script element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::device_record::{sample_records, DeviceRecord};
    use crate::state::palette::CIVIDIS;

    fn figure(scale: ScaleMode) -> Figure {
        Figure::build(&sample_records(), scale, &CIVIDIS)
    }

    #[test]
    fn three_traces_per_device_share_a_legend_group() {
        let settings = PlotSettings::default();
        let traces = plotly_traces(&figure(ScaleMode::Log), &settings);
        assert_eq!(traces.len(), 12);

        let env = &traces[0];
        assert_eq!(env["fill"], "toself");
        assert_eq!(env["name"], "Jetson Nano");
        assert_eq!(env["x"].as_array().unwrap().len(), 100);
        assert_eq!(env["fillcolor"], "rgba(0,34,78,0.3)");

        let markers = &traces[1];
        assert_eq!(markers["mode"], "markers");
        assert_eq!(markers["legendgroup"], "Jetson Nano");
        assert_eq!(markers["showlegend"], false);
        assert_eq!(markers["y"], json!([0.2, 0.5]));

        assert_eq!(traces[2]["mode"], "text");
    }

    #[test]
    fn labels_can_be_turned_off() {
        let settings = PlotSettings {
            show_labels: false,
            ..PlotSettings::default()
        };
        assert_eq!(plotly_traces(&figure(ScaleMode::Log), &settings).len(), 8);
    }

    #[test]
    fn layout_follows_scale_and_labels() {
        let settings = PlotSettings::default();
        let layout = plotly_layout(ScaleMode::Log, &settings);
        assert_eq!(layout["yaxis"]["type"], "log");
        assert_eq!(layout["yaxis"]["title"]["text"], "AI Performance (TOPS)");
        assert_eq!(layout["plot_bgcolor"], "white");
        assert_eq!(plotly_layout(ScaleMode::Linear, &settings)["yaxis"]["type"], "linear");
    }

    #[test]
    fn page_embeds_escaped_data() {
        let records = vec![DeviceRecord::new("</script><b>", 1.0, 2.0, 1.0, 2.0)];
        let fig = Figure::build(&records, ScaleMode::Log, &CIVIDIS);
        let settings = PlotSettings {
            title: "A & B".to_string(),
            ..PlotSettings::default()
        };
        let html = render_html(&fig, &settings).unwrap();
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("Plotly.newPlot"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn empty_figure_is_not_exported() {
        let fig = Figure::build(&[], ScaleMode::Log, &CIVIDIS);
        let path = std::env::temp_dir().join("envelope_plot_empty_export.html");
        let err = save_html(&path, &fig, &PlotSettings::default()).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
    }
}
