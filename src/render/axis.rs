use crate::geometry::ScaleMode;

/// Format a numeric value for axis tick labels.
pub fn format_tick_value(val: f64) -> String {
    if val.abs() >= 1e6 || (val != 0.0 && val.abs() < 1e-3) {
        format!("{val:.2e}")
    } else if val == 0.0 {
        "0".to_string()
    } else {
        let s = format!("{val:.6}");
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

/// Tick label for a performance-axis grid mark given in plot coordinates.
pub fn format_y_tick(plot_y: f64, scale: ScaleMode) -> String {
    let value = scale.from_plot_y(plot_y);
    if !value.is_finite() {
        return String::new();
    }
    match scale {
        // 10^0.30103 should read as 2, not 1.999999
        ScaleMode::Log => format_tick_value(round_significant(value, 4)),
        ScaleMode::Linear => format_tick_value(value),
    }
}

/// Hover readout for a plot-space position, in display units.
pub fn format_coordinate(name: &str, x: f64, plot_y: f64, scale: ScaleMode, y_title: &str) -> String {
    let y = scale.from_plot_y(plot_y);
    let head = if name.is_empty() { String::new() } else { format!("{name}\n") };
    format!("{head}Power: {} W\n{y_title}: {}", format_tick_value(x), format_tick_value(round_significant(y, 4)))
}

fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}
