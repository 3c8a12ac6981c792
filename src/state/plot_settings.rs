use serde::{Deserialize, Serialize};

use crate::geometry::{EnvelopeParams, ScaleMode};
use crate::state::palette::PaletteKind;
use crate::state::theme::Theme;

/// Chart options chosen by the user. Saved with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_unit: String,
    pub scale: ScaleMode,
    pub palette: PaletteKind,
    pub theme: Theme,
    /// Fill opacity of the envelopes, `[0, 1]`.
    pub fill_opacity: f32,
    pub show_labels: bool,
    pub envelope: EnvelopeParams,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            title: "Hardware Performance Envelopes".to_string(),
            x_label: "Power (W)".to_string(),
            y_label: "AI Performance".to_string(),
            y_unit: "TOPS".to_string(),
            scale: ScaleMode::Log,
            palette: PaletteKind::Cividis,
            theme: Theme::default(),
            fill_opacity: 0.3,
            show_labels: true,
            envelope: EnvelopeParams::default(),
        }
    }
}

impl PlotSettings {
    /// Performance axis title, e.g. `AI Performance (TOPS)`.
    pub fn y_axis_title(&self) -> String {
        let unit = self.y_unit.trim();
        if unit.is_empty() {
            self.y_label.clone()
        } else {
            format!("{} ({unit})", self.y_label)
        }
    }
}
