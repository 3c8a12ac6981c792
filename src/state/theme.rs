use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    /// Color for device labels drawn on top of the envelopes.
    pub fn label_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(230, 230, 230),
            Theme::Light => Color32::from_rgb(40, 40, 40),
        }
    }

    /// Page and plot background for the HTML export.
    pub fn background_css(&self) -> &'static str {
        match self {
            Theme::Dark => "rgb(17,17,17)",
            Theme::Light => "white",
        }
    }

    /// Font color for the HTML export.
    pub fn text_css(&self) -> &'static str {
        match self {
            Theme::Dark => "rgb(242,245,250)",
            Theme::Light => "rgb(42,63,95)",
        }
    }

    /// Axis grid color for the HTML export.
    pub fn grid_css(&self) -> &'static str {
        match self {
            Theme::Dark => "rgb(80,80,80)",
            Theme::Light => "lightgrey",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}
