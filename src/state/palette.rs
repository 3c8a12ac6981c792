use serde::{Deserialize, Serialize};

/// Cividis sequential scale, dark blue to yellow.
pub const CIVIDIS: [[u8; 4]; 10] = [
    [0, 34, 78, 255],
    [18, 53, 112, 255],
    [59, 73, 108, 255],
    [87, 93, 109, 255],
    [112, 113, 115, 255],
    [138, 134, 120, 255],
    [165, 156, 116, 255],
    [195, 179, 105, 255],
    [225, 204, 85, 255],
    [254, 232, 56, 255],
];

/// Viridis sequential scale, purple to yellow.
pub const VIRIDIS: [[u8; 4]; 10] = [
    [68, 1, 84, 255],
    [72, 40, 120, 255],
    [62, 73, 137, 255],
    [49, 104, 142, 255],
    [38, 130, 142, 255],
    [31, 158, 137, 255],
    [53, 183, 121, 255],
    [110, 206, 88, 255],
    [181, 222, 43, 255],
    [253, 231, 37, 255],
];

/// Plasma sequential scale, indigo to yellow.
pub const PLASMA: [[u8; 4]; 10] = [
    [13, 8, 135, 255],
    [70, 3, 159, 255],
    [114, 1, 168, 255],
    [156, 23, 158, 255],
    [189, 55, 134, 255],
    [216, 87, 107, 255],
    [237, 121, 83, 255],
    [251, 159, 58, 255],
    [253, 202, 38, 255],
    [240, 249, 33, 255],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaletteKind {
    #[default]
    Cividis,
    Viridis,
    Plasma,
}

impl PaletteKind {
    pub const ALL: [PaletteKind; 3] = [PaletteKind::Cividis, PaletteKind::Viridis, PaletteKind::Plasma];

    pub fn colors(&self) -> &'static [[u8; 4]] {
        match self {
            PaletteKind::Cividis => &CIVIDIS,
            PaletteKind::Viridis => &VIRIDIS,
            PaletteKind::Plasma => &PLASMA,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaletteKind::Cividis => "Cividis",
            PaletteKind::Viridis => "Viridis",
            PaletteKind::Plasma => "Plasma",
        }
    }
}

/// Map the `index`-th of `total_count` series linearly onto `palette`.
///
/// The first series always gets the first color and the last series the
/// last one. Indices past the end clamp to the last color. Returns `None`
/// only for an empty palette.
pub fn assign_color(index: usize, total_count: usize, palette: &[[u8; 4]]) -> Option<[u8; 4]> {
    let last = palette.len().checked_sub(1)?;
    let denom = total_count.saturating_sub(1).max(1) as f64;
    let t = (index as f64 / denom).min(1.0);
    let idx = (t * last as f64).round() as usize;
    palette.get(idx.min(last)).copied()
}

/// `rgba(r,g,b,a)` string for web output, with `alpha` in `[0, 1]`.
pub fn css_rgba(color: [u8; 4], alpha: f64) -> String {
    format!(
        "rgba({},{},{},{})",
        color[0],
        color[1],
        color[2],
        alpha.clamp(0.0, 1.0)
    )
}

pub fn color32(color: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}
