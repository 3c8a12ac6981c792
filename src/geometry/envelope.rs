//! Tilted-ellipse envelope for one device.
//!
//! The two corners `(pmin, fmin)` and `(pmax, fmax)` become the ends of the
//! major axis. Geometry is computed in a transformed space (log10 or
//! normalized performance) and mapped back to display units afterwards.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;
use crate::geometry::scale::RenderMode;
use crate::state::device_record::DeviceRecord;

/// Boundary resolution. First and last samples coincide.
pub const DEFAULT_SAMPLES: usize = 100;

/// Minor/major axis ratio in linear mode.
pub const LINEAR_MINOR_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeParams {
    pub samples: usize,
    pub linear_minor_ratio: f64,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            linear_minor_ratio: LINEAR_MINOR_RATIO,
        }
    }
}

/// Ellipse parameters in geometry space (before the reverse transform).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: [f64; 2],
    pub semi_major: f64,
    pub semi_minor: f64,
    /// Rotation of the major axis, radians.
    pub angle: f64,
}

impl Ellipse {
    /// Point at parameter `t`, still in geometry space.
    pub fn point_at(&self, t: f64) -> [f64; 2] {
        let (sin_a, cos_a) = self.angle.sin_cos();
        let xs = self.semi_major * t.cos();
        let ys = self.semi_minor * t.sin();
        [
            self.center[0] + xs * cos_a - ys * sin_a,
            self.center[1] + xs * sin_a + ys * cos_a,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Closed polyline in display units.
    Ellipse(Vec<[f64; 2]>),
    /// Both corners coincide.
    Point([f64; 2]),
}

impl Outline {
    pub fn points(&self) -> &[[f64; 2]] {
        match self {
            Outline::Ellipse(points) => points,
            Outline::Point(p) => std::slice::from_ref(p),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Outline::Point(_))
    }
}

/// Everything a renderer needs to draw one device.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeShape {
    pub outline: Outline,
    /// `(pmin, fmin)` and `(pmax, fmax)`, always present.
    pub anchors: [[f64; 2]; 2],
    /// Visual center for the text label, display units.
    pub label: [f64; 2],
    pub ellipse: Ellipse,
}

pub fn compute_envelope(record: &DeviceRecord, mode: RenderMode) -> Result<EnvelopeShape, EnvelopeError> {
    compute_envelope_with(record, mode, &EnvelopeParams::default())
}

pub fn compute_envelope_with(
    record: &DeviceRecord,
    mode: RenderMode,
    params: &EnvelopeParams,
) -> Result<EnvelopeShape, EnvelopeError> {
    record.validate()?;
    mode.check_domain(record.fmin, record.fmax)?;

    let (x1, x2) = (record.pmin, record.pmax);
    let (y1, y2) = (mode.forward_y(record.fmin), mode.forward_y(record.fmax));

    let cx = (x1 + x2) / 2.0;
    let cy = (y1 + y2) / 2.0;
    let dx = x2 - x1;
    let dy = y2 - y1;
    let dist = dx.hypot(dy);
    let angle = dy.atan2(dx);

    let anchors = [record.min_corner(), record.max_corner()];
    let label = [cx, label_y(record, mode)];

    if dist == 0.0 {
        return Ok(EnvelopeShape {
            outline: Outline::Point([cx, mode.inverse_y(cy)]),
            anchors,
            label,
            ellipse: Ellipse {
                center: [cx, cy],
                semi_major: 0.0,
                semi_minor: 0.0,
                angle,
            },
        });
    }

    let a = dist / 2.0;
    let b = match mode {
        // Half the perpendicular distance from the off-diagonal corners to the major axis.
        RenderMode::Log => (dx * dy) / (2.0 * dist),
        RenderMode::Linear { .. } => a * params.linear_minor_ratio,
    };

    let ellipse = Ellipse {
        center: [cx, cy],
        semi_major: a,
        semi_minor: b,
        angle,
    };

    let samples = params.samples.max(2);
    let step = TAU / (samples - 1) as f64;
    let points = (0..samples)
        .map(|i| {
            let [x, y] = ellipse.point_at(step * i as f64);
            [x, mode.inverse_y(y)]
        })
        .collect();

    Ok(EnvelopeShape {
        outline: Outline::Ellipse(points),
        anchors,
        label,
        ellipse,
    })
}

fn label_y(record: &DeviceRecord, mode: RenderMode) -> f64 {
    match mode {
        // midpoint in log space; the product overflows for very large bounds
        RenderMode::Log => 10f64.powf((record.fmin.log10() + record.fmax.log10()) / 2.0),
        RenderMode::Linear { .. } => (record.fmin + record.fmax) / 2.0,
    }
}
