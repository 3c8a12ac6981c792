pub mod envelope;
pub mod extent;
pub mod scale;

pub use envelope::{compute_envelope, compute_envelope_with, Ellipse, EnvelopeParams, EnvelopeShape, Outline};
pub use extent::DatasetExtent;
pub use scale::{RenderMode, ScaleMode};
