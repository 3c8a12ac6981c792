use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning one record into envelope geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvelopeError {
    /// Numeric input the geometry is undefined for.
    #[error("domain error: {0}")]
    Domain(String),
    /// Dataset-wide aggregates that cannot drive normalization.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EnvelopeError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// An [`EnvelopeError`] tagged with the record it came from.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {index} ({name}): {source}")]
pub struct RecordError {
    /// Position of the record in the input table, zero based.
    pub index: usize,
    pub name: String,
    #[source]
    pub source: EnvelopeError,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),
    #[error("cannot open Excel file: {0}")]
    Excel(String),
    #[error("no sheets found")]
    NoSheets,
    #[error("no data found")]
    Empty,
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("row {row}: column `{column}` is not a number: {value:?}")]
    InvalidValue {
        /// One-based data row, not counting the header.
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("pixel buffer does not match {width}x{height}")]
    BadPixelBuffer { width: u32, height: u32 },
    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("nothing to export")]
    NothingToExport,
}
