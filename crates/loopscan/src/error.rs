//! Error types for the loopscan library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loopscan operations.
#[derive(Debug, Error)]
pub enum LoopscanError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a numeric data file.
    #[error("Parse error in '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Pipeline configuration error (duplicate slot, missing gleaner, bad option).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An axis name other than 'x' or 'y'.
    #[error("Invalid axis '{0}': must be 'x' or 'y'")]
    InvalidAxis(String),

    /// The two halves of a curve have different lengths.
    #[error("Shape mismatch: x has {x_len} samples but y has {y_len}")]
    ShapeMismatch { x_len: usize, y_len: usize },

    /// A threshold or interval selected no points.
    #[error("Empty selection: {0}")]
    EmptySelection(String),

    /// A fit could not be performed over the selected points.
    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),

    /// A transform needs more samples than the curve provides.
    #[error("Insufficient samples: need {needed}, have {available}")]
    InsufficientSamples { needed: usize, available: usize },

    /// An index neighborhood extends past the data boundaries.
    #[error("Window of +/-{ks} samples around index {index} falls outside 0..{len}")]
    WindowOutOfRange { index: usize, ks: usize, len: usize },

    /// Sample count incompatible with the quarter-cycle partition.
    #[error("Sample count {0} is not a positive multiple of 4")]
    QuarterPartition(usize),

    /// Median filter window widths must be odd.
    #[error("Median filter window width {0} is even; widths must be odd")]
    EvenWindow(usize),

    /// A scan parameter was missing or had the wrong type.
    #[error("Missing or invalid parameter: {0}")]
    MissingParameter(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for loopscan operations.
pub type Result<T> = std::result::Result<T, LoopscanError>;
