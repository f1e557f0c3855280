//! Error Taxonomy - one enum per stage

use thiserror::Error;

use crate::symbology::Symbology;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    #[error("Input is empty")]
    Empty,

    #[error("Invalid character {ch:?} at index {index}")]
    InvalidCharacter { index: usize, ch: char },

    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: String, actual: usize },

    #[error("Invalid prefix: expected {expected}, got {actual}")]
    InvalidPrefix { expected: String, actual: String },

    #[error("Value {value} out of range {min}..={max}")]
    OutOfRange { value: u64, min: u64, max: u64 },

    #[error("Check digit mismatch: computed {expected}, supplied {actual}")]
    CheckDigitMismatch { expected: char, actual: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Character {ch:?} at index {index} has no pattern")]
    UnsupportedCharacter { index: usize, ch: char },

    #[error("{symbology} holds at most {max} digits, got {actual}")]
    DataTooLongForFixedFormat { symbology: Symbology, max: usize, actual: usize },

    #[error("UPC-A {0} cannot be compressed to UPC-E")]
    NotCompressible(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Symbol has no modules")]
    EmptySymbol,

    #[error("Adjacent modules share polarity at index {index}")]
    PolarityViolation { index: usize },

    #[error("Zero-width module at index {index}")]
    ZeroWidthModule { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u64, height: u64 },

    #[error("Unsupported rotation: {0} degrees")]
    UnsupportedRotation(i32),

    #[error("Invalid color {0:?}, expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Invalid aspect ratio {0}, expected a positive number")]
    InvalidAspectRatio(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Failed to write SVG: {0}")]
    Svg(#[from] std::fmt::Error),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profiles: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid version {0}")]
    InvalidVersion(String),
}
