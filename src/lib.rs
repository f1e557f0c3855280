//! Barcode Core - Linear Barcode Compiler
//!
//! Raw data goes through five stages, each with its own error type:
//! 1. Validate against the symbology's character set and length
//! 2. Compute check characters
//! 3. Encode into codewords
//! 4. Assemble codewords into a WidthSequence with quiet zones
//! 5. Render to pixels or SVG
//!
//! `BarcodePipeline` runs them in order and is the only public path that
//! reaches the encoders.

pub mod assembler;
pub mod checksum;
pub mod error;
pub mod hashing;
pub mod pattern;
pub mod pipeline;
pub mod print;
pub mod profiles;
pub mod render;
pub mod symbologies;
pub mod symbology;
pub mod validation;

pub use checksum::{CheckDigit, EncodeOptions, MsiCheck};
pub use error::{AssemblyError, CharsetError, EncodeError, ProfileError, RenderError};
pub use hashing::{canonical_json, compute_job_hash, compute_manifest_hash};
pub use pattern::{BarHeight, Codeword, Module, Polarity, WidthSequence};
pub use pipeline::{
    BarcodeManifest, BarcodePipeline, EncodedBarcode, EncodingRequest, GeneratedBarcode, PipelineError,
};
pub use print::{PrintAuthority, PrintSpec};
pub use profiles::{ProfileRegistry, RenderProfile};
pub use render::{
    render, render_svg, Alignment, Color, HumanReadable, LabelFont, LabelGroup, LabelPosition, RenderOptions,
    RenderedImage, Rotation, Scale,
};
pub use symbology::{ChecksumPolicy, Symbology};
pub use validation::{validate, ValidatedData, Validator};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_PROFILE_VERSION: &str = "1.0.0";
