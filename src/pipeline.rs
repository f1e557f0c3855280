//! Barcode Pipeline - Single Entry Point
//!
//! validate -> checksum -> encode -> assemble -> render. Every public
//! operation goes through `validate`; there is no path to the encoders
//! that skips it.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::assembler;
use crate::checksum::{self, CheckDigit, EncodeOptions};
use crate::error::{AssemblyError, CharsetError, EncodeError, ProfileError, RenderError};
use crate::hashing::{compute_image_hash, compute_job_hash};
use crate::pattern::WidthSequence;
use crate::profiles::{ProfileRegistry, RenderProfile};
use crate::render::{self, HumanReadable, RenderOptions, RenderedImage};
use crate::symbologies::{self, gs1};
use crate::symbology::Symbology;
use crate::validation::{ValidatedData, Validator};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Profile {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Profile {profile} is fixed to {expected}, request asked for {actual}")]
    ProfileSymbologyMismatch {
        profile: String,
        expected: Symbology,
        actual: Symbology,
    },

    #[error("Profile {0} names no symbology and none was given")]
    MissingSymbology(String),

    #[error("Invalid data: {0}")]
    Charset(#[from] CharsetError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingRequest {
    pub data: String,
    pub symbology: Symbology,
    #[serde(default)]
    pub encode: EncodeOptions,
    #[serde(default)]
    pub render: RenderOptions,
}

impl EncodingRequest {
    pub fn new(symbology: Symbology, data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            symbology,
            encode: EncodeOptions::default(),
            render: RenderOptions::default(),
        }
    }

    pub fn with_encode(mut self, encode: EncodeOptions) -> Self {
        self.encode = encode;
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// Encoded and assembled, not yet rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedBarcode {
    pub symbology: Symbology,
    /// Human-readable interpretation.
    pub text: String,
    /// Data and check characters as they appear in the symbol.
    pub encoded: String,
    pub check_digit: Option<CheckDigit>,
    pub sequence: WidthSequence,
    /// GS1 assigning country, EAN/UPC family only.
    pub country: Option<&'static str>,
}

impl EncodedBarcode {
    /// Label text as `options` asks for it: split digit groups or one line.
    pub fn human_readable(&self, options: &RenderOptions) -> HumanReadable {
        if options.standard_label {
            HumanReadable::for_symbol(self.symbology, &self.text, &self.sequence)
        } else {
            HumanReadable::Line(self.text.clone())
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedBarcode {
    pub barcode: EncodedBarcode,
    pub image: RenderedImage,
    pub encoding_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeManifest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub symbology: Symbology,
    pub data: String,
    pub encoded_text: String,
    pub check_digit: Option<CheckDigit>,
    pub total_units: u32,
    pub width: u32,
    pub height: u32,
    pub job_hash: String,
    pub image_hash: String,
}

/// The barcode pipeline - single entry point for encoding and rendering
pub struct BarcodePipeline {
    registry: ProfileRegistry,
    validator: Validator,
}

impl BarcodePipeline {
    pub fn new(registry: ProfileRegistry) -> Self {
        Self {
            registry,
            validator: Validator::new(),
        }
    }

    pub fn list_profiles(&self) -> Vec<&RenderProfile> {
        self.registry.list()
    }

    pub fn get_profile(&self, id: &str) -> Option<&RenderProfile> {
        self.registry.get(id)
    }

    /// This is the ONLY validation entry point.
    pub fn validate(
        &self,
        data: &str,
        symbology: Symbology,
        options: &EncodeOptions,
    ) -> Result<ValidatedData, PipelineError> {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        Ok(self.validator.validate(data, symbology, options)?)
    }

    /// Build a request from a profile. `symbology` may be omitted when the
    /// profile fixes one, and must agree with it otherwise.
    pub fn request_from_profile(
        &self,
        profile_id: &str,
        data: &str,
        symbology: Option<Symbology>,
    ) -> Result<EncodingRequest, PipelineError> {
        let profile = self
            .registry
            .get(profile_id)
            .ok_or_else(|| PipelineError::ProfileNotFound(profile_id.to_string()))?;
        self.check_engine_version(profile)?;
        if profile.deprecated {
            log::warn!("profile {} is deprecated", profile.id);
        }

        let symbology = match (profile.symbology, symbology) {
            (Some(expected), Some(actual)) if expected != actual => {
                return Err(PipelineError::ProfileSymbologyMismatch {
                    profile: profile.id.clone(),
                    expected,
                    actual,
                });
            }
            (Some(s), _) | (None, Some(s)) => s,
            (None, None) => return Err(PipelineError::MissingSymbology(profile.id.clone())),
        };

        Ok(EncodingRequest {
            data: data.to_string(),
            symbology,
            encode: profile.encode.clone(),
            render: profile.render.clone(),
        })
    }

    /// Validate, compute the check characters, encode and assemble.
    ///
    /// CRITICAL: This ALWAYS calls validate internally.
    pub fn encode(&self, request: &EncodingRequest) -> Result<EncodedBarcode, PipelineError> {
        let symbology = request.symbology;
        let validated = self.validate(&request.data, symbology, &request.encode)?;
        log::debug!("validated {:?} as {} payload {:?}", request.data, symbology, validated.payload());

        let check = checksum::compute(&validated, &request.encode);
        if let Some(c) = &check {
            log::debug!("{} check {:?}", symbology, c);
        }

        let symbol = symbologies::encode(&validated, check.as_ref())?;
        let sequence = assembler::assemble(&symbol, symbology.quiet_zone())?;

        let payload = validated.payload();
        let encoded = format!("{}{}", payload, check.as_ref().map(|c| c.text.as_str()).unwrap_or(""));
        let country = match symbology {
            Symbology::UpcA => gs1::assigning_country(&format!("0{}", payload)),
            s if s.is_gs1_retail() => gs1::assigning_country(payload),
            _ => None,
        };

        Ok(EncodedBarcode {
            symbology,
            text: symbol.text,
            encoded,
            check_digit: check,
            sequence,
            country,
        })
    }

    /// Full pipeline to pixels.
    pub fn generate(&self, request: &EncodingRequest) -> Result<GeneratedBarcode, PipelineError> {
        let started = Instant::now();
        let barcode = self.encode(request)?;
        let options = resolve_render_options(request);
        let image = render::render_labelled(&barcode.sequence, Some(&barcode.human_readable(&options)), &options)?;
        let encoding_time = started.elapsed();

        log::debug!(
            "{} {:?} -> {}x{} in {:?}",
            request.symbology,
            request.data,
            image.width(),
            image.height(),
            encoding_time
        );
        Ok(GeneratedBarcode { barcode, image, encoding_time })
    }

    /// Full pipeline to an SVG document.
    pub fn generate_svg(&self, request: &EncodingRequest) -> Result<String, PipelineError> {
        let barcode = self.encode(request)?;
        let options = resolve_render_options(request);
        let text = barcode.human_readable(&options);
        Ok(render::render_svg_labelled(&barcode.sequence, Some(&text), &options)?)
    }

    pub fn manifest(
        &self,
        request: &EncodingRequest,
        generated: &GeneratedBarcode,
    ) -> Result<BarcodeManifest, PipelineError> {
        let job_hash = compute_job_hash(request.symbology, request, ENGINE_VERSION)?;
        let image = &generated.image;

        Ok(BarcodeManifest {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            symbology: request.symbology,
            data: request.data.clone(),
            encoded_text: generated.barcode.encoded.clone(),
            check_digit: generated.barcode.check_digit.clone(),
            total_units: generated.barcode.sequence.total_units(),
            width: image.width(),
            height: image.height(),
            job_hash,
            image_hash: compute_image_hash(image.width(), image.height(), image.pixels()),
        })
    }

    fn check_engine_version(&self, profile: &RenderProfile) -> Result<(), PipelineError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| ProfileError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let min_ver = semver::Version::parse(&profile.engine_min_version)
            .map_err(|_| ProfileError::InvalidVersion(profile.engine_min_version.clone()))?;

        if engine_ver < min_ver {
            return Err(PipelineError::EngineVersionMismatch(
                profile.id.clone(),
                profile.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BarcodePipeline {
    fn default() -> Self {
        Self::new(ProfileRegistry::builtin())
    }
}

/// Symbology defaults for options the request leaves open.
fn resolve_render_options(request: &EncodingRequest) -> RenderOptions {
    let mut options = request.render.clone();
    if options.bearer_bars.is_none() {
        options.bearer_bars = Some(request.symbology.default_bearer_bars());
    }
    options
}
