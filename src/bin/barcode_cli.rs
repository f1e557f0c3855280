//! Barcode CLI - JSON bridge to the barcode pipeline
//!
//! Commands: symbologies, profiles, validate, encode
//! Outputs JSON to stdout
//! Returns 2 when the data or the request is rejected

use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use barcode_core::{
    print::LengthUnit, BarcodePipeline, EncodeOptions, EncodingRequest, PrintSpec, ProfileRegistry,
    RenderOptions, Symbology,
};

#[derive(Parser)]
#[command(name = "barcode-cli")]
#[command(about = "Barcode CLI - Linear Barcode Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to render profiles directory
    #[arg(short, long, default_value = "profiles")]
    profiles_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported symbologies
    Symbologies,

    /// List available render profiles
    Profiles,

    /// Validate data for a symbology
    Validate {
        #[arg(short, long)]
        symbology: Symbology,

        #[arg(short, long)]
        data: String,

        /// Append optional check characters
        #[arg(long)]
        checksum: bool,
    },

    /// Encode and render a barcode
    Encode {
        /// Required unless the profile fixes one
        #[arg(short, long)]
        symbology: Option<Symbology>,

        #[arg(short, long)]
        data: String,

        #[arg(long)]
        checksum: bool,

        /// Render profile ID
        #[arg(long)]
        profile: Option<String>,

        /// JSON payload (RenderOptions), replaces the profile's options
        #[arg(long)]
        payload: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
        format: OutputFormat,

        /// Printer resolution for physical size
        #[arg(long)]
        dpi: Option<u32>,

        /// X-dimension in millimetres; needs --dpi
        #[arg(long, requires = "dpi")]
        x_dim_mm: Option<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Png,
    Svg,
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => println!(r#"{{"success": false, "error": "Serialization failed: {}"}}"#, e),
    }
}

fn failure(message: impl std::fmt::Display) -> ExitCode {
    print_json(&serde_json::json!({
        "success": false,
        "error": message.to_string(),
    }));
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let registry = match ProfileRegistry::load_from_dir(&cli.profiles_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load profiles: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = BarcodePipeline::new(registry);

    match cli.command {
        Commands::Symbologies => {
            let symbologies: Vec<_> = Symbology::ALL
                .iter()
                .map(|s| serde_json::json!({
                    "id": s,
                    "name": s.name(),
                    "quiet_zone": s.quiet_zone(),
                    "checksum": s.checksum_policy(),
                    "fixed_length": s.is_fixed_length(),
                }))
                .collect();
            print_json(&symbologies);
            ExitCode::SUCCESS
        }

        Commands::Profiles => {
            let profiles: Vec<_> = pipeline
                .list_profiles()
                .iter()
                .map(|p| serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "version": p.profile_version,
                    "symbology": p.symbology,
                    "deprecated": p.deprecated,
                }))
                .collect();
            print_json(&profiles);
            ExitCode::SUCCESS
        }

        Commands::Validate { symbology, data, checksum } => {
            let options = EncodeOptions { checksum, ..EncodeOptions::default() };
            match pipeline.validate(&data, symbology, &options) {
                Ok(validated) => {
                    print_json(&serde_json::json!({ "valid": true, "data": validated }));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    print_json(&serde_json::json!({ "valid": false, "error": e.to_string() }));
                    ExitCode::from(2)
                }
            }
        }

        Commands::Encode { symbology, data, checksum, profile, payload, format, dpi, x_dim_mm } => {
            let request = match (&profile, symbology) {
                (Some(id), s) => match pipeline.request_from_profile(id, &data, s) {
                    Ok(r) => r,
                    Err(e) => return failure(e),
                },
                (None, Some(s)) => EncodingRequest::new(s, data),
                (None, None) => return failure("--symbology is required without --profile"),
            };

            let mut request = request;
            if checksum {
                request.encode.checksum = true;
            }
            if let Some(json) = payload {
                request.render = match serde_json::from_str::<RenderOptions>(&json) {
                    Ok(r) => r,
                    Err(e) => return failure(format!("Invalid payload: {}", e)),
                };
            }

            let print = match dpi.map(PrintSpec::from_user).transpose() {
                Ok(p) => p,
                Err(e) => return failure(e),
            };
            if let (Some(spec), Some(mm)) = (&print, x_dim_mm) {
                request.render.scale = match spec.scale_for_x_dimension(mm) {
                    Ok(s) => s,
                    Err(e) => return failure(e),
                };
            }

            let generated = match pipeline.generate(&request) {
                Ok(g) => g,
                Err(e) => return failure(e),
            };
            let manifest = match pipeline.manifest(&request, &generated) {
                Ok(m) => m,
                Err(e) => return failure(e),
            };

            let (mime, bytes) = match format {
                OutputFormat::Png => match generated.image.to_png_bytes() {
                    Ok(b) => ("image/png", b),
                    Err(e) => return failure(e),
                },
                OutputFormat::Svg => match pipeline.generate_svg(&request) {
                    Ok(s) => ("image/svg+xml", s.into_bytes()),
                    Err(e) => return failure(e),
                },
            };

            print_json(&serde_json::json!({
                "success": true,
                "manifest": manifest,
                "text": generated.barcode.text,
                "country": generated.barcode.country,
                "encoding_time_us": generated.encoding_time.as_micros() as u64,
                "physical_size_mm": print.map(|p| p.image_size(&generated.image, LengthUnit::Millimetre)),
                "mime": mime,
                "data_base64": base64::engine::general_purpose::STANDARD.encode(&bytes),
            }));
            ExitCode::SUCCESS
        }
    }
}
