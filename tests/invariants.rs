//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::fs;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use barcode_core::{
    hashing::compute_manifest_hash,
    symbologies::code39,
    BarcodePipeline, CharsetError, EncodeOptions, EncodingRequest, PipelineError, Polarity, ProfileRegistry,
    RenderError, RenderOptions, RenderedImage, Rotation, Scale, Symbology,
};

const CODE39_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

fn pick(rng: &mut StdRng, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

fn digits(rng: &mut StdRng, len: usize) -> String {
    pick(rng, b"0123456789", len)
}

fn printable(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| char::from(rng.random_range(32u8..127))).collect()
}

/// Some data every validator accepts.
fn random_input(rng: &mut StdRng, symbology: Symbology) -> String {
    let n = rng.random_range(1..=12);
    match symbology {
        Symbology::Code39 => pick(rng, CODE39_CHARS, n),
        Symbology::Code39Extended
        | Symbology::Code93
        | Symbology::Code128
        | Symbology::Code128B
        | Symbology::Telepen => printable(rng, n),
        Symbology::Code128A => pick(rng, b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ !#$%", n),
        Symbology::Code128C | Symbology::Interleaved2of5 => digits(rng, 2 * n),
        Symbology::Ean13 => digits(rng, 12),
        Symbology::Jan13 => format!("49{}", digits(rng, 10)),
        Symbology::Ean8 => digits(rng, 7),
        Symbology::UpcA => digits(rng, 11),
        Symbology::UpcE => digits(rng, 6),
        Symbology::UpcSupplement2 => digits(rng, 2),
        Symbology::UpcSupplement5 => digits(rng, 5),
        Symbology::Isbn => digits(rng, 9),
        Symbology::Codabar => pick(rng, b"0123456789-$:/.+", n),
        Symbology::Standard2of5 | Symbology::Msi => digits(rng, n),
        Symbology::Iata2of5 => digits(rng, 16),
        Symbology::Itf14 => digits(rng, 13),
        Symbology::Code11 => pick(rng, b"0123456789-", n),
        Symbology::Pharmacode => rng.random_range(3..=131_070u32).to_string(),
        Symbology::PostNet => digits(rng, 5),
        Symbology::Fim => pick(rng, b"ABCDE", 1),
    }
}

#[test]
fn invariant_every_symbology_alternates_polarity() {
    let pipeline = BarcodePipeline::default();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for symbology in Symbology::ALL {
        for _ in 0..25 {
            let data = random_input(&mut rng, symbology);
            let checksum = rng.random_bool(0.5) && symbology != Symbology::Interleaved2of5;
            let request = EncodingRequest::new(symbology, data.clone())
                .with_encode(EncodeOptions { checksum, ..EncodeOptions::default() });
            let barcode = pipeline
                .encode(&request)
                .unwrap_or_else(|e| panic!("{} {:?}: {}", symbology, data, e));

            let modules = barcode.sequence.modules();
            assert_eq!(modules.first().map(|m| m.polarity), Some(Polarity::Space));
            assert_eq!(modules.last().map(|m| m.polarity), Some(Polarity::Space));
            assert!(modules.iter().all(|m| m.width > 0));
            assert!(modules.windows(2).all(|w| w[0].polarity != w[1].polarity), "{} {:?}", symbology, data);
            assert_eq!(barcode.sequence.quiet_zone_units(), symbology.quiet_zone());
        }
    }
}

#[test]
fn invariant_code39_round_trip() {
    let pipeline = BarcodePipeline::default();
    let mut rng = StdRng::seed_from_u64(39);

    for _ in 0..200 {
        let len = rng.random_range(1..=30);
        let data = pick(&mut rng, CODE39_CHARS, len);
        let barcode = pipeline.encode(&EncodingRequest::new(Symbology::Code39, data.clone())).unwrap();
        assert_eq!(code39::decode(&barcode.sequence), Some(data));
    }
}

#[test]
fn invariant_upc_a_check_digit_balances() {
    let pipeline = BarcodePipeline::default();
    let mut rng = StdRng::seed_from_u64(12);

    for _ in 0..200 {
        let data = digits(&mut rng, 11);
        let barcode = pipeline.encode(&EncodingRequest::new(Symbology::UpcA, data)).unwrap();
        let values: Vec<u32> = barcode.encoded.chars().filter_map(|c| c.to_digit(10)).collect();
        assert_eq!(values.len(), 12);
        let odd: u32 = values.iter().step_by(2).sum();
        let even: u32 = values.iter().skip(1).step_by(2).sum();
        assert_eq!((3 * odd + even) % 10, 0);
    }
}

#[test]
fn invariant_code39_digits_match_published_table() {
    let pipeline = BarcodePipeline::default();
    let barcode = pipeline.encode(&EncodingRequest::new(Symbology::Code39, "1234567890")).unwrap();

    let table = [
        "121121211", // *
        "211211112", "112211112", "212211111", "111221112", "211221111",
        "112221111", "111211212", "211211211", "112211211", "111221211",
        "121121211", // *
    ];
    let mut expected = Vec::new();
    for (i, widths) in table.iter().enumerate() {
        if i > 0 {
            expected.push(1);
        }
        expected.extend(widths.chars().filter_map(|c| c.to_digit(10)));
    }

    let actual: Vec<u32> = barcode.sequence.symbol_modules().iter().map(|m| m.width).collect();
    assert_eq!(actual, expected);
    assert_eq!(barcode.check_digit, None);
}

#[test]
fn invariant_upc_a_scenario() {
    let pipeline = BarcodePipeline::default();
    let barcode = pipeline.encode(&EncodingRequest::new(Symbology::UpcA, "123456789012")).unwrap();
    assert_eq!(barcode.check_digit.as_ref().map(|c| c.text.as_str()), Some("2"));
    assert_eq!(barcode.sequence.symbol_units(), 95);
}

#[test]
fn invariant_invalid_character_reported_with_index() {
    let pipeline = BarcodePipeline::default();
    let err = pipeline.encode(&EncodingRequest::new(Symbology::Ean13, "12AB")).unwrap_err();
    match err {
        PipelineError::Charset(CharsetError::InvalidCharacter { index, ch }) => {
            assert_eq!((index, ch), (2, 'A'));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn invariant_double_scale_doubles_every_edge() {
    let pipeline = BarcodePipeline::default();
    let base = EncodingRequest::new(Symbology::Code128, "Barcode 128");
    let at = |px: u32| {
        let request = base.clone().with_render(RenderOptions {
            scale: Scale::BarWidth(px),
            ..RenderOptions::default().without_label()
        });
        pipeline.generate(&request).unwrap().image
    };
    let one = at(1);
    let two = at(2);

    assert_eq!(two.width(), 2 * one.width());
    let (one, two) = (one.as_image(), two.as_image());
    for x in 0..one.width() {
        assert_eq!(one.get_pixel(x, 0), two.get_pixel(2 * x, 0));
        assert_eq!(one.get_pixel(x, 0), two.get_pixel(2 * x + 1, 0));
    }
}

#[test]
fn invariant_quarter_rotation_swaps_dimensions() {
    let pipeline = BarcodePipeline::default();
    let request = EncodingRequest::new(Symbology::UpcA, "03600029145");
    let upright = pipeline.generate(&request).unwrap().image;

    let rotated_request = request.clone().with_render(RenderOptions {
        rotation: Rotation::Quarter,
        ..RenderOptions::default()
    });
    let rotated = pipeline.generate(&rotated_request).unwrap().image;

    assert_eq!((rotated.width(), rotated.height()), (upright.height(), upright.width()));
}

#[test]
fn invariant_geometry_never_drops_modules() {
    let pipeline = BarcodePipeline::default();
    let squeezed = EncodingRequest::new(Symbology::Code128, "ABCDEFGHIJ").with_render(RenderOptions {
        scale: Scale::FitWidth(60),
        ..RenderOptions::default().without_label()
    });
    assert!(matches!(
        pipeline.generate(&squeezed),
        Err(PipelineError::Render(RenderError::InvalidDimensions { width: 60, .. }))
    ));

    let flat = EncodingRequest::new(Symbology::PostNet, "12345").with_render(RenderOptions {
        height_px: 1,
        ..RenderOptions::default().without_label()
    });
    assert!(matches!(
        pipeline.generate(&flat),
        Err(PipelineError::Render(RenderError::InvalidDimensions { height: 1, .. }))
    ));
}

/// Whether any label row between `x0` and `x1` holds a dark pixel.
fn label_ink(image: &RenderedImage, label_top: u32, x0: u32, x1: u32) -> bool {
    let image = image.as_image();
    (label_top..image.height()).any(|y| (x0..x1).any(|x| image.get_pixel(x, y).0 == [0, 0, 0, 255]))
}

#[test]
fn invariant_retail_labels_follow_symbol_halves() {
    let pipeline = BarcodePipeline::default();
    let options = RenderOptions { scale: Scale::BarWidth(2), height_px: 50, ..RenderOptions::default() };
    let label_top = 52;

    // EAN-13: quiet zone 0..22 px, centre guard 112..122 px
    let ean = pipeline
        .generate(&EncodingRequest::new(Symbology::Ean13, "400638133393").with_render(options.clone()))
        .unwrap()
        .image;
    assert!(label_ink(&ean, label_top, 0, 22));
    assert!(!label_ink(&ean, label_top, 92, 142));
    assert!(label_ink(&ean, label_top, 52, 88));

    // UPC-A: check digit printed in the right quiet zone
    let upc = pipeline
        .generate(&EncodingRequest::new(Symbology::UpcA, "03600029145").with_render(options.clone()))
        .unwrap()
        .image;
    assert_eq!(upc.width(), 226);
    assert!(label_ink(&upc, label_top, 208, 226));

    let plain = RenderOptions { standard_label: false, ..options };
    let upc_line = pipeline
        .generate(&EncodingRequest::new(Symbology::UpcA, "03600029145").with_render(plain))
        .unwrap()
        .image;
    assert!(!label_ink(&upc_line, label_top, 208, 226));
}

#[test]
fn invariant_manifest_hashes_reproducible() {
    let pipeline = BarcodePipeline::default();
    let request = EncodingRequest::new(Symbology::Itf14, "1234567890123");

    let first = pipeline.generate(&request).unwrap();
    let second = pipeline.generate(&request).unwrap();
    let m1 = pipeline.manifest(&request, &first).unwrap();
    let m2 = pipeline.manifest(&request, &second).unwrap();

    assert_eq!(m1.job_hash, m2.job_hash);
    assert_eq!(m1.image_hash, m2.image_hash);
    assert_ne!(m1.id, m2.id);
    assert_eq!(m1.encoded_text, "12345678901231");
    assert_eq!(compute_manifest_hash(&m1).unwrap().len(), 64);
}

#[test]
fn invariant_profile_directory_overrides_builtins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("retail.json"),
        r#"{"id": "retail", "name": "Retail (tall)", "symbology": "ean13", "render": {"heightPx": 90}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pallet.json"),
        r#"{"id": "pallet", "name": "Pallet", "profileVersion": "2.1.0", "render": {"scale": {"barWidth": 4}}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let registry = ProfileRegistry::load_from_dir(dir.path()).unwrap();
    assert_eq!(registry.get("retail").unwrap().render.height_px, 90);
    assert_eq!(registry.get("pallet").unwrap().render.scale, Scale::BarWidth(4));
    assert!(registry.get("shipping").is_some());
    assert_eq!(registry.list().len(), 5);

    let pipeline = BarcodePipeline::new(registry);
    let request = pipeline.request_from_profile("pallet", "PALLET-01", Some(Symbology::Code39)).unwrap();
    let generated = pipeline.generate(&request).unwrap();
    assert_eq!(generated.image.width(), generated.barcode.sequence.total_units() * 4);
}

#[test]
fn invariant_missing_profile_dir_keeps_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ProfileRegistry::load_from_dir(&dir.path().join("absent")).unwrap();
    assert_eq!(registry.list().len(), 4);
}

#[test]
fn invariant_profile_not_found_error() {
    let pipeline = BarcodePipeline::default();
    let err = pipeline.request_from_profile("nonexistent", "1", None).unwrap_err();
    assert!(err.to_string().contains("Profile not found"));
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_generate_calls_validate() {
    use barcode_core::pipeline::get_validation_call_count;

    let pipeline = BarcodePipeline::default();
    let before = get_validation_call_count();
    pipeline.generate(&EncodingRequest::new(Symbology::Code93, "TEST93")).unwrap();
    assert!(get_validation_call_count() > before);
}
