//! End-to-end conversion tests.

use std::cell::Cell;

use pretty_assertions::assert_eq;
use spectext_core::glyph::charset;
use spectext_core::wav::{compute_pcm_hash, extract_pcm_data, read_format};
use spectext_core::{
    compose, resolve_text, BuiltinAtlas, DirectoryAtlas, EncoderConfig, Glyph, GlyphAtlas,
    Pipeline, PipelineState, RenderOptions, SpectextError, SpectextResult,
};

/// Atlas wrapper that counts resolve calls.
struct CountingAtlas {
    inner: BuiltinAtlas,
    calls: Cell<usize>,
}

impl GlyphAtlas for CountingAtlas {
    fn resolve(&self, c: char) -> SpectextResult<Glyph> {
        self.calls.set(self.calls.get() + 1);
        self.inner.resolve(c)
    }
}

// ============================================================================
// Glyph resolution
// ============================================================================

#[test]
fn test_every_supported_char_resolves() {
    let atlas = BuiltinAtlas::default();
    for c in charset::supported_chars() {
        let glyph = atlas.resolve(c).unwrap();
        assert!(glyph.width > 0, "{:?} has zero width", c);
        assert!(glyph.height > 0, "{:?} has zero height", c);
        assert_eq!(glyph.character, c);
    }
}

#[test]
fn test_unsupported_chars_rejected() {
    let atlas = BuiltinAtlas::default();
    for c in ['@', '|', '`', '\n', 'ß', '😀'] {
        assert!(matches!(
            atlas.resolve(c),
            Err(SpectextError::UnsupportedCharacter { .. })
        ));
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_char_default_config() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("converted.wav");
    let atlas = BuiltinAtlas::default();
    let glyph_a = atlas.resolve('a').unwrap();

    let mut pipeline =
        Pipeline::new(atlas, EncoderConfig::default(), RenderOptions::default()).unwrap();
    let report = pipeline.run("a", &output).unwrap();

    let wav = std::fs::read(&output).unwrap();
    let format = read_format(&wav).unwrap();
    assert_eq!(format.channels, 1);
    assert_eq!(format.bits_per_sample, 16);
    assert_eq!(format.sample_rate, 44100);

    let frames = extract_pcm_data(&wav).unwrap().len() / 2;
    assert_eq!(frames, glyph_a.width as usize * 1470);
    assert_eq!(report.frames, frames);
    assert_eq!(compute_pcm_hash(&wav), Some(report.pcm_hash));
}

#[test]
fn test_two_chars_compose() {
    let atlas = BuiltinAtlas::default();
    let a = atlas.resolve('A').unwrap();
    let b = atlas.resolve('B').unwrap();

    let mut pipeline =
        Pipeline::new(atlas, EncoderConfig::default(), RenderOptions::default()).unwrap();
    let rendered = pipeline.render("AB").unwrap();

    assert_eq!(rendered.image.width, a.width + b.width);
    assert_eq!(rendered.image.height, a.height.min(b.height));
    assert_eq!(rendered.pcm.len(), rendered.image.width as usize * 1470);
}

#[test]
fn test_mixed_heights_clip_to_shortest() {
    let tmp = tempfile::tempdir().unwrap();
    let small = BuiltinAtlas::new(1).unwrap().resolve('x').unwrap();
    let large = BuiltinAtlas::new(2).unwrap().resolve('y').unwrap();

    // A directory atlas mixing both sizes.
    write_glyph_png(&tmp.path().join("x.PNG"), &small);
    write_glyph_png(&tmp.path().join("y.PNG"), &large);
    let glyphs = resolve_text(&DirectoryAtlas::new(tmp.path()), "xy").unwrap();
    let image = compose(&glyphs).unwrap();

    assert_eq!(image.width, small.width + large.width);
    assert_eq!(image.height, small.height);
}

#[test]
fn test_deterministic_output() {
    let config = EncoderConfig::default();
    let mut first =
        Pipeline::new(BuiltinAtlas::default(), config.clone(), RenderOptions::default()).unwrap();
    let mut second =
        Pipeline::new(BuiltinAtlas::default(), config, RenderOptions::default()).unwrap();

    let a = first.render("Hi!").unwrap();
    let b = second.render("Hi!").unwrap();
    assert_eq!(a.pcm, b.pcm);
    assert_eq!(a.wav.wav_data, b.wav.wav_data);
}

#[test]
fn test_threaded_output_matches() {
    let mut single = Pipeline::new(
        BuiltinAtlas::default(),
        EncoderConfig::default(),
        RenderOptions::default(),
    )
    .unwrap();
    let mut threaded = Pipeline::new(
        BuiltinAtlas::default(),
        EncoderConfig {
            threads: 4,
            ..Default::default()
        },
        RenderOptions::default(),
    )
    .unwrap();

    assert_eq!(
        single.render("x=1").unwrap().wav.pcm_hash,
        threaded.render("x=1").unwrap().wav.pcm_hash
    );
}

#[test]
fn test_config_error_before_glyph_work() {
    let atlas = CountingAtlas {
        inner: BuiltinAtlas::default(),
        calls: Cell::new(0),
    };
    let config = EncoderConfig {
        pixels_per_second: 29,
        ..Default::default()
    };

    let result = Pipeline::new(&atlas, config, RenderOptions::default());
    assert!(matches!(result, Err(SpectextError::Config { .. })));
    assert_eq!(atlas.calls.get(), 0);
}

#[test]
fn test_unsupported_char_aborts_run() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out.wav");
    let atlas = CountingAtlas {
        inner: BuiltinAtlas::default(),
        calls: Cell::new(0),
    };
    let mut pipeline =
        Pipeline::new(&atlas, EncoderConfig::default(), RenderOptions::default()).unwrap();

    let err = pipeline.run("ok|no", &output).unwrap_err();
    assert!(matches!(
        err,
        SpectextError::UnsupportedCharacter {
            character: '|',
            position: 2
        }
    ));
    assert_eq!(atlas.calls.get(), 2);
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(!output.exists());
}

#[test]
fn test_missing_asset_aborts_run() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out.wav");
    let mut pipeline = Pipeline::new(
        DirectoryAtlas::new(tmp.path().join("characters")),
        EncoderConfig::default(),
        RenderOptions::default(),
    )
    .unwrap();

    let err = pipeline.run("a", &output).unwrap_err();
    assert!(matches!(err, SpectextError::AssetLoad { character: 'a', .. }));
    assert!(!output.exists());
}

#[test]
fn test_debug_image_written() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out.wav");
    let debug = tmp.path().join("debug").join("composite.png");
    let mut pipeline = Pipeline::new(
        BuiltinAtlas::default(),
        EncoderConfig {
            sample_rate: 8000,
            pixels_per_second: 100,
            max_freq: 4000.0,
            ..Default::default()
        },
        RenderOptions {
            debug_image: Some(debug.clone()),
            ..Default::default()
        },
    )
    .unwrap();

    let report = pipeline.run("ab", &output).unwrap();
    assert_eq!(report.debug_image.as_deref(), Some(debug.as_path()));

    let decoder = png::Decoder::new(std::fs::File::open(&debug).unwrap());
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, report.width);
    assert_eq!(reader.info().height, report.height);
}

#[test]
fn test_existing_output_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out.wav");
    std::fs::write(&output, b"stale").unwrap();

    let mut pipeline = Pipeline::new(
        BuiltinAtlas::default(),
        EncoderConfig::default(),
        RenderOptions::default(),
    )
    .unwrap();

    // A failed run keeps the old file untouched.
    assert!(pipeline.run("@", &output).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"stale");

    pipeline.run(".", &output).unwrap();
    assert_eq!(&std::fs::read(&output).unwrap()[0..4], b"RIFF");
}

fn write_glyph_png(path: &std::path::Path, glyph: &Glyph) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(file, glyph.width, glyph.height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(&glyph.pixels).unwrap();
}
