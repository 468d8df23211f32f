//! spectext core
//!
//! Renders text as audio whose spectrogram displays the text. Each character
//! becomes a glyph bitmap, the glyphs are composited into one grayscale image,
//! and every image column is synthesized as a short block of summed sine
//! tones: one tone per row, at a frequency fixed by the row's height.
//!
//! # Determinism
//!
//! Encoding is a pure function of the text, the glyph atlas and the
//! [`EncoderConfig`]. The same inputs always yield byte-identical PCM, whether
//! the column loop runs on one thread or several.
//!
//! # Example
//!
//! ```no_run
//! use spectext_core::{BuiltinAtlas, EncoderConfig, Pipeline, RenderOptions};
//!
//! let mut pipeline = Pipeline::new(
//!     BuiltinAtlas::default(),
//!     EncoderConfig::default(),
//!     RenderOptions::default(),
//! )?;
//! let report = pipeline.run("hello", "converted.wav".as_ref())?;
//! println!("PCM hash: {}", report.pcm_hash);
//! # Ok::<(), spectext_core::SpectextError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`glyph`] - character to bitmap lookup and the supported charset
//! - [`compose`] - horizontal glyph compositing
//! - [`tone`] - windowed tone synthesis and memoization
//! - [`encode`] - the spectrogram encoder
//! - [`wav`] - deterministic WAV container writer
//! - [`png`] - deterministic grayscale PNG writer for debug images
//! - [`pipeline`] - end-to-end conversion with atomic file output

pub mod compose;
pub mod config;
pub mod encode;
pub mod error;
pub mod glyph;
pub mod pipeline;
pub mod png;
pub mod tone;
pub mod wav;

// Re-export main types at crate root
pub use compose::{compose, CompositeImage};
pub use config::{EncoderConfig, RenderOptions, Timing};
pub use encode::{accumulate, FrequencyMap, PcmBuffer, Progress, SpectrogramEncoder};
pub use error::{SpectextError, SpectextResult};
pub use glyph::{resolve_text, BuiltinAtlas, DirectoryAtlas, Glyph, GlyphAtlas};
pub use pipeline::{Pipeline, PipelineState, RenderReport, Rendered, DEFAULT_OUTPUT};
pub use tone::ToneCache;
pub use wav::{WavFormat, WavResult};
