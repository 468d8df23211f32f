//! CLI argument definitions for the spectext command-line interface.
//!
//! The `#[derive(Parser)]` type lives here, keeping `main.rs` focused on
//! dispatch.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use spectext_core::DEFAULT_OUTPUT;

/// spectext - write text into the spectrogram of a WAV file
#[derive(Debug, Parser)]
#[command(name = "spectext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Text to render
    #[arg(value_name = "TEXT")]
    pub input: String,

    /// Output WAV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write the composite glyph image as a grayscale PNG
    #[arg(long, value_name = "PATH")]
    pub debug_image: Option<PathBuf>,

    /// Directory of per-character PNG glyphs (default: built-in 5x7 font)
    #[arg(long, value_name = "DIR")]
    pub glyph_dir: Option<PathBuf>,

    /// Upscale factor for the built-in font
    #[arg(long, default_value_t = spectext_core::glyph::bitmap::DEFAULT_SCALE,
          value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// JSON file with encoder settings; flags below override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Frequency of the bottom image row, in Hz
    #[arg(long)]
    pub min_freq: Option<f64>,

    /// Upper frequency bound, in Hz
    #[arg(long)]
    pub max_freq: Option<f64>,

    /// Output sample rate, in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Image columns per second of audio (must divide the sample rate)
    #[arg(long)]
    pub pixels_per_second: Option<u32>,

    /// Worker threads for encoding
    #[arg(long)]
    pub threads: Option<usize>,

    /// Invert the image before encoding
    #[arg(long)]
    pub invert: bool,

    /// Rotate the image 90 degrees counter-clockwise before encoding
    #[arg(long)]
    pub rotate: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
