//! Encoder configuration.
//!
//! Every field has a default matching the classic spectrology settings
//! (200 Hz - 20 kHz at 44.1 kHz, 30 image columns per second). A config can
//! be loaded from a partial JSON document; missing fields keep their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SpectextError, SpectextResult};

/// Default lowest frequency (bottom image row), in Hz.
pub const DEFAULT_MIN_FREQ: f64 = 200.0;
/// Default highest frequency bound, in Hz.
pub const DEFAULT_MAX_FREQ: f64 = 20000.0;
/// Default output sample rate, in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Default number of image columns rendered per second of audio.
pub const DEFAULT_PIXELS_PER_SECOND: u32 = 30;
/// Default tone amplitude for lit pixels.
pub const DEFAULT_FOREGROUND_AMPLITUDE: f64 = 1024.0;
/// Default tone amplitude for unlit pixels.
pub const DEFAULT_BACKGROUND_AMPLITUDE: f64 = 32.0;

/// Tunable parameters of the spectrogram encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Frequency of the bottom image row, in Hz.
    pub min_freq: f64,
    /// Upper frequency bound, in Hz. The top row sits one interval below it.
    pub max_freq: f64,
    /// Output sample rate, in Hz.
    pub sample_rate: u32,
    /// Image columns per second of audio.
    pub pixels_per_second: u32,
    /// Amplitude of the tone emitted for a lit pixel.
    pub foreground_amplitude: f64,
    /// Amplitude of the tone emitted for an unlit pixel.
    pub background_amplitude: f64,
    /// Maximum number of memoized tones; `None` keeps every tone for the run.
    pub tone_cache_capacity: Option<usize>,
    /// Worker threads used for the column loop.
    pub threads: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            min_freq: DEFAULT_MIN_FREQ,
            max_freq: DEFAULT_MAX_FREQ,
            sample_rate: DEFAULT_SAMPLE_RATE,
            pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
            foreground_amplitude: DEFAULT_FOREGROUND_AMPLITUDE,
            background_amplitude: DEFAULT_BACKGROUND_AMPLITUDE,
            tone_cache_capacity: None,
            threads: 1,
        }
    }
}

/// Sample-level timing derived from a validated [`EncoderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Output sample rate, in Hz.
    pub sample_rate: u32,
    /// Image columns per second of audio.
    pub pixels_per_second: u32,
    /// Samples emitted for each image column.
    pub samples_per_pixel: usize,
}

impl EncoderConfig {
    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json_str(json: &str) -> SpectextResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SpectextError::config(format!("malformed config JSON: {}", e)))
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: &Path) -> SpectextResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SpectextError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the configuration and derives the per-column sample count.
    pub fn validate(&self) -> SpectextResult<Timing> {
        if self.sample_rate == 0 {
            return Err(SpectextError::config("sample_rate must be positive"));
        }
        if self.pixels_per_second == 0 {
            return Err(SpectextError::config("pixels_per_second must be positive"));
        }
        if self.sample_rate % self.pixels_per_second != 0 {
            return Err(SpectextError::config(format!(
                "sample_rate {} is not evenly divisible by pixels_per_second {}",
                self.sample_rate, self.pixels_per_second
            )));
        }

        let samples_per_pixel = (self.sample_rate / self.pixels_per_second) as usize;
        // The window is indexed over samples_per_pixel - 1 intervals.
        if samples_per_pixel < 2 {
            return Err(SpectextError::config(format!(
                "samples_per_pixel must be at least 2, got {}",
                samples_per_pixel
            )));
        }

        if !self.min_freq.is_finite() || !self.max_freq.is_finite() {
            return Err(SpectextError::config("frequencies must be finite"));
        }
        if self.min_freq < 0.0 || self.min_freq >= self.max_freq {
            return Err(SpectextError::config(format!(
                "frequency range must satisfy 0 <= min_freq < max_freq, got {}..{}",
                self.min_freq, self.max_freq
            )));
        }

        check_amplitude("foreground_amplitude", self.foreground_amplitude)?;
        check_amplitude("background_amplitude", self.background_amplitude)?;

        if self.threads == 0 {
            return Err(SpectextError::config("threads must be at least 1"));
        }
        if self.tone_cache_capacity == Some(0) {
            return Err(SpectextError::config("tone_cache_capacity must be positive"));
        }

        let nyquist = self.sample_rate as f64 / 2.0;
        if self.max_freq > nyquist {
            tracing::warn!(
                max_freq = self.max_freq,
                nyquist,
                "max_freq exceeds Nyquist; upper rows will alias"
            );
        }

        Ok(Timing {
            sample_rate: self.sample_rate,
            pixels_per_second: self.pixels_per_second,
            samples_per_pixel,
        })
    }
}

fn check_amplitude(name: &str, value: f64) -> SpectextResult<()> {
    if !value.is_finite() || !(0.0..=i16::MAX as f64).contains(&value) {
        return Err(SpectextError::config(format!(
            "{} must be within 0..={}, got {}",
            name,
            i16::MAX,
            value
        )));
    }
    Ok(())
}

/// Options applied around the encoder by the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Invert the composite image (255 - v) before encoding.
    pub invert: bool,
    /// Rotate the composite image 90 degrees counter-clockwise before encoding.
    pub rotate: bool,
    /// Where to write the grayscale debug image, if anywhere.
    pub debug_image: Option<PathBuf>,
}
