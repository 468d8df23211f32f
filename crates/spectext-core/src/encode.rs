//! Image to PCM spectrogram encoding.
//!
//! Each image row is assigned a fixed frequency (top row highest) and each
//! column becomes `samples_per_pixel` samples. For every pixel a windowed
//! tone is summed into the column's slice of the output buffer: lit pixels
//! at the foreground amplitude, unlit pixels at the background amplitude.
//!
//! Columns write disjoint buffer ranges, so the column loop can be split
//! across worker threads without changing the result. Within a column, rows
//! are always summed top to bottom so saturation happens in a fixed order.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::compose::CompositeImage;
use crate::config::{EncoderConfig, Timing};
use crate::error::{SpectextError, SpectextResult};
use crate::tone::ToneCache;

/// Maps image rows to frequencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMap {
    min_freq: f64,
    interval: f64,
    height: u32,
}

impl FrequencyMap {
    /// Spreads `height` rows over `min_freq..max_freq`.
    pub fn new(min_freq: f64, max_freq: f64, height: u32) -> Self {
        Self {
            min_freq,
            interval: (max_freq - min_freq) / height as f64,
            height,
        }
    }

    /// Frequency spacing between adjacent rows.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Frequency of `row`, where row 0 is the top of the image.
    pub fn frequency(&self, row: u32) -> f64 {
        (self.height - 1 - row) as f64 * self.interval + self.min_freq
    }
}

/// Adds `src` into `dst` sample by sample, clamping at the i16 bounds.
pub fn accumulate(dst: &mut [i16], src: &[i16]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = d.saturating_add(s);
    }
}

/// Mono 16-bit PCM samples with their sample rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    /// Signed samples.
    pub samples: Vec<i16>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl PcmBuffer {
    /// Creates a zeroed buffer of `len` samples.
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0; len],
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Little-endian byte encoding.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        crate::wav::samples_to_pcm16(&self.samples)
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Column progress, reported after every encoded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Columns finished so far.
    pub columns_done: usize,
    /// Columns in the image.
    pub total_columns: usize,
}

impl Progress {
    /// Completion in whole percent, 0 to 100.
    pub fn percent(&self) -> u32 {
        if self.total_columns == 0 {
            return 100;
        }
        (self.columns_done * 100 / self.total_columns) as u32
    }
}

/// Converts composite images into PCM.
#[derive(Debug, Clone)]
pub struct SpectrogramEncoder {
    config: EncoderConfig,
    timing: Timing,
}

impl SpectrogramEncoder {
    /// Validates `config` and builds an encoder.
    pub fn new(config: EncoderConfig) -> SpectextResult<Self> {
        let timing = config.validate()?;
        Ok(Self { config, timing })
    }

    /// Configuration in use.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Derived timing.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Creates a tone cache sized by the configuration, for one run.
    pub fn new_cache(&self) -> ToneCache {
        match self.config.tone_cache_capacity {
            Some(capacity) => ToneCache::with_capacity(self.timing, capacity),
            None => ToneCache::new(self.timing),
        }
    }

    /// Output length for `image`, in samples.
    pub fn output_len(&self, image: &CompositeImage) -> usize {
        image.width as usize * self.timing.samples_per_pixel
    }

    /// Encodes `image` using `cache` for tone lookups.
    pub fn encode(&self, image: &CompositeImage, cache: &ToneCache) -> SpectextResult<PcmBuffer> {
        self.encode_with_progress(image, cache, |progress| {
            tracing::debug!(
                column = progress.columns_done,
                total = progress.total_columns,
                percent = progress.percent(),
                "encoded column"
            );
        })
    }

    /// Encodes `image`, calling `on_progress` after each column.
    ///
    /// With more than one worker thread, progress reports may arrive slightly
    /// out of order; the output is identical either way.
    pub fn encode_with_progress<F>(
        &self,
        image: &CompositeImage,
        cache: &ToneCache,
        on_progress: F,
    ) -> SpectextResult<PcmBuffer>
    where
        F: Fn(Progress) + Sync,
    {
        if cache.timing() != &self.timing {
            return Err(SpectextError::config(
                "tone cache was built for a different sample timing",
            ));
        }

        let spp = self.timing.samples_per_pixel;
        let total_columns = image.width as usize;
        let frequencies = FrequencyMap::new(self.config.min_freq, self.config.max_freq, image.height);
        let mut pcm = PcmBuffer::silent(self.output_len(image), self.timing.sample_rate);

        let workers = self.config.threads.clamp(1, total_columns.max(1));
        let columns_per_worker = total_columns.div_ceil(workers).max(1);
        let done = AtomicUsize::new(0);

        let encode_range = |first_column: usize, region: &mut [i16]| {
            for (offset, column) in region.chunks_exact_mut(spp).enumerate() {
                let x = (first_column + offset) as u32;
                self.encode_column(image, x, &frequencies, cache, column);
                let columns_done = done.fetch_add(1, Ordering::Relaxed) + 1;
                on_progress(Progress {
                    columns_done,
                    total_columns,
                });
            }
        };

        if workers == 1 {
            encode_range(0, &mut pcm.samples);
        } else {
            std::thread::scope(|scope| {
                for (index, region) in pcm.samples.chunks_mut(columns_per_worker * spp).enumerate() {
                    let encode_range = &encode_range;
                    scope.spawn(move || encode_range(index * columns_per_worker, region));
                }
            });
        }

        tracing::info!(
            columns = total_columns,
            samples = pcm.len(),
            cached_tones = cache.len(),
            cache_hits = cache.hits(),
            "encoding finished"
        );

        Ok(pcm)
    }

    fn encode_column(
        &self,
        image: &CompositeImage,
        x: u32,
        frequencies: &FrequencyMap,
        cache: &ToneCache,
        out: &mut [i16],
    ) {
        for (y, value) in image.column(x).enumerate() {
            let amplitude = if value > 0 {
                self.config.foreground_amplitude
            } else {
                self.config.background_amplitude
            };
            let tone = cache.tone(frequencies.frequency(y as u32), amplitude);
            accumulate(out, &tone);
        }
    }
}
