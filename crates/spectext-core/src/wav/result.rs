//! Encoded WAV output.

use std::io;

use super::format::WavFormat;
use super::writer::write_wav_to_vec;
use crate::encode::PcmBuffer;

/// A PCM buffer wrapped in a WAV container.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload only.
    pub pcm_hash: String,
    /// Container format.
    pub format: WavFormat,
    /// Number of sample frames.
    pub num_frames: usize,
}

impl WavResult {
    /// Wraps a finished mono buffer.
    pub fn from_pcm(pcm: &PcmBuffer) -> io::Result<Self> {
        let format = WavFormat::mono(pcm.sample_rate);
        let payload = pcm.to_le_bytes();
        let pcm_hash = blake3::hash(&payload).to_hex().to_string();
        let wav_data = write_wav_to_vec(&format, &payload)?;

        Ok(Self {
            wav_data,
            pcm_hash,
            format,
            num_frames: pcm.len(),
        })
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.format.sample_rate as f64
    }
}
