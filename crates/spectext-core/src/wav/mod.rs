//! Deterministic WAV container writer.
//!
//! Writes canonical 44-byte-header PCM WAV files with no timestamps or other
//! variable metadata, so identical samples always produce identical files.
//! The BLAKE3 hash of the PCM payload identifies a render.

mod format;
mod pcm;
mod result;
mod writer;

pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data, read_format};
pub use result::WavResult;
pub use writer::{samples_to_pcm16, write_wav, write_wav_to_vec};
