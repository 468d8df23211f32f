//! Reading back WAV containers: payload extraction and hashing.

use super::format::WavFormat;

fn u16_at(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

fn u32_at(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// Walks the RIFF chunks and returns the body of the first `id` chunk.
fn find_chunk<'a>(wav_data: &'a [u8], id: &[u8; 4]) -> Option<&'a [u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_size = u32_at(wav_data, pos + 4) as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(chunk_size)?;

        if &wav_data[pos..pos + 4] == id {
            return wav_data.get(body_start..body_end);
        }

        // Chunks are word aligned.
        pos = body_end + (chunk_size & 1);
    }

    None
}

/// Extracts the PCM payload from a WAV file buffer.
///
/// Returns `None` if the buffer is not a RIFF/WAVE file or has no complete
/// data chunk.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    find_chunk(wav_data, b"data")
}

/// Parses the format chunk of a WAV file buffer.
pub fn read_format(wav_data: &[u8]) -> Option<WavFormat> {
    let fmt = find_chunk(wav_data, b"fmt ")?;
    if fmt.len() < 16 {
        return None;
    }
    Some(WavFormat {
        channels: u16_at(fmt, 2),
        sample_rate: u32_at(fmt, 4),
        bits_per_sample: u16_at(fmt, 14),
    })
}

/// BLAKE3 hash of a WAV file's PCM payload.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}
