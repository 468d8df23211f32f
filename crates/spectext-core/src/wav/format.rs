//! WAV file format parameters.

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Mono 16-bit format, the only one spectext emits.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Bytes per sample (per channel).
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Bytes per second.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_format() {
        let format = WavFormat::mono(44100);
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
        assert_eq!(format.bytes_per_sample(), 2);
        assert_eq!(format.block_align(), 2);
        assert_eq!(format.byte_rate(), 88200);
    }
}
