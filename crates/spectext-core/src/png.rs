//! Deterministic grayscale PNG writer for the composite debug image.
//!
//! Uses fixed compression settings so the same image always encodes to the
//! same bytes.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

use crate::error::{SpectextError, SpectextResult};

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Fixed for determinism.
    pub compression: Compression,
    /// Row filter. Fixed for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smaller files, slower encoding.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }
}

/// Writes 8-bit grayscale pixels to any writer.
pub fn write_grayscale_to_writer<W: Write>(
    pixels: &[u8],
    width: u32,
    height: u32,
    writer: W,
    config: &PngConfig,
) -> SpectextResult<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(SpectextError::PngEncode(format!(
            "expected {} bytes for {}x{} grayscale, got {}",
            expected,
            width,
            height,
            pixels.len()
        )));
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(pixels)?;
    png_writer.finish()?;

    Ok(())
}

/// Encodes 8-bit grayscale pixels into a PNG byte vector.
pub fn write_grayscale_to_vec(
    pixels: &[u8],
    width: u32,
    height: u32,
    config: &PngConfig,
) -> SpectextResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_grayscale_to_writer(pixels, width, height, &mut buffer, config)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let data = write_grayscale_to_vec(&[0, 255, 255, 0], 2, 2, &PngConfig::default()).unwrap();
        assert_eq!(&data[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_png_deterministic() {
        let pixels: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
        let a = write_grayscale_to_vec(&pixels, 8, 8, &PngConfig::default()).unwrap();
        let b = write_grayscale_to_vec(&pixels, 8, 8, &PngConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_png_size_mismatch() {
        let err = write_grayscale_to_vec(&[0; 3], 2, 2, &PngConfig::default()).unwrap_err();
        assert!(matches!(err, SpectextError::PngEncode(_)));
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let data = write_grayscale_to_vec(&[7; 12], 4, 3, &PngConfig::best_compression()).unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(data));
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 4);
        assert_eq!(reader.info().height, 3);
    }
}
