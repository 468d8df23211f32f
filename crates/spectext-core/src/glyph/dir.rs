//! Glyph bitmaps loaded from a directory of PNG files.
//!
//! Each supported character is stored as `<root>/<stem>.PNG`, where the stem
//! comes from [`charset::asset_stem`]. Any PNG color type is accepted and
//! reduced to luma with ITU-R 601 weights; alpha is ignored.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use png::{ColorType, Transformations};

use super::{charset, Glyph, GlyphAtlas};
use crate::error::{SpectextError, SpectextResult};

/// File extension of glyph assets.
pub const ASSET_EXTENSION: &str = "PNG";

/// Atlas reading one PNG per character from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryAtlas {
    root: PathBuf,
}

impl DirectoryAtlas {
    /// Creates an atlas rooted at `root`. The directory is not touched until
    /// a glyph is resolved.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the assets are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the asset for `c`, if `c` is supported.
    pub fn asset_path(&self, c: char) -> Option<PathBuf> {
        charset::asset_stem(c)
            .map(|stem| self.root.join(format!("{}.{}", stem, ASSET_EXTENSION)))
    }
}

impl GlyphAtlas for DirectoryAtlas {
    fn resolve(&self, c: char) -> SpectextResult<Glyph> {
        let path = self
            .asset_path(c)
            .ok_or(SpectextError::UnsupportedCharacter {
                character: c,
                position: 0,
            })?;

        let file = File::open(&path)
            .map_err(|e| SpectextError::asset_load(c, &path, e.to_string()))?;
        let (width, height, pixels) = decode_luma(BufReader::new(file))
            .map_err(|message| SpectextError::asset_load(c, &path, message))?;

        if width == 0 || height == 0 {
            return Err(SpectextError::asset_load(c, &path, "image has no pixels"));
        }

        tracing::debug!(character = ?c, width, height, path = %path.display(), "loaded glyph");

        Ok(Glyph {
            character: c,
            width,
            height,
            pixels,
        })
    }
}

/// Decodes a PNG stream into 8-bit luma.
fn decode_luma<R: std::io::Read>(reader: R) -> Result<(u32, u32, Vec<u8>), String> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(|e| e.to_string())?;

    let mut buffer = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buffer).map_err(|e| e.to_string())?;
    let data = &buffer[..info.buffer_size()];

    let channels = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => return Err("indexed color was not expanded".to_string()),
    };

    let pixels = data
        .chunks_exact(channels)
        .map(|px| match channels {
            1 | 2 => px[0],
            _ => luma(px[0], px[1], px[2]),
        })
        .collect();

    Ok((info.width, info.height, pixels))
}

/// ITU-R 601-2 luma transform in 16.16 fixed point, rounded.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}
