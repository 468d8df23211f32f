//! Glyph compositing.
//!
//! Glyphs are laid left to right at cumulative x offsets, all at y = 0. The
//! composite is as tall as the shortest glyph: shorter glyphs are never
//! stretched and taller ones are clipped at the bottom.

use crate::error::{SpectextError, SpectextResult};
use crate::glyph::Glyph;
use crate::png::{write_grayscale_to_vec, PngConfig};

/// A grayscale image built from a row of glyphs. Read-only once composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pixels: Vec<u8>,
}

impl CompositeImage {
    /// Wraps a row-major luma buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> SpectextResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpectextError::config(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(SpectextError::config(format!(
                "pixel buffer holds {} values, expected {}",
                pixels.len(),
                width as usize * height as usize
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Luma value at (x, y), with y = 0 at the top.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Iterates one column from top to bottom.
    pub fn column(&self, x: u32) -> impl Iterator<Item = u8> + '_ {
        (0..self.height).map(move |y| self.get(x, y))
    }

    /// Row-major luma values.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the photographic negative (255 - v).
    pub fn invert(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&v| 255 - v).collect(),
        }
    }

    /// Returns the image rotated 90 degrees counter-clockwise.
    ///
    /// The rightmost column becomes the top row. The canvas grows to fit
    /// instead of keeping its size, so width and height swap and nothing is
    /// cropped.
    pub fn rotate_ccw(&self) -> Self {
        let (w, h) = (self.width, self.height);
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for ny in 0..w {
            for nx in 0..h {
                pixels.push(self.get(w - 1 - ny, nx));
            }
        }
        Self {
            width: h,
            height: w,
            pixels,
        }
    }

    /// Encodes the image as a grayscale PNG.
    pub fn to_png(&self, config: &PngConfig) -> SpectextResult<Vec<u8>> {
        write_grayscale_to_vec(&self.pixels, self.width, self.height, config)
    }
}

/// Lays glyphs out horizontally into one image.
///
/// Fails with [`SpectextError::AssetLoad`] if any glyph's pixel buffer does
/// not match its dimensions.
pub fn compose(glyphs: &[Glyph]) -> SpectextResult<CompositeImage> {
    for glyph in glyphs {
        glyph.validate()?;
    }

    let height = glyphs
        .iter()
        .map(|g| g.height)
        .min()
        .ok_or(SpectextError::EmptyInput)?;
    let width = glyphs
        .iter()
        .try_fold(0u32, |sum, g| sum.checked_add(g.width))
        .ok_or_else(|| SpectextError::config("composite image is too wide"))?;

    let mut pixels = vec![0u8; width as usize * height as usize];
    let mut offset = 0u32;
    for glyph in glyphs {
        for y in 0..height {
            let src = (y * glyph.width) as usize;
            let dst = (y * width + offset) as usize;
            pixels[dst..dst + glyph.width as usize]
                .copy_from_slice(&glyph.pixels[src..src + glyph.width as usize]);
        }
        offset += glyph.width;
    }

    tracing::debug!(glyphs = glyphs.len(), width, height, "composed image");

    Ok(CompositeImage {
        width,
        height,
        pixels,
    })
}
