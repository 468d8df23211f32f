//! Character to bitmap lookup.
//!
//! A [`GlyphAtlas`] turns one character into a grayscale [`Glyph`]. Two atlases
//! are provided:
//!
//! - [`BuiltinAtlas`] - an embedded 5x7 bitmap font, upscaled on demand
//! - [`DirectoryAtlas`] - one PNG per character, named by [`charset::asset_stem`]
//!
//! Both honour the same supported-character policy from [`charset`].

pub mod bitmap;
pub mod charset;
pub mod dir;

pub use bitmap::BuiltinAtlas;
pub use dir::DirectoryAtlas;

use crate::error::{SpectextError, SpectextResult};

/// Source label used in errors about glyphs that came from an atlas.
const ATLAS_SOURCE: &str = "<atlas>";

/// A grayscale character bitmap. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Character this glyph renders.
    pub character: char,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major luma values, `width * height` long.
    pub pixels: Vec<u8>,
}

impl Glyph {
    /// Returns the luma value at (x, y).
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Checks that the glyph has pixels and that `pixels` holds exactly
    /// `width * height` values.
    pub fn validate(&self) -> SpectextResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SpectextError::asset_load(
                self.character,
                ATLAS_SOURCE,
                format!("glyph has no pixels ({}x{})", self.width, self.height),
            ));
        }
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(SpectextError::asset_load(
                self.character,
                ATLAS_SOURCE,
                format!(
                    "glyph is {}x{} but holds {} pixel values, expected {}",
                    self.width,
                    self.height,
                    self.pixels.len(),
                    expected
                ),
            ));
        }
        Ok(())
    }
}

/// Resolves characters to glyph bitmaps.
pub trait GlyphAtlas {
    /// Loads the glyph for `c`.
    ///
    /// Fails with [`SpectextError::UnsupportedCharacter`] for characters
    /// outside the charset and [`SpectextError::AssetLoad`] when the bitmap
    /// cannot be produced.
    fn resolve(&self, c: char) -> SpectextResult<Glyph>;
}

impl<A: GlyphAtlas + ?Sized> GlyphAtlas for &A {
    fn resolve(&self, c: char) -> SpectextResult<Glyph> {
        (**self).resolve(c)
    }
}

impl<A: GlyphAtlas + ?Sized> GlyphAtlas for Box<A> {
    fn resolve(&self, c: char) -> SpectextResult<Glyph> {
        (**self).resolve(c)
    }
}

/// Resolves every character of `text`, stopping at the first failure.
///
/// Unsupported characters are reported with their position in `text`.
pub fn resolve_text<A: GlyphAtlas + ?Sized>(atlas: &A, text: &str) -> SpectextResult<Vec<Glyph>> {
    if text.is_empty() {
        return Err(SpectextError::EmptyInput);
    }

    text.chars()
        .enumerate()
        .map(|(position, character)| {
            if !charset::is_supported(character) {
                return Err(SpectextError::UnsupportedCharacter {
                    character,
                    position,
                });
            }
            let glyph = atlas.resolve(character).map_err(|e| match e {
                SpectextError::UnsupportedCharacter { character, .. } => {
                    SpectextError::UnsupportedCharacter {
                        character,
                        position,
                    }
                }
                other => other,
            })?;
            glyph.validate()?;
            Ok(glyph)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_text_order() {
        let atlas = BuiltinAtlas::default();
        let glyphs = resolve_text(&atlas, "Hi!").unwrap();
        let chars: Vec<char> = glyphs.iter().map(|g| g.character).collect();
        assert_eq!(chars, vec!['H', 'i', '!']);
    }

    #[test]
    fn test_resolve_text_reports_position() {
        let atlas = BuiltinAtlas::default();
        let err = resolve_text(&atlas, "ab@cd").unwrap_err();
        match err {
            SpectextError::UnsupportedCharacter {
                character,
                position,
            } => {
                assert_eq!(character, '@');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_text_empty() {
        let atlas = BuiltinAtlas::default();
        assert!(matches!(
            resolve_text(&atlas, ""),
            Err(SpectextError::EmptyInput)
        ));
    }

    struct ShortAtlas;

    impl GlyphAtlas for ShortAtlas {
        fn resolve(&self, c: char) -> SpectextResult<Glyph> {
            Ok(Glyph {
                character: c,
                width: 4,
                height: 4,
                pixels: vec![0; 3],
            })
        }
    }

    #[test]
    fn test_glyph_validate() {
        let good = BuiltinAtlas::default().resolve('g').unwrap();
        assert!(good.validate().is_ok());

        let short = ShortAtlas.resolve('s').unwrap();
        assert!(matches!(
            short.validate(),
            Err(SpectextError::AssetLoad { character: 's', .. })
        ));

        let empty = Glyph {
            character: 'e',
            width: 0,
            height: 3,
            pixels: vec![],
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_resolve_text_rejects_malformed_glyph() {
        let err = resolve_text(&ShortAtlas, "ab").unwrap_err();
        assert!(matches!(err, SpectextError::AssetLoad { character: 'a', .. }));
    }

    #[test]
    fn test_boxed_atlas() {
        let atlas: Box<dyn GlyphAtlas> = Box::new(BuiltinAtlas::default());
        assert_eq!(atlas.resolve('x').unwrap().character, 'x');
    }
}
