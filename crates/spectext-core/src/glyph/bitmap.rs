//! Embedded bitmap font.
//!
//! Each glyph is a 5x7 pattern stored as seven row masks (bit 4 is the
//! leftmost column). Rendered glyphs get one blank column on the right for
//! letter spacing and are upscaled by an integer factor with nearest-neighbour
//! sampling, so a glyph is `6 * scale` wide and `7 * scale` tall.

use super::{charset, Glyph, GlyphAtlas};
use crate::error::{SpectextError, SpectextResult};

/// Pattern columns per glyph.
pub const PATTERN_WIDTH: u32 = 5;
/// Pattern rows per glyph.
pub const PATTERN_HEIGHT: u32 = 7;
/// Blank columns appended after each pattern.
pub const SPACING: u32 = 1;
/// Default upscale factor.
pub const DEFAULT_SCALE: u32 = 3;

/// Luma value of a lit pixel.
const LIT: u8 = 255;

/// Atlas backed by the embedded 5x7 font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinAtlas {
    scale: u32,
}

impl Default for BuiltinAtlas {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl BuiltinAtlas {
    /// Creates an atlas rendering glyphs at `scale` pixels per pattern cell.
    pub fn new(scale: u32) -> SpectextResult<Self> {
        if scale == 0 {
            return Err(SpectextError::config("glyph scale must be at least 1"));
        }
        Ok(Self { scale })
    }

    /// Upscale factor.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Rendered glyph width.
    pub fn glyph_width(&self) -> u32 {
        (PATTERN_WIDTH + SPACING) * self.scale
    }

    /// Rendered glyph height.
    pub fn glyph_height(&self) -> u32 {
        PATTERN_HEIGHT * self.scale
    }

    fn render(&self, character: char, rows: &[u8; 7]) -> Glyph {
        let width = self.glyph_width();
        let height = self.glyph_height();
        let mut pixels = vec![0u8; (width * height) as usize];

        for y in 0..height {
            let mask = rows[(y / self.scale) as usize];
            for x in 0..PATTERN_WIDTH * self.scale {
                let column = x / self.scale;
                if mask & (1 << (PATTERN_WIDTH - 1 - column)) != 0 {
                    pixels[(y * width + x) as usize] = LIT;
                }
            }
        }

        Glyph {
            character,
            width,
            height,
            pixels,
        }
    }
}

impl GlyphAtlas for BuiltinAtlas {
    fn resolve(&self, c: char) -> SpectextResult<Glyph> {
        if !charset::is_supported(c) {
            return Err(SpectextError::UnsupportedCharacter {
                character: c,
                position: 0,
            });
        }
        let rows = pattern(c).ok_or_else(|| {
            SpectextError::asset_load(c, "<builtin>", "no embedded pattern")
        })?;
        Ok(self.render(c, rows))
    }
}

/// Looks up the embedded pattern for `c`.
pub fn pattern(c: char) -> Option<&'static [u8; 7]> {
    FONT_5X7
        .binary_search_by_key(&c, |&(ch, _)| ch)
        .ok()
        .map(|index| &FONT_5X7[index].1)
}

// Sorted by code point for binary search.
const FONT_5X7: &[(char, [u8; 7])] = &[
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100, 0b00000]),
    ('"', [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('#', [0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b00000, 0b00000]),
    ('$', [0b00100, 0b01110, 0b10100, 0b01110, 0b00101, 0b01110, 0b00100]),
    ('%', [0b11001, 0b11010, 0b00100, 0b01011, 0b10011, 0b00000, 0b00000]),
    ('&', [0b01100, 0b10010, 0b01100, 0b10010, 0b10011, 0b01101, 0b00000]),
    ('\'', [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('(', [0b00100, 0b01000, 0b01000, 0b01000, 0b01000, 0b00100, 0b00000]),
    (')', [0b00100, 0b00010, 0b00010, 0b00010, 0b00010, 0b00100, 0b00000]),
    ('*', [0b00000, 0b10101, 0b01110, 0b10101, 0b00000, 0b00000, 0b00000]),
    ('+', [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000]),
    (',', [0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000]),
    ('/', [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000, 0b00000]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    (':', [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000]),
    (';', [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000]),
    ('<', [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010]),
    ('=', [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000]),
    ('>', [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000]),
    ('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10001, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    ('[', [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110]),
    ('\\', [0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00000, 0b00000]),
    (']', [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110]),
    ('^', [0b00100, 0b01010, 0b10001, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('_', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111]),
    ('a', [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111]),
    ('b', [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110]),
    ('c', [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('d', [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111]),
    ('e', [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110]),
    ('f', [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000]),
    ('g', [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
    ('h', [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
    ('i', [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('j', [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('k', [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010]),
    ('l', [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('m', [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001]),
    ('n', [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
    ('o', [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('p', [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000]),
    ('q', [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001]),
    ('r', [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000]),
    ('s', [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110]),
    ('t', [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110]),
    ('u', [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101]),
    ('v', [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('w', [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010]),
    ('x', [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
    ('y', [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
    ('z', [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('{', [0b00010, 0b00100, 0b00100, 0b01000, 0b00100, 0b00100, 0b00010]),
    ('}', [0b01000, 0b00100, 0b00100, 0b00010, 0b00100, 0b00100, 0b01000]),
    ('~', [0b00000, 0b00000, 0b01000, 0b10101, 0b00010, 0b00000, 0b00000]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_sorted() {
        assert!(FONT_5X7.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_every_supported_char_has_pattern() {
        for c in charset::supported_chars() {
            assert!(pattern(c).is_some(), "missing pattern for {:?}", c);
        }
    }

    #[test]
    fn test_patterns_fit_five_columns() {
        for (c, rows) in FONT_5X7 {
            assert!(rows.iter().all(|&r| r < 32), "{:?} is wider than 5", c);
        }
    }

    #[test]
    fn test_scale_one_dimensions() {
        let atlas = BuiltinAtlas::new(1).unwrap();
        let glyph = atlas.resolve('A').unwrap();
        assert_eq!(glyph.width, 6);
        assert_eq!(glyph.height, 7);
        // Top row of 'A' is .###.
        assert_eq!(glyph.get(0, 0), 0);
        assert_eq!(glyph.get(1, 0), 255);
        assert_eq!(glyph.get(3, 0), 255);
        assert_eq!(glyph.get(4, 0), 0);
        // Spacing column is always blank.
        assert!((0..7).all(|y| glyph.get(5, y) == 0));
    }

    #[test]
    fn test_upscaling() {
        let atlas = BuiltinAtlas::new(4).unwrap();
        let glyph = atlas.resolve('l').unwrap();
        assert_eq!(glyph.width, 24);
        assert_eq!(glyph.height, 28);
        // Each pattern cell becomes a 4x4 block.
        let lit = glyph.get(4, 0);
        assert_eq!(lit, 255);
        for dy in 0..4 {
            for dx in 4..8 {
                assert_eq!(glyph.get(dx, dy), lit);
            }
        }
    }

    #[test]
    fn test_space_is_blank() {
        let glyph = BuiltinAtlas::default().resolve(' ').unwrap();
        assert!(glyph.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(matches!(
            BuiltinAtlas::new(0),
            Err(SpectextError::Config { .. })
        ));
    }

    #[test]
    fn test_unsupported_char() {
        assert!(matches!(
            BuiltinAtlas::default().resolve('@'),
            Err(SpectextError::UnsupportedCharacter { character: '@', .. })
        ));
    }
}
