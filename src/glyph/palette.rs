//! Brightness to glyph mapping.
//!
//! Palettes are written from the densest glyph to the sparsest. Lookup is
//! inverted: the brightest samples land at the start of the palette, so a
//! dense-first palette renders bright areas with heavy ink.

use thiserror::Error;

/// Default 11-glyph palette, densest first, ending in a space.
pub const DEFAULT_PALETTE: &str = "@%#*+=-:,. ";

/// Unicode block palette (5 levels), densest first.
pub const BLOCKS_PALETTE: &str = "█▓▒░ ";

/// Minimal palette (4 levels) for a clean look.
pub const MINIMAL_PALETTE: &str = "#:. ";

/// Samples with an average brightness at or below this are not drawn.
pub const DEFAULT_BRIGHTNESS_FLOOR: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("palette needs at least 2 glyphs, got {0}")]
pub struct PaletteTooShort(pub usize);

/// An ordered glyph sequence with at least two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    pub fn new(glyphs: &str) -> Result<Self, PaletteTooShort> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(PaletteTooShort(glyphs.len()));
        }
        Ok(Self { glyphs })
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; a palette holds at least two glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Palette index chosen for an average brightness in `[0, 255]`.
    ///
    /// `floor(avg / 255 * (len - 1))`, counted from the end of the palette.
    #[inline]
    pub fn index_for(&self, avg: f32) -> usize {
        let last = self.glyphs.len() - 1;
        let idx = ((avg / 255.0) * last as f32).floor();
        let idx = (idx.max(0.0) as usize).min(last);
        last - idx
    }

    /// Glyph for an average brightness in `[0, 255]`.
    #[inline]
    pub fn glyph_for(&self, avg: f32) -> char {
        self.glyphs[self.index_for(avg)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_PALETTE.chars().collect(),
        }
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.glyphs.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

/// True if a sample is bright enough to draw (strictly above the floor).
#[inline]
pub fn is_visible(avg: f32, floor: f32) -> bool {
    avg > floor
}
