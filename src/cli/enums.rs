//! CLI enum types and their conversions to library types.

use clap::ValueEnum;

use crate::glyph::{BLOCKS_PALETTE, DEFAULT_PALETTE, MINIMAL_PALETTE};

/// Built-in glyph palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PalettePreset {
    /// 11-level ASCII ramp
    #[default]
    Classic,
    /// Unicode block characters
    Blocks,
    /// 4-level ramp for a clean look
    Minimal,
}

impl PalettePreset {
    pub fn glyphs(self) -> &'static str {
        match self {
            PalettePreset::Classic => DEFAULT_PALETTE,
            PalettePreset::Blocks => BLOCKS_PALETTE,
            PalettePreset::Minimal => MINIMAL_PALETTE,
        }
    }
}
