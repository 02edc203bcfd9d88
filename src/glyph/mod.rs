//! Glyph transcoding core.
//!
//! Turns one RGBA frame into a grid of coloured glyphs:
//!
//! 1. **Sampling** - read the top-left pixel of every cell
//! 2. **Glyph mapping** - brightness to a glyph from a density palette
//! 3. **Zone colouring** - cell position to a banded colour scheme
//! 4. **Motion detection** - green-channel change since the previous frame

mod color;
mod motion;
mod palette;
mod sampler;
mod zone;

pub use color::{Hsl, Rgb};
pub use motion::{MotionDetector, DEFAULT_MOTION_THRESHOLD};
pub use palette::{
    is_visible, Palette, PaletteTooShort, BLOCKS_PALETTE, DEFAULT_BRIGHTNESS_FLOOR,
    DEFAULT_PALETTE, MINIMAL_PALETTE,
};
pub use sampler::{cell_origins, green_at, grid_size, sample, Sample};
pub use zone::{Region, Tint, Zone, ZoneScheme};
