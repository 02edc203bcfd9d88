//! Position-dependent colour scheme.
//!
//! The frame is split into three horizontal bands. The middle band carries a
//! disc centred on the frame whose radius is a sixth of the frame height.
//! Every colour takes its lightness from the sample brightness, clamped so
//! glyphs never go fully black or fully white.

use super::color::Hsl;

/// Horizontal band a row falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Top,
    Middle,
    Bottom,
}

impl Zone {
    /// Band for row `y` of a frame `height` pixels tall.
    pub fn classify(y: u32, height: u32) -> Zone {
        let y = y as f32;
        let h = height as f32;
        if y < h / 3.0 {
            Zone::Top
        } else if y < 2.0 * h / 3.0 {
            Zone::Middle
        } else {
            Zone::Bottom
        }
    }
}

/// Colour region a cell falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Top,
    /// Inside the centred disc of the middle band
    Emblem,
    /// Middle band, outside the disc
    Neutral,
    Bottom,
}

impl Region {
    pub fn classify(x: u32, y: u32, width: u32, height: u32) -> Region {
        match Zone::classify(y, height) {
            Zone::Top => Region::Top,
            Zone::Bottom => Region::Bottom,
            Zone::Middle => {
                let dx = x as f32 - width as f32 / 2.0;
                let dy = y as f32 - height as f32 / 2.0;
                if (dx * dx + dy * dy).sqrt() < height as f32 / 6.0 {
                    Region::Emblem
                } else {
                    Region::Neutral
                }
            }
        }
    }
}

/// Hue (degrees) and saturation (percent) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub hue: f32,
    pub saturation: f32,
}

impl Tint {
    pub const fn new(hue: f32, saturation: f32) -> Self {
        Self { hue, saturation }
    }
}

/// Tints and lightness bounds for each region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneScheme {
    pub top: Tint,
    pub emblem: Tint,
    pub neutral: Tint,
    pub bottom: Tint,
    pub min_lightness: f32,
    pub max_lightness: f32,
}

impl ZoneScheme {
    /// Saffron over a white band with a navy disc, over green.
    pub const DEFAULT: ZoneScheme = ZoneScheme {
        top: Tint::new(30.0, 100.0),
        emblem: Tint::new(240.0, 100.0),
        neutral: Tint::new(0.0, 0.0),
        bottom: Tint::new(120.0, 80.0),
        min_lightness: 30.0,
        max_lightness: 80.0,
    };

    pub fn tint(&self, region: Region) -> Tint {
        match region {
            Region::Top => self.top,
            Region::Emblem => self.emblem,
            Region::Neutral => self.neutral,
            Region::Bottom => self.bottom,
        }
    }

    /// `clamp((brightness / 255) * 100, min_lightness, max_lightness)`.
    pub fn lightness(&self, brightness: f32) -> f32 {
        ((brightness / 255.0) * 100.0).clamp(self.min_lightness, self.max_lightness)
    }

    /// Display colour for a cell at `(x, y)` of a `width x height` frame.
    pub fn color_for(&self, x: u32, y: u32, width: u32, height: u32, brightness: f32) -> Hsl {
        let tint = self.tint(Region::classify(x, y, width, height));
        Hsl::new(tint.hue, tint.saturation, self.lightness(brightness))
    }
}

impl Default for ZoneScheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}
