//! Per-tick orchestration of the glyph pipeline.
//!
//! A [`Transcoder`] owns the only state that survives between ticks, the
//! motion history. Each call to [`Transcoder::tick`] turns one frame into a
//! [`DrawBatch`] and then records that frame as the new history. The
//! transcoder never loops on its own; the host decides when to tick.

use std::io;

use thiserror::Error;

use crate::camera::{CameraError, Frame, FrameSource};
use crate::config::ConfigError;
use crate::glyph::{
    cell_origins, is_visible, sample, Hsl, MotionDetector, Palette, Rgb, ZoneScheme,
    DEFAULT_BRIGHTNESS_FLOOR, DEFAULT_MOTION_THRESHOLD,
};

/// Default opacity of a cell that changed since the previous frame.
pub const DEFAULT_MOVING_OPACITY: f32 = 1.0;
/// Default opacity of a cell that did not change.
pub const DEFAULT_STATIC_OPACITY: f32 = 0.3;
/// Default cell edge length in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 4;

/// Startup parameters of the transcoder.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscoderSettings {
    /// Cell edge length in pixels
    pub cell_size: u32,
    pub palette: Palette,
    pub motion_threshold: u8,
    /// Samples at or below this average brightness are not drawn
    pub brightness_floor: f32,
    pub scheme: ZoneScheme,
    pub moving_opacity: f32,
    pub static_opacity: f32,
    /// Colour the presenter clears to before each batch
    pub background: Rgb,
}

impl Default for TranscoderSettings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            palette: Palette::default(),
            motion_threshold: DEFAULT_MOTION_THRESHOLD,
            brightness_floor: DEFAULT_BRIGHTNESS_FLOOR,
            scheme: ZoneScheme::default(),
            moving_opacity: DEFAULT_MOVING_OPACITY,
            static_opacity: DEFAULT_STATIC_OPACITY,
            background: Rgb::BLACK,
        }
    }
}

impl TranscoderSettings {
    /// Reject values that would make every tick misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::invalid("glyph.cell_size", "must be at least 1"));
        }
        if self.palette.len() < 2 {
            return Err(ConfigError::invalid(
                "glyph.palette",
                "needs at least 2 glyphs",
            ));
        }
        if !(0.0..=255.0).contains(&self.brightness_floor) {
            return Err(ConfigError::invalid(
                "glyph.brightness_floor",
                "must be between 0 and 255",
            ));
        }
        for (key, value) in [
            ("glyph.moving_opacity", self.moving_opacity),
            ("glyph.static_opacity", self.static_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(key, "must be between 0.0 and 1.0"));
            }
        }

        let s = &self.scheme;
        for (key, value) in [
            ("zones.min_lightness", s.min_lightness),
            ("zones.max_lightness", s.max_lightness),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::invalid(key, "must be between 0 and 100"));
            }
        }
        if s.min_lightness > s.max_lightness {
            return Err(ConfigError::invalid(
                "zones.min_lightness",
                "must not exceed zones.max_lightness",
            ));
        }
        for (name, tint) in [
            ("top", s.top),
            ("emblem", s.emblem),
            ("neutral", s.neutral),
            ("bottom", s.bottom),
        ] {
            if !(0.0..360.0).contains(&tint.hue) {
                return Err(ConfigError::invalid(
                    format!("zones.{}_hue", name),
                    "must be in [0, 360)",
                ));
            }
            if !(0.0..=100.0).contains(&tint.saturation) {
                return Err(ConfigError::invalid(
                    format!("zones.{}_saturation", name),
                    "must be between 0 and 100",
                ));
            }
        }
        Ok(())
    }
}

/// One cell's resolved output for a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstruction {
    /// Cell origin in frame pixels
    pub x: u32,
    pub y: u32,
    pub glyph: char,
    pub color: Hsl,
    pub opacity: f32,
}

/// Everything drawn for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Dimensions of the frame the batch was produced from
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub background: Rgb,
    pub instructions: Vec<DrawInstruction>,
}

impl DrawBatch {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Instruction for the cell whose origin is `(x, y)`, if one was emitted.
    pub fn at(&self, x: u32, y: u32) -> Option<&DrawInstruction> {
        self.instructions.iter().find(|i| i.x == x && i.y == y)
    }
}

/// Display surface that draw batches are sent to.
pub trait Presenter {
    /// Clear the surface to `batch.background`, then draw every instruction.
    fn present(&mut self, batch: &DrawBatch) -> io::Result<()>;
}

/// Lifecycle of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, no tick yet
    Idle,
    /// At least one tick has run; never left
    Running,
}

/// Result of a successful [`Transcoder::run_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The source had no frame yet; nothing was drawn
    NoFrame,
    /// A batch with this many cells was presented
    Presented { cells: usize },
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Capture(#[from] CameraError),
    #[error("Failed to draw frame: {0}")]
    Present(#[source] io::Error),
}

/// Frame-to-glyph transcoder.
#[derive(Debug)]
pub struct Transcoder {
    settings: TranscoderSettings,
    detector: MotionDetector,
    state: LoopState,
    ticks: u64,
}

impl Transcoder {
    pub fn new(settings: TranscoderSettings) -> Self {
        let detector = MotionDetector::new(settings.motion_threshold);
        Self {
            settings,
            detector,
            state: LoopState::Idle,
            ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forget the previous frame. The next tick reports no motion.
    pub fn handle_resize(&mut self) {
        log::info!("Display resized, motion history invalidated");
        self.detector.invalidate();
    }

    /// Transcode one frame.
    ///
    /// A malformed or empty frame yields an empty batch and leaves the motion
    /// history as it was.
    pub fn tick(&mut self, frame: &Frame) -> DrawBatch {
        self.state = LoopState::Running;
        self.ticks += 1;

        let s = &self.settings;
        let mut batch = DrawBatch {
            width: frame.width,
            height: frame.height,
            cell_size: s.cell_size,
            background: s.background,
            instructions: Vec::new(),
        };

        if !frame.is_well_formed() {
            log::warn!(
                "Skipping malformed frame {}x{} with {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            );
            return batch;
        }

        self.detector.sync(frame);

        for (x, y) in cell_origins(frame.width, frame.height, s.cell_size) {
            let sample = sample(frame, x, y);
            if !is_visible(sample.avg, s.brightness_floor) {
                continue;
            }
            let moving = self.detector.is_moving(frame, x, y);
            batch.instructions.push(DrawInstruction {
                x,
                y,
                glyph: s.palette.glyph_for(sample.avg),
                color: s
                    .scheme
                    .color_for(x, y, frame.width, frame.height, sample.avg),
                opacity: if moving {
                    s.moving_opacity
                } else {
                    s.static_opacity
                },
            });
        }

        self.detector.commit(frame);
        log::debug!(
            "Tick {}: {} cells from {}x{} frame",
            self.ticks,
            batch.len(),
            frame.width,
            frame.height
        );
        batch
    }

    /// Capture, transcode and present one frame.
    pub fn run_tick(
        &mut self,
        source: &mut dyn FrameSource,
        presenter: &mut dyn Presenter,
    ) -> Result<TickOutcome, TickError> {
        let Some(frame) = source.latest_frame()? else {
            return Ok(TickOutcome::NoFrame);
        };
        let batch = self.tick(&frame);
        presenter.present(&batch).map_err(TickError::Present)?;
        Ok(TickOutcome::Presented { cells: batch.len() })
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(TranscoderSettings::default())
    }
}
