//! Frame sources the render loop pulls from.

use super::types::{CameraError, Frame, Resolution};

/// Anything that can hand out the most recent video frame on demand.
pub trait FrameSource {
    /// Return the most recent frame.
    ///
    /// `Ok(None)` means no frame has been produced yet; the caller should
    /// simply try again on its next tick. An `Err` is a capture failure and
    /// is not expected to recover without restarting the source.
    fn latest_frame(&mut self) -> Result<Option<Frame>, CameraError>;
}

/// Synthetic animated test pattern.
///
/// Renders a vertical brightness gradient with a bright square sweeping
/// left to right, advancing a few pixels per frame. Useful for running
/// without a camera and for deterministic tests of motion highlighting.
#[derive(Debug, Clone)]
pub struct PatternSource {
    resolution: Resolution,
    frame_index: u64,
    square: u32,
    speed: u32,
}

impl PatternSource {
    pub fn new(resolution: Resolution) -> Self {
        let square = (resolution.height / 4).max(1);
        Self {
            resolution,
            frame_index: 0,
            square,
            speed: 4,
        }
    }

    /// Change the output dimensions. The next frame uses the new size.
    pub fn resize(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.square = (resolution.height / 4).max(1);
    }

    /// Produce frame number `n` of the pattern.
    pub fn render(&self, n: u64) -> Frame {
        let Resolution { width, height } = self.resolution;
        let mut frame = Frame::solid(width, height, [0, 0, 0, 255]);
        if width == 0 || height == 0 {
            return frame;
        }

        for y in 0..height {
            let level = (y as u64 * 255 / height as u64) as u8;
            for x in 0..width {
                frame.set_pixel(x, y, [level, level, level, 255]);
            }
        }

        let travel = width.saturating_sub(self.square).max(1) as u64;
        let left = ((n * self.speed as u64) % travel) as u32;
        let top = height.saturating_sub(self.square) / 2;
        for y in top..(top + self.square).min(height) {
            for x in left..(left + self.square).min(width) {
                frame.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }

        frame
    }
}

impl FrameSource for PatternSource {
    fn latest_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        let frame = self.render(self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }
}
