//! Frame-to-frame motion detection on the green channel.

use super::sampler::green_at;
use crate::camera::Frame;

/// Default green-channel change that counts as motion (strictly greater).
pub const DEFAULT_MOTION_THRESHOLD: u8 = 8;

/// Holds the previous frame and compares the current one against it.
///
/// The history is valid only while its dimensions match the incoming frame.
/// On a mismatch (or after [`MotionDetector::invalidate`]) it is discarded and
/// every cell reads as static until the next [`MotionDetector::commit`].
#[derive(Debug, Clone)]
pub struct MotionDetector {
    threshold: u8,
    history: Vec<u8>,
    dims: Option<(u32, u32)>,
}

impl MotionDetector {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            history: Vec::new(),
            dims: None,
        }
    }

    /// True if there is a previous frame matching `frame`'s layout.
    pub fn has_history_for(&self, frame: &Frame) -> bool {
        self.dims == Some(frame.dimensions()) && self.history.len() == frame.data.len()
    }

    /// Drop the history if it no longer matches `frame`.
    ///
    /// Returns true if a reset happened.
    pub fn sync(&mut self, frame: &Frame) -> bool {
        if self.dims.is_some() && !self.has_history_for(frame) {
            log::debug!(
                "Motion history {:?} does not match frame {:?}, resetting",
                self.dims,
                frame.dimensions()
            );
            self.invalidate();
            return true;
        }
        false
    }

    /// Discard the history; the next frame is treated as having no motion.
    pub fn invalidate(&mut self) {
        self.history.clear();
        self.dims = None;
    }

    /// Whether the pixel at `(x, y)` changed by more than the threshold in
    /// its green channel since the previous frame.
    #[inline]
    pub fn is_moving(&self, frame: &Frame, x: u32, y: u32) -> bool {
        if !self.has_history_for(frame) {
            return false;
        }
        let now = green_at(&frame.data, frame.width, x, y) as i16;
        let before = green_at(&self.history, frame.width, x, y) as i16;
        (now - before).unsigned_abs() > self.threshold as u16
    }

    /// Replace the history with a full copy of `frame`.
    pub fn commit(&mut self, frame: &Frame) {
        self.history.clear();
        self.history.extend_from_slice(&frame.data);
        self.dims = Some(frame.dimensions());
    }
}

impl Default for MotionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MOTION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(width: u32, height: u32) -> Frame {
        Frame::solid(width, height, [100, 100, 100, 255])
    }

    #[test]
    fn test_no_history_means_static() {
        let detector = MotionDetector::default();
        let mut frame = grey(4, 4);
        frame.set_pixel(0, 0, [0, 255, 0, 255]);
        assert!(!detector.is_moving(&frame, 0, 0));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut detector = MotionDetector::default();
        detector.commit(&grey(4, 4));

        let mut frame = grey(4, 4);
        frame.set_pixel(1, 1, [100, 108, 100, 255]);
        assert!(!detector.is_moving(&frame, 1, 1));

        frame.set_pixel(1, 1, [100, 109, 100, 255]);
        assert!(detector.is_moving(&frame, 1, 1));
        assert!(!detector.is_moving(&frame, 0, 0));
    }

    #[test]
    fn test_decrease_counts_as_motion() {
        let mut detector = MotionDetector::default();
        detector.commit(&grey(2, 2));
        let mut frame = grey(2, 2);
        frame.set_pixel(0, 0, [100, 91, 100, 255]);
        assert!(detector.is_moving(&frame, 0, 0));
    }

    #[test]
    fn test_only_green_channel_matters() {
        let mut detector = MotionDetector::default();
        detector.commit(&grey(2, 2));
        let mut frame = grey(2, 2);
        frame.set_pixel(0, 0, [255, 100, 0, 0]);
        assert!(!detector.is_moving(&frame, 0, 0));
    }

    #[test]
    fn test_sync_resets_on_dimension_change() {
        let mut detector = MotionDetector::default();
        detector.commit(&grey(4, 4));
        let bigger = grey(8, 4);
        assert!(detector.sync(&bigger));
        assert!(!detector.has_history_for(&bigger));
        assert!(!detector.sync(&bigger));
    }

    #[test]
    fn test_sync_keeps_matching_history() {
        let mut detector = MotionDetector::default();
        let frame = grey(4, 4);
        detector.commit(&frame);
        assert!(!detector.sync(&frame));
        assert!(detector.has_history_for(&frame));
    }

    #[test]
    fn test_invalidate() {
        let mut detector = MotionDetector::default();
        let frame = grey(4, 4);
        detector.commit(&frame);
        detector.invalidate();
        assert!(!detector.has_history_for(&frame));
    }
}
