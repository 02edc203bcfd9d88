//! Frames, devices and camera errors shared by every frame source.

use std::fmt;
use std::time::Instant;

use thiserror::Error;

/// A webcam reported by the platform backend.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Index passed to `--camera`
    pub index: u32,
    pub name: String,
    /// Backend-specific detail such as the bus or driver
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Requested or negotiated capture size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Low resolution (320x240), 80x60 cells at the default cell size
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::LOW
    }
}

/// A captured RGBA frame.
///
/// Pixels are stored row-major, four channels per pixel in the order
/// red, green, blue, alpha.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// When the frame was produced by its source
    pub timestamp: Instant,
}

impl Frame {
    /// Bytes per pixel (RGBA).
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap raw RGBA bytes in a frame stamped with the current time.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// A frame of the given size filled with a single RGBA value.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(pixels * 4).collect();
        Self::new(data, width, height)
    }

    /// Frame dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True if the frame has non-zero dimensions and exactly
    /// `width * height * 4` bytes of data.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL
    }

    /// Overwrite one pixel. Used to build synthetic frames.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.offset(x, y);
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }
}

/// What to ask the webcam for.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub device_index: u32,
    pub resolution: Resolution,
    /// Requested capture rate; the driver picks the closest it supports
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::default(),
            fps: 30,
        }
    }
}

/// Failures while enumerating, opening or reading a frame source.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("No cameras found")]
    NoDevices,
    #[error("Failed to query cameras: {0}")]
    QueryFailed(String),
    #[error("Failed to open camera: {0}")]
    OpenFailed(String),
    #[error(
        "Camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera"
    )]
    PermissionDenied,
    #[error("Camera device {0} not found. Run 'glyphcam list-cameras' to see available devices")]
    DeviceNotFound(u32),
    #[error("Failed to start camera stream: {0}")]
    StreamFailed(String),
    #[error("Camera stream ended unexpectedly")]
    StreamEnded,
    #[error("Capture thread is already running")]
    AlreadyRunning,
}
