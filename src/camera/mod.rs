//! Capture sources for live video frames.
//!
//! - Device enumeration via [`list_devices`]
//! - Webcam capture via [`CameraCapture`]
//! - A synthetic animated source via [`PatternSource`]
//!
//! All sources implement [`FrameSource`] and produce RGBA [`Frame`]s.

mod capture;
mod capture_loop;
mod device;
mod source;
mod types;

pub use capture::CameraCapture;
pub use device::list_devices;
pub use source::{FrameSource, PatternSource};
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, Resolution};
