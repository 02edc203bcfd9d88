//! Background capture thread implementation.

use nokhwa::pixel_format::{RgbAFormat, RgbFormat};
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::capture::LatestFrame;
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Stream format negotiated with the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub resolution: Resolution,
    pub fps: u32,
}

/// Body of the capture thread.
///
/// Sends exactly one message on `ready`: the negotiated format, or the reason
/// the stream could not be opened. Afterwards keeps `latest` filled with the
/// newest decoded frame until `stop` is set.
pub fn run_capture_loop(
    settings: CameraSettings,
    latest: LatestFrame,
    stop: Arc<AtomicBool>,
    ready: Sender<Result<StreamInfo, CameraError>>,
) {
    let index = CameraIndex::Index(settings.device_index);

    let mut camera = match open_camera_with_fallback(&index, &settings) {
        Ok(cam) => cam,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(CameraError::StreamFailed(e.to_string())));
        return;
    }

    let res = camera.resolution();
    let info = StreamInfo {
        resolution: Resolution {
            width: res.width(),
            height: res.height(),
        },
        fps: camera.frame_rate(),
    };
    log::info!(
        "Camera {} streaming at {}x{} @ {} fps",
        settings.device_index,
        info.resolution.width,
        info.resolution.height,
        info.fps
    );
    let _ = ready.send(Ok(info));

    while !stop.load(Ordering::Relaxed) {
        match camera.frame() {
            Ok(raw) => match decode_rgba(&raw) {
                Some(frame) => {
                    if let Ok(mut slot) = latest.lock() {
                        *slot = Some(frame);
                    }
                }
                // Undecodable frames are dropped; the next one usually decodes
                None => log::trace!("Dropped undecodable camera frame"),
            },
            Err(e) => log::trace!("Camera frame read failed: {}", e),
        }

        thread::sleep(Duration::from_millis(1));
    }

    let _ = camera.stop_stream();
    log::info!("Camera {} stream stopped", settings.device_index);
}

/// Decode a nokhwa buffer (MJPEG, YUYV, NV12, ...) into an RGBA frame.
fn decode_rgba(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbAFormat>().ok()?;
    let resolution = buffer.resolution();
    Some(Frame::new(
        decoded.into_raw(),
        resolution.width(),
        resolution.height(),
    ))
}

/// Open the camera, trying NV12, then MJPEG, then whatever the camera
/// offers at its highest resolution.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let closest = |format| {
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            format,
            settings.fps,
        )))
    };
    let attempts = [
        closest(NokhwaFrameFormat::NV12),
        closest(NokhwaFrameFormat::MJPEG),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;
    for requested in attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("Camera format attempt failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    let message = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no usable camera format".to_string());
    Err(classify_open_error(&message))
}

/// Map a backend error message to the most descriptive camera error.
pub(crate) fn classify_open_error(message: &str) -> CameraError {
    let msg = message.to_lowercase();
    if ["permission", "denied", "authorization", "access"]
        .iter()
        .any(|needle| msg.contains(needle))
    {
        CameraError::PermissionDenied
    } else {
        CameraError::OpenFailed(message.to_string())
    }
}
