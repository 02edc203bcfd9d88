//! Webcam capture handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::capture_loop::{run_capture_loop, StreamInfo};
use super::device::list_devices;
use super::source::FrameSource;
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Slot holding the most recent decoded frame, shared with the capture thread.
pub(crate) type LatestFrame = Arc<Mutex<Option<Frame>>>;

/// Handle to a webcam streaming on a background thread.
///
/// `open()` only checks that the device exists. `start()` spawns the thread,
/// which opens the stream and keeps overwriting a single shared slot with the
/// newest frame; readers always see the latest frame and never a queue.
pub struct CameraCapture {
    settings: CameraSettings,
    latest: LatestFrame,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    /// Negotiated stream format, known once started
    stream: Option<StreamInfo>,
}

impl std::fmt::Debug for CameraCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraCapture")
            .field("settings", &self.settings)
            .field("stream", &self.stream)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CameraCapture {
    /// Check that the requested device exists.
    ///
    /// The stream itself is opened inside the capture thread by `start()`,
    /// since nokhwa camera handles are not `Send` on every backend.
    ///
    /// # Errors
    /// * `CameraError::NoDevices` - If the system has no cameras
    /// * `CameraError::DeviceNotFound` - If the device index doesn't exist
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if devices.is_empty() {
            return Err(CameraError::NoDevices);
        }
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }

        Ok(Self {
            settings,
            latest: Arc::new(Mutex::new(None)),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            stream: None,
        })
    }

    /// Resolution the camera actually delivers, which may differ from the
    /// requested one.
    pub fn actual_resolution(&self) -> Option<Resolution> {
        self.stream.map(|s| s.resolution)
    }

    pub fn actual_fps(&self) -> Option<u32> {
        self.stream.map(|s| s.fps)
    }

    /// Spawn the capture thread and wait until the stream is open.
    ///
    /// # Errors
    /// * `CameraError::AlreadyRunning` - If capture is already running
    /// * `CameraError::PermissionDenied` - If camera access is denied
    /// * `CameraError::OpenFailed` / `StreamFailed` - For other failures
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }
        self.stop.store(false, Ordering::SeqCst);

        let (ready_tx, ready_rx) = mpsc::channel();
        let settings = self.settings.clone();
        let latest = Arc::clone(&self.latest);
        let stop = Arc::clone(&self.stop);
        self.worker = Some(std::thread::spawn(move || {
            run_capture_loop(settings, latest, stop, ready_tx);
        }));

        let ready = ready_rx.recv().unwrap_or_else(|_| {
            Err(CameraError::StreamFailed(
                "Capture thread terminated unexpectedly".to_string(),
            ))
        });
        match ready {
            Ok(info) => {
                self.stream = Some(info);
                Ok(())
            }
            Err(e) => {
                self.stop();
                Err(e)
            }
        }
    }

    /// Signal the capture thread to stop and wait for it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// Latest captured frame, if one has arrived.
    pub fn get_frame(&self) -> Option<Frame> {
        self.latest.lock().ok()?.clone()
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl FrameSource for CameraCapture {
    fn latest_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        if !self.is_running() {
            return Err(CameraError::StreamEnded);
        }
        Ok(self.get_frame())
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
