//! Microphone capture sessions.
//!
//! A `CaptureSession` owns every device-side handle for one live input
//! stream: the cpal stream, its error flag, and the producer half of the
//! audio ring. The matching `FrameReceiver` lives on the caller's thread
//! and assembles fixed-size analysis frames. Closing (or dropping) the
//! session releases the hardware synchronously; nothing about the device
//! is held in globals.

pub mod session;

pub use session::{CaptureConfig, CaptureSession, FrameReceiver};

/// Why a capture session could not be opened or keep running.
///
/// Capture failures are surfaced immediately - there is no internal retry
/// loop, because every case needs user action (grant permission, plug a
/// device back in) or caller policy.
#[derive(Debug)]
pub enum CaptureError {
    /// The host has no default input device.
    NoInputDevice,
    /// The OS refused microphone access. Terminal until the user grants it.
    PermissionDenied(String),
    /// The device disappeared (unplugged, claimed exclusively elsewhere).
    DeviceLost(String),
    /// The device only offers a sample format this crate does not decode.
    UnsupportedFormat(String),
    /// Anything else the audio backend reported.
    Stream(String),
}

impl CaptureError {
    /// Whether retrying `open` later can plausibly succeed without user
    /// intervention. Permission denials are not recoverable by retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CaptureError::PermissionDenied(_) => false,
            CaptureError::NoInputDevice
            | CaptureError::DeviceLost(_)
            | CaptureError::UnsupportedFormat(_)
            | CaptureError::Stream(_) => true,
        }
    }
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::NoInputDevice => write!(f, "no input device available"),
            CaptureError::PermissionDenied(detail) => {
                write!(f, "microphone access denied: {detail}")
            }
            CaptureError::DeviceLost(detail) => write!(f, "input device lost: {detail}"),
            CaptureError::UnsupportedFormat(format) => {
                write!(f, "unsupported input sample format: {format}")
            }
            CaptureError::Stream(detail) => write!(f, "input stream error: {detail}"),
        }
    }
}

impl std::error::Error for CaptureError {}

// cpal has no dedicated permission variant; backends report denials as
// backend-specific errors. Classify by message so callers can distinguish
// "re-prompt the user" from "retry later".
fn classify_backend_error(message: String) -> CaptureError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("access denied") {
        CaptureError::PermissionDenied(message)
    } else {
        CaptureError::Stream(message)
    }
}

impl From<cpal::DefaultStreamConfigError> for CaptureError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        match err {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => {
                CaptureError::DeviceLost("device not available".into())
            }
            cpal::DefaultStreamConfigError::StreamTypeNotSupported => {
                CaptureError::UnsupportedFormat("input streams not supported".into())
            }
            cpal::DefaultStreamConfigError::BackendSpecific { err } => {
                classify_backend_error(err.description)
            }
        }
    }
}

impl From<cpal::BuildStreamError> for CaptureError {
    fn from(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => {
                CaptureError::DeviceLost("device not available".into())
            }
            cpal::BuildStreamError::BackendSpecific { err } => {
                classify_backend_error(err.description)
            }
            other => CaptureError::Stream(other.to_string()),
        }
    }
}

impl From<cpal::PlayStreamError> for CaptureError {
    fn from(err: cpal::PlayStreamError) -> Self {
        match err {
            cpal::PlayStreamError::DeviceNotAvailable => {
                CaptureError::DeviceLost("device not available".into())
            }
            cpal::PlayStreamError::BackendSpecific { err } => {
                classify_backend_error(err.description)
            }
        }
    }
}
