use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture device acquisition and operation errors.
///
/// Acquisition variants surface before any chunk is ever produced, so a
/// failed acquisition short-circuits a session without a channel
/// connection being attempted.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Access to the capture device was denied.
    #[error("Microphone access denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The platform or device configuration cannot capture audio.
    #[error("Capture unsupported: {reason} {location}")]
    Unsupported {
        /// Description of the unsupported configuration.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture device operation failed.
    #[error("Capture device error: {reason} {location}")]
    Device {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Streaming channel errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The duplex channel could not be established.
    #[error("Channel connect failed: {reason} {location}")]
    Connect {
        /// Description of the connect failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Terminal session failures.
///
/// Every variant is fatal for its session; nothing here is retried
/// automatically. Retry is a caller decision (start a new session).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Capture device could not be acquired or failed.
    #[error("Capture failed: {source} {location}")]
    Capture {
        /// The underlying capture error.
        #[source]
        source: CaptureError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The channel could not be established.
    #[error("Connect failed: {source} {location}")]
    Connect {
        /// The underlying channel error.
        #[source]
        source: ChannelError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The channel dropped before a terminal event arrived.
    #[error("Channel disconnected before a result arrived {location}")]
    UnexpectedDisconnect {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The remote service reported an error event.
    #[error("Remote error: {message} {location}")]
    Remote {
        /// Error message exactly as sent by the remote service.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The session was cancelled before completing.
    #[error("Session cancelled {location}")]
    Cancelled {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The session was already started once.
    #[error("Session already started {location}")]
    AlreadyStarted {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From impls with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CaptureError> for SessionError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        SessionError::Capture {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ChannelError> for SessionError {
    #[track_caller]
    fn from(source: ChannelError) -> Self {
        SessionError::Connect {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
