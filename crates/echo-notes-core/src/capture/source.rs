use crate::CaptureError;

use std::time::Duration;

use tokio::sync::mpsc;

/// Default nominal interval between produced chunks.
pub(crate) const DEFAULT_CHUNK_INTERVAL: Duration = Duration::from_secs(1);

/// One unit of captured audio, an opaque byte buffer.
///
/// Chunks are produced in order and are never reordered or duplicated.
/// Ownership transfers from the capture source to the channel on
/// production; a chunk that cannot be delivered is dropped, not retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    data: Vec<u8>,
}

impl AudioChunk {
    /// Wrap encoded audio bytes as a chunk.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Encoded audio bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the chunk, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte length of the chunk.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the chunk holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Capture configuration.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Nominal interval of audio per produced chunk.
    pub chunk_interval: Duration,
    /// Input device name; `None` selects the platform default.
    pub device_name: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            chunk_interval: DEFAULT_CHUNK_INTERVAL,
            device_name: None,
        }
    }
}

/// A local audio capture device exposed as an ordered chunk stream.
///
/// Acquisition failures (denied permission, no device, unsupported
/// platform) surface from [`open`](CaptureSource::open) before any chunk
/// is produced. The chunk receiver is claimed once via
/// [`take_chunks`](CaptureSource::take_chunks); chunks arrive in
/// production order with no batching. [`close`](CaptureSource::close) is
/// idempotent and releases the underlying device.
#[allow(async_fn_in_trait)] // session futures are driven on the local task, not spawned
pub trait CaptureSource {
    /// Acquire the device and begin producing chunks.
    async fn open(&mut self) -> Result<(), CaptureError>;

    /// Claim the ordered chunk stream. Returns `None` if already claimed
    /// or the source was never opened.
    fn take_chunks(&mut self) -> Option<mpsc::UnboundedReceiver<AudioChunk>>;

    /// Stop production and release the device. Safe to call repeatedly.
    fn close(&mut self);
}
