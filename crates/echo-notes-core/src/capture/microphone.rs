use crate::{AudioChunk, CaptureConfig, CaptureError, CaptureSource};

use std::{
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// Microphone-backed [`CaptureSource`].
///
/// The cpal input callback accumulates f32 samples and emits one
/// PCM16-LE [`AudioChunk`] per configured nominal interval. Chunk
/// boundaries are driven by sample count, so cadence follows the device
/// clock rather than a wall timer.
pub struct MicrophoneSource {
    config: CaptureConfig,
    stream: Option<Stream>,
    chunk_tx: Option<mpsc::UnboundedSender<AudioChunk>>,
    chunk_rx: Option<mpsc::UnboundedReceiver<AudioChunk>>,
    /// Samples accumulated toward the next chunk. Shared with the audio
    /// callback so `close()` can flush a final partial chunk.
    pending: Arc<Mutex<Vec<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback produces a chunk
    /// after `close()` starts tearing down.
    shutdown: Arc<AtomicBool>,
}

impl MicrophoneSource {
    /// Create a source for the configured device. The device itself is
    /// not touched until [`open`](CaptureSource::open).
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stream: None,
            chunk_tx: None,
            chunk_rx: None,
            pending: Arc::new(Mutex::new(Vec::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl CaptureSource for MicrophoneSource {
    #[instrument(skip(self))]
    async fn open(&mut self) -> Result<(), CaptureError> {
        let host = cpal::default_host();

        let device = match &self.config.device_name {
            Some(name) => host
                .input_devices()
                .map_err(|e| CaptureError::Device {
                    reason: format!("Failed to enumerate devices: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?
                .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
                .ok_or(CaptureError::NoMicrophoneFound {
                    location: ErrorLocation::from(Location::caller()),
                })?,
            None => host
                .default_input_device()
                .ok_or(CaptureError::NoMicrophoneFound {
                    location: ErrorLocation::from(Location::caller()),
                })?,
        };

        let supported = device.default_input_config().map_err(|e| match e {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => CaptureError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            },
            cpal::DefaultStreamConfigError::StreamTypeNotSupported => CaptureError::Unsupported {
                reason: "No supported input stream type".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            other => CaptureError::Device {
                reason: format!("Failed to get config: {}", other),
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        let stream_config: StreamConfig = supported.config();
        let interval_ms = self.config.chunk_interval.as_millis().max(1) as usize;
        let samples_per_chunk = stream_config.sample_rate as usize / 1000
            * interval_ms
            * stream_config.channels as usize;

        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let tx = chunk_tx.clone();
        let pending = Arc::clone(&self.pending);
        let shutdown = Arc::clone(&self.shutdown);

        // Reset for a fresh session.
        self.shutdown.store(false, Ordering::Release);
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Once close() sets this flag, no further chunk is
                    // produced even if cpal fires one more callback
                    // before the stream is dropped.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently
                    // dropping audio; the Vec data is still valid.
                    let mut buf = pending.lock().unwrap_or_else(|e| {
                        error!("Pending sample lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend_from_slice(data);
                    while buf.len() >= samples_per_chunk {
                        let rest = buf.split_off(samples_per_chunk);
                        let chunk = AudioChunk::new(encode_pcm16(&buf));
                        *buf = rest;
                        if tx.send(chunk).is_err() {
                            // Consumer gone; stop producing.
                            return;
                        }
                    }
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| match e {
                cpal::BuildStreamError::DeviceNotAvailable => CaptureError::PermissionDenied {
                    location: ErrorLocation::from(Location::caller()),
                },
                cpal::BuildStreamError::StreamConfigNotSupported => CaptureError::Unsupported {
                    reason: "Input stream config not supported".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                other => CaptureError::Device {
                    reason: format!("Failed to build stream: {}", other),
                    location: ErrorLocation::from(Location::caller()),
                },
            })?;

        stream.play().map_err(|e| CaptureError::Device {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        self.chunk_tx = Some(chunk_tx);
        self.chunk_rx = Some(chunk_rx);

        info!(
            sample_rate = stream_config.sample_rate,
            channels = stream_config.channels,
            samples_per_chunk,
            "Microphone capture started"
        );

        Ok(())
    }

    fn take_chunks(&mut self) -> Option<mpsc::UnboundedReceiver<AudioChunk>> {
        self.chunk_rx.take()
    }

    #[instrument(skip(self))]
    fn close(&mut self) {
        // Signal the callback to stop writing BEFORE dropping the stream,
        // so no callback races the final flush below.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag and completes. On most cpal backends drop() joins the
            // audio thread and this is redundant.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Microphone capture stopped");
        }

        if let Some(tx) = self.chunk_tx.take() {
            let mut buf = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            if !buf.is_empty() {
                let chunk = AudioChunk::new(encode_pcm16(&buf));
                debug!(bytes = chunk.len(), "Flushing final partial chunk");
                buf.clear();
                let _ = tx.send(chunk);
            }
            // Dropping the last sender closes the chunk stream.
        }
    }
}

/// Encode f32 samples as little-endian 16-bit PCM bytes.
pub(crate) fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}
