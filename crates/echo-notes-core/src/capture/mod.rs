mod microphone;
mod source;

pub use {
    microphone::MicrophoneSource,
    source::{AudioChunk, CaptureConfig, CaptureSource},
};

pub(crate) use microphone::encode_pcm16;
