//! EchoNotes Core Library
//!
//! Live audio streaming sessions against a remote note-generation
//! service, plus the notes markup formatter and its plain-text export.
//!
//! # Example
//!
//! ```no_run
//! use echo_notes_core::{
//!     CaptureConfig, CoreResult, MicrophoneSource, StreamingSession, WsChannel,
//! };
//!
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CoreResult<()> {
//!     let capture = MicrophoneSource::new(CaptureConfig::default());
//!     let channel = WsChannel::new("ws://localhost:5000/audio-stream");
//!     let (mut session, handle) = StreamingSession::new(capture, channel);
//!
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!         handle.stop().await;
//!     });
//!
//!     let result = session.run().await?;
//!     println!("{:?}", result.notes);
//!     Ok(())
//! }
//! ```

mod capture;
mod channel;
mod error;
pub mod markup;
mod session;

pub use {
    capture::{AudioChunk, CaptureConfig, CaptureSource, MicrophoneSource},
    channel::{ChannelEvent, ControlSignal, NotesResult, StreamingChannel, WsChannel},
    error::{CaptureError, ChannelError, Result as CoreResult, SessionError},
    session::{SessionCommand, SessionHandle, SessionState, StreamingSession},
};
