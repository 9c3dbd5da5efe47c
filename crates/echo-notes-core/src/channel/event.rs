use serde::{Deserialize, Serialize};

/// Final payload of a streaming session.
///
/// Produced at most once per session and immutable once produced. The
/// remote service may emit either field alone; each is handled
/// independently, never assumed paired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesResult {
    /// Raw transcription text, when the service produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    /// Generated notes text, when the service produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NotesResult {
    /// True when the result event carried neither transcription nor
    /// notes. Such a session still completes; callers decide how to
    /// present the empty outcome.
    pub fn is_empty(&self) -> bool {
        self.transcription.is_none() && self.notes.is_none()
    }
}

/// Payload-less control message sent to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// The live stream is complete; process the buffered audio.
    StopRecording,
}

impl ControlSignal {
    /// Name of the signal on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            ControlSignal::StopRecording => "stop-recording",
        }
    }
}

/// Named inbound channel event.
///
/// Lifecycle events drive the session's state, not the reverse.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The connection was established.
    Connected,
    /// The connection closed, remotely or locally.
    Disconnected,
    /// Terminal result event (`transcription-notes` on the wire).
    Notes(NotesResult),
    /// Terminal error event; the message is surfaced verbatim.
    RemoteError(String),
}

/// JSON envelope carried in websocket text frames, in both directions.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub(crate) enum WireFrame {
    #[serde(rename = "transcription-notes")]
    TranscriptionNotes(NotesResult),
    #[serde(rename = "error")]
    Error { message: String },
    #[serde(rename = "stop-recording")]
    StopRecording,
}
