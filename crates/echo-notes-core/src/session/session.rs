use crate::{
    AudioChunk, CaptureError, CaptureSource, ChannelEvent, ControlSignal, NotesResult,
    SessionError, SessionState, StreamingChannel,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

/// Commands sent from a [`SessionHandle`] to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Finish streaming and wait for the remote result. No-op unless the
    /// session is currently streaming.
    Stop,
    /// Abort the session from any non-terminal state.
    Cancel,
}

/// Cloneable handle for controlling and observing a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Request a stop. Ignored unless the session is streaming.
    pub async fn stop(&self) {
        let _ = self.command_tx.send(SessionCommand::Stop).await;
    }

    /// Abort the session. The session fails with a cancellation error
    /// after releasing the capture device and the channel.
    pub async fn cancel(&self) {
        let _ = self.command_tx.send(SessionCommand::Cancel).await;
    }

    /// Latest published session state.
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Wait for the next state change. Returns `None` once the session
    /// value has been dropped.
    pub async fn state_changed(&mut self) -> Option<SessionState> {
        self.state_rx.changed().await.ok()?;
        Some(*self.state_rx.borrow_and_update())
    }
}

/// Outcome of an awaited acquisition step that can be cancelled.
enum Acquire<T> {
    Done(T),
    Cancelled,
}

/// One unit of work selected by the streaming loop.
enum Step {
    Command(Option<SessionCommand>),
    Chunk(Option<AudioChunk>),
    Event(Option<ChannelEvent>),
}

/// Live audio streaming session state machine.
///
/// Owns a capture source and a streaming channel exclusively and drives
/// them through the lifecycle in [`SessionState`]. [`run`] yields
/// exactly one terminal outcome per session: a [`NotesResult`] or a
/// [`SessionError`]. On every terminal path the capture device is
/// closed exactly once and the channel disconnected exactly once.
///
/// All state mutation happens inside [`run`]'s task; handles interact
/// purely by message passing, so no locking is needed to preserve the
/// single-terminal-event invariant. Multiple independent sessions can
/// coexist; nothing here is process-global.
///
/// [`run`]: StreamingSession::run
pub struct StreamingSession<S, C> {
    capture: S,
    channel: C,
    state: SessionState,
    session_id: Uuid,
    capture_closed: bool,
    command_rx: mpsc::Receiver<SessionCommand>,
    state_tx: watch::Sender<SessionState>,
}

impl<S: CaptureSource, C: StreamingChannel> StreamingSession<S, C> {
    /// Create an idle session owning `capture` and `channel`, paired
    /// with its control handle.
    pub fn new(capture: S, channel: C) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);

        let session = Self {
            capture,
            channel,
            state: SessionState::Idle,
            session_id: Uuid::new_v4(),
            capture_closed: false,
            command_rx,
            state_tx,
        };

        (
            session,
            SessionHandle {
                command_tx,
                state_rx,
            },
        )
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Unique session ID for log correlation.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Drive the session from `Idle` to a terminal state.
    ///
    /// Rejected with [`SessionError::AlreadyStarted`] unless the session
    /// is idle, so a second start can never open a second capture device
    /// or channel connection.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn run(&mut self) -> Result<NotesResult, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyStarted {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.transition(SessionState::AwaitingPermission);
        match self.acquire_capture().await {
            Acquire::Done(Ok(())) => {}
            Acquire::Done(Err(e)) => return self.fail(e.into()).await,
            Acquire::Cancelled => return self.fail(Self::cancelled()).await,
        }

        self.transition(SessionState::Connecting);
        match self.acquire_channel().await {
            Acquire::Done(Ok(())) => {}
            Acquire::Done(Err(e)) => return self.fail(e.into()).await,
            Acquire::Cancelled => return self.fail(Self::cancelled()).await,
        }

        let Some(mut chunks) = self.capture.take_chunks() else {
            let source = CaptureError::Device {
                reason: "Capture produced no chunk stream".to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
            return self.fail(source.into()).await;
        };

        self.transition(SessionState::Streaming);

        // Disables the chunk branch once the chunk stream ends, so a
        // closed receiver cannot wake the loop again.
        let mut capture_done = false;

        loop {
            let step = tokio::select! {
                command = self.command_rx.recv() => Step::Command(command),
                chunk = chunks.recv(), if self.state == SessionState::Streaming && !capture_done => {
                    Step::Chunk(chunk)
                }
                event = self.channel.next_event() => Step::Event(event),
            };

            match step {
                Step::Command(Some(SessionCommand::Stop))
                    if self.state == SessionState::Streaming =>
                {
                    self.close_capture();
                    // Flush chunks produced before the stop, then tell
                    // the remote service the stream is complete.
                    while let Ok(chunk) = chunks.try_recv() {
                        self.channel.send_chunk(chunk);
                    }
                    self.channel.send_control(ControlSignal::StopRecording);
                    self.transition(SessionState::Stopping);
                }
                Step::Command(Some(SessionCommand::Stop)) => {
                    trace!(session_id = %self.session_id, "Stop ignored outside Streaming");
                }
                Step::Command(Some(SessionCommand::Cancel)) | Step::Command(None) => {
                    return self.fail(Self::cancelled()).await;
                }
                Step::Chunk(Some(chunk)) => {
                    self.channel.send_chunk(chunk);
                }
                Step::Chunk(None) => {
                    // Capture ended on its own; keep waiting for a
                    // terminal event or a command.
                    capture_done = true;
                }
                Step::Event(Some(ChannelEvent::Notes(result))) => {
                    // Legitimate in Streaming too: the service may emit
                    // early, before an explicit stop.
                    return self.complete(result).await;
                }
                Step::Event(Some(ChannelEvent::RemoteError(message))) => {
                    let error = SessionError::Remote {
                        message,
                        location: ErrorLocation::from(Location::caller()),
                    };
                    return self.fail(error).await;
                }
                Step::Event(Some(ChannelEvent::Disconnected)) | Step::Event(None) => {
                    let error = SessionError::UnexpectedDisconnect {
                        location: ErrorLocation::from(Location::caller()),
                    };
                    return self.fail(error).await;
                }
                Step::Event(Some(ChannelEvent::Connected)) => {}
            }
        }
    }

    /// Await capture acquisition while honoring cancellation. A stop
    /// command at this point is a no-op by contract.
    async fn acquire_capture(&mut self) -> Acquire<Result<(), CaptureError>> {
        let open = self.capture.open();
        tokio::pin!(open);
        loop {
            tokio::select! {
                result = &mut open => break Acquire::Done(result),
                command = self.command_rx.recv() => match command {
                    Some(SessionCommand::Stop) => {}
                    Some(SessionCommand::Cancel) | None => break Acquire::Cancelled,
                },
            }
        }
    }

    /// Await channel establishment while honoring cancellation.
    async fn acquire_channel(&mut self) -> Acquire<Result<(), crate::ChannelError>> {
        let connect = self.channel.connect();
        tokio::pin!(connect);
        loop {
            tokio::select! {
                result = &mut connect => break Acquire::Done(result),
                command = self.command_rx.recv() => match command {
                    Some(SessionCommand::Stop) => {}
                    Some(SessionCommand::Cancel) | None => break Acquire::Cancelled,
                },
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            session_id = %self.session_id,
            from = ?self.state,
            to = ?next,
            "Session state changed"
        );
        self.state = next;
        let _ = self.state_tx.send(next);
    }

    #[track_caller]
    fn cancelled() -> SessionError {
        SessionError::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Close the capture device at most once for this session. `close`
    /// itself is idempotent; the flag keeps the stop path (which closes
    /// early) from closing a second time during release.
    fn close_capture(&mut self) {
        if !self.capture_closed {
            self.capture.close();
            self.capture_closed = true;
        }
    }

    /// Single cleanup point: every terminal path passes through here
    /// exactly once, releasing both owned resources.
    async fn release(&mut self) {
        self.close_capture();
        self.channel.disconnect().await;
    }

    async fn complete(&mut self, result: NotesResult) -> Result<NotesResult, SessionError> {
        self.release().await;
        self.transition(SessionState::Completed);
        if result.is_empty() {
            warn!(
                session_id = %self.session_id,
                "Result event carried neither transcription nor notes"
            );
        }
        info!(session_id = %self.session_id, "Session completed");
        Ok(result)
    }

    async fn fail(&mut self, error: SessionError) -> Result<NotesResult, SessionError> {
        self.release().await;
        self.transition(SessionState::Failed);
        warn!(session_id = %self.session_id, error = %error, "Session failed");
        Err(error)
    }
}
