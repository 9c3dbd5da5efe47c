/// Lifecycle state of a streaming session.
///
/// Exactly one instance exists per session, mutated only by the
/// session's own transition function. Once a terminal state is reached
/// no further transition occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// Waiting for the capture device to be granted.
    AwaitingPermission,
    /// Capture granted; establishing the duplex channel.
    Connecting,
    /// Forwarding live audio chunks to the channel.
    Streaming,
    /// Stop signal sent; awaiting the terminal result or error event.
    Stopping,
    /// Terminal: a result was delivered.
    Completed,
    /// Terminal: the session failed or was cancelled.
    Failed,
}

impl SessionState {
    /// True for states from which no further transition occurs.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}
