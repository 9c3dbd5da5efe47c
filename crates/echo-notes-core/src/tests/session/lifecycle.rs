use crate::tests::session::{FakeCapture, FakeChannel, loc, wait_for};
use crate::{
    CaptureError, ChannelError, ChannelEvent, NotesResult, SessionError, SessionState,
    StreamingSession,
};

use std::sync::{Arc, atomic::Ordering};
use std::time::Duration;

/// WHAT: A finished session rejects a second run without reopening anything
/// WHY: A double start must never open two capture devices or two connections
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_completed_session_when_run_again_then_rejected_without_second_open() {
    // Given: A session whose first run completes on a scripted result
    let (capture, _chunk_tx) = FakeCapture::new();
    let (channel, event_tx) = FakeChannel::new();
    let opens = Arc::clone(&capture.opens);
    let connects = Arc::clone(&channel.connects);
    let (mut session, _handle) = StreamingSession::new(capture, channel);

    event_tx
        .send(ChannelEvent::Notes(NotesResult {
            transcription: Some("hello".to_string()),
            notes: Some("# Notes".to_string()),
        }))
        .unwrap();

    // When: Running twice in a row
    let first = session.run().await;
    let second = session.run().await;

    // Then: First completes, second is rejected, resources opened once
    assert!(first.is_ok());
    assert!(matches!(second, Err(SessionError::AlreadyStarted { .. })));
    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert_eq!(connects.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SessionState::Completed);
}

/// WHAT: Denied device permission fails the session before any connect
/// WHY: Acquisition errors must short-circuit without touching the network
#[tokio::test]
async fn given_denied_permission_when_run_then_fails_before_connect() {
    // Given: A capture source that denies access
    let capture = FakeCapture::failing(CaptureError::PermissionDenied { location: loc() });
    let (channel, _event_tx) = FakeChannel::new();
    let connects = Arc::clone(&channel.connects);
    let disconnects = Arc::clone(&channel.disconnects);
    let (mut session, handle) = StreamingSession::new(capture, channel);

    // When: Running the session
    let outcome = session.run().await;

    // Then: Failed terminally, no connect attempted, resources released once
    assert!(matches!(outcome, Err(SessionError::Capture { .. })));
    assert_eq!(connects.load(Ordering::SeqCst), 0);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(handle.state(), SessionState::Failed);
}

/// WHAT: A connect failure fails the session and releases the capture device
/// WHY: No terminal path may leak the device
#[tokio::test]
async fn given_connect_failure_when_run_then_session_fails_and_capture_released() {
    // Given: A channel that refuses to connect
    let (capture, _chunk_tx) = FakeCapture::new();
    let closes = Arc::clone(&capture.closes);
    let channel = FakeChannel::failing(ChannelError::Connect {
        reason: "connection refused".to_string(),
        location: loc(),
    });
    let (mut session, handle) = StreamingSession::new(capture, channel);

    // When: Running the session
    let outcome = session.run().await;

    // Then: Failed with the connect error, capture closed exactly once
    assert!(matches!(outcome, Err(SessionError::Connect { .. })));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(handle.state(), SessionState::Failed);
}

/// WHAT: Cancelling a streaming session closes and disconnects exactly once
/// WHY: The exactly-once cleanup guarantee must hold on the cancel path
#[tokio::test]
async fn given_streaming_session_when_cancelled_then_single_close_and_disconnect() {
    // Given: A session that reaches Streaming
    let (capture, _chunk_tx) = FakeCapture::new();
    let (channel, _event_tx) = FakeChannel::new();
    let closes = Arc::clone(&capture.closes);
    let disconnects = Arc::clone(&channel.disconnects);
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: Cancelling once Streaming is observed
    let controller = async move {
        wait_for(&mut observer, SessionState::Streaming).await;
        handle.cancel().await;
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: Cancelled terminally with exactly one close and one disconnect
    assert!(matches!(outcome, Err(SessionError::Cancelled { .. })));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SessionState::Failed);
}

/// WHAT: Cancel while waiting for permission releases both resources
/// WHY: Cancel must work from every non-terminal state
#[tokio::test]
async fn given_cancel_during_permission_wait_then_resources_released() {
    // Given: A capture whose open blocks on a gate that never fires
    let (capture, _chunk_tx, _gate) = FakeCapture::gated();
    let (channel, _event_tx) = FakeChannel::new();
    let closes = Arc::clone(&capture.closes);
    let disconnects = Arc::clone(&channel.disconnects);
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: Cancelling during AwaitingPermission
    let controller = async move {
        wait_for(&mut observer, SessionState::AwaitingPermission).await;
        handle.cancel().await;
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: Cancelled with both resources released
    assert!(matches!(outcome, Err(SessionError::Cancelled { .. })));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
}

/// WHAT: Stop during permission acquisition is ignored
/// WHY: stop() is a no-op unless the session is streaming
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stop_during_permission_wait_then_ignored_and_session_completes() {
    // Given: A gated capture so the session rests in AwaitingPermission
    let (capture, _chunk_tx, gate) = FakeCapture::gated();
    let (channel, event_tx) = FakeChannel::new();
    let sent = Arc::clone(&channel.sent);
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: Stopping during AwaitingPermission, then letting the session
    // proceed to a scripted result
    let controller = async move {
        wait_for(&mut observer, SessionState::AwaitingPermission).await;
        handle.stop().await;
        // Let the session consume (and ignore) the early stop.
        tokio::time::sleep(Duration::from_millis(50)).await;
        gate.send(()).unwrap();
        wait_for(&mut observer, SessionState::Streaming).await;
        event_tx
            .send(ChannelEvent::Notes(NotesResult {
                transcription: None,
                notes: Some("done".to_string()),
            }))
            .unwrap();
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: The session completes and no stop signal was ever sent
    assert!(outcome.is_ok());
    assert!(sent.lock().unwrap().is_empty());
}

/// WHAT: A result event arriving before stop() completes the session
/// WHY: The remote service may emit early; cleanup must still run once
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_result_before_stop_when_streaming_then_completed_once() {
    // Given: A streaming session with no stop requested
    let (capture, _chunk_tx) = FakeCapture::new();
    let (channel, event_tx) = FakeChannel::new();
    let closes = Arc::clone(&capture.closes);
    let disconnects = Arc::clone(&channel.disconnects);
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: The result event arrives in Streaming state
    let controller = async move {
        wait_for(&mut observer, SessionState::Streaming).await;
        event_tx
            .send(ChannelEvent::Notes(NotesResult {
                transcription: Some("early".to_string()),
                notes: None,
            }))
            .unwrap();
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: Completed with the partial result, exactly one cleanup
    let result = outcome.unwrap();
    assert_eq!(result.transcription.as_deref(), Some("early"));
    assert_eq!(result.notes, None);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(handle.state(), SessionState::Completed);
}

/// WHAT: A server error event fails the session with the verbatim message
/// WHY: Error payloads must reach the caller unmodified
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_error_event_when_stopping_then_message_surfaced_verbatim() {
    // Given: A session stopped and awaiting its terminal event
    let (capture, _chunk_tx) = FakeCapture::new();
    let (channel, event_tx) = FakeChannel::new();
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: The server reports an error after the stop signal
    let controller = async move {
        wait_for(&mut observer, SessionState::Streaming).await;
        handle.stop().await;
        wait_for(&mut observer, SessionState::Stopping).await;
        event_tx
            .send(ChannelEvent::RemoteError(
                "No audio data available.".to_string(),
            ))
            .unwrap();
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: Failed with the exact server message
    let message = match outcome {
        Err(SessionError::Remote { message, .. }) => message,
        _ => String::new(),
    };
    assert_eq!(message, "No audio data available.");
}

/// WHAT: An unexpected disconnect mid-stream fails the session
/// WHY: No automatic reconnect exists; the drop must surface
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_disconnect_event_when_streaming_then_unexpected_disconnect() {
    // Given: A streaming session
    let (capture, _chunk_tx) = FakeCapture::new();
    let (channel, event_tx) = FakeChannel::new();
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: The channel reports a disconnect before any terminal event
    let controller = async move {
        wait_for(&mut observer, SessionState::Streaming).await;
        event_tx.send(ChannelEvent::Disconnected).unwrap();
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: Failed with UnexpectedDisconnect
    assert!(matches!(
        outcome,
        Err(SessionError::UnexpectedDisconnect { .. })
    ));
    assert_eq!(handle.state(), SessionState::Failed);
}

/// WHAT: A result event with neither field still completes the session
/// WHY: The empty outcome is surfaced as a marker, not a silent failure
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_empty_result_event_then_completed_with_empty_marker() {
    // Given: A streaming session
    let (capture, _chunk_tx) = FakeCapture::new();
    let (channel, event_tx) = FakeChannel::new();
    let (mut session, handle) = StreamingSession::new(capture, channel);
    let mut observer = handle.clone();

    // When: The result event carries neither transcription nor notes
    let controller = async move {
        wait_for(&mut observer, SessionState::Streaming).await;
        event_tx
            .send(ChannelEvent::Notes(NotesResult::default()))
            .unwrap();
    };
    let (outcome, ()) = tokio::join!(session.run(), controller);

    // Then: Completed, with the empty-result marker set
    let result = outcome.unwrap();
    assert!(result.is_empty());
    assert_eq!(handle.state(), SessionState::Completed);
}
