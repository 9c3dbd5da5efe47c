use crate::{
    AudioChunk, ChannelError, ChannelEvent, ControlSignal, StreamingChannel, channel::WireFrame,
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, trace, warn};

/// WebSocket-backed [`StreamingChannel`].
///
/// Binary frames carry audio chunks; text frames carry JSON event
/// envelopes (see [`WireFrame`]). A writer task owns the sink and a
/// reader task translates inbound frames into [`ChannelEvent`]s. The
/// connected flag is cleared by the reader on close or read error, so
/// sends observe disconnection without waiting on the socket.
pub struct WsChannel {
    url: String,
    connected: Arc<AtomicBool>,
    outbound_tx: Option<mpsc::UnboundedSender<Message>>,
    event_rx: Option<mpsc::UnboundedReceiver<ChannelEvent>>,
}

impl WsChannel {
    /// Create a channel addressed to `url`, the full websocket URL of
    /// the audio streaming namespace (e.g.
    /// `ws://localhost:5000/audio-stream`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connected: Arc::new(AtomicBool::new(false)),
            outbound_tx: None,
            event_rx: None,
        }
    }

    fn send_message(&self, message: Message, kind: &'static str) {
        if !self.connected.load(Ordering::Acquire) {
            trace!(kind, "Send while disconnected, dropping");
            return;
        }
        if let Some(tx) = &self.outbound_tx {
            if tx.send(message).is_err() {
                trace!(kind, "Writer task gone, dropping");
            }
        }
    }
}

impl StreamingChannel for WsChannel {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn connect(&mut self) -> Result<(), ChannelError> {
        if self.outbound_tx.is_some() {
            debug!("Already connected, ignoring connect");
            return Ok(());
        }

        let (ws, _response) =
            connect_async(self.url.as_str())
                .await
                .map_err(|e| ChannelError::Connect {
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        let (mut sink, mut stream) = ws.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        self.connected.store(true, Ordering::Release);

        // Writer: sole owner of the sink. Ends when the outbound queue
        // closes or a close frame has been flushed.
        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if sink.send(message).await.is_err() {
                    break;
                }
                if closing {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        // Reader: translates inbound frames into channel events and
        // clears the connected flag when the stream ends.
        let connected = Arc::clone(&self.connected);
        tokio::spawn(async move {
            let _ = event_tx.send(ChannelEvent::Connected);
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<WireFrame>(&text) {
                        Ok(WireFrame::TranscriptionNotes(result)) => {
                            let _ = event_tx.send(ChannelEvent::Notes(result));
                        }
                        Ok(WireFrame::Error { message }) => {
                            let _ = event_tx.send(ChannelEvent::RemoteError(message));
                        }
                        Ok(WireFrame::StopRecording) => {
                            warn!("Unexpected control frame from server, ignoring");
                        }
                        Err(e) => {
                            warn!(error = %e, "Unrecognized text frame ignored");
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {} // binary/ping/pong from the server: not part of the contract
                    Err(e) => {
                        debug!(error = %e, "WebSocket read error");
                        break;
                    }
                }
            }
            connected.store(false, Ordering::Release);
            let _ = event_tx.send(ChannelEvent::Disconnected);
            debug!("Channel reader finished");
        });

        self.outbound_tx = Some(outbound_tx);
        self.event_rx = Some(event_rx);

        info!("Channel connected");

        Ok(())
    }

    fn send_chunk(&mut self, chunk: AudioChunk) {
        trace!(bytes = chunk.len(), "Forwarding audio chunk");
        self.send_message(Message::Binary(chunk.into_bytes()), "chunk");
    }

    fn send_control(&mut self, signal: ControlSignal) {
        let frame = match signal {
            ControlSignal::StopRecording => WireFrame::StopRecording,
        };
        match serde_json::to_string(&frame) {
            Ok(text) => {
                debug!(signal = signal.wire_name(), "Sending control signal");
                self.send_message(Message::Text(text), "control");
            }
            Err(e) => error!(error = %e, "Failed to encode control signal"),
        }
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        match self.event_rx.as_mut() {
            Some(rx) => rx.recv().await,
            // Never connected: no event can ever arrive.
            None => std::future::pending().await,
        }
    }

    async fn disconnect(&mut self) {
        self.connected.store(false, Ordering::Release);
        if let Some(tx) = self.outbound_tx.take() {
            let _ = tx.send(Message::Close(None));
            debug!("Channel disconnect requested");
        }
    }
}
