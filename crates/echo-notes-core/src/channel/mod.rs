mod event;
mod websocket;

pub use {
    event::{ChannelEvent, ControlSignal, NotesResult},
    websocket::WsChannel,
};

pub(crate) use event::WireFrame;

use crate::{AudioChunk, ChannelError};

/// Duplex, message-oriented channel to the remote processing service,
/// addressed to a named logical stream.
///
/// Sends are fire-and-forget: when the channel is not connected they are
/// silently dropped, never raised as errors. Callers gate on observed
/// connection state (the `Connected`/`Disconnected` events), not on send
/// outcomes. This is the documented contract, not an accident; the
/// remote service can produce a result from a partial stream.
#[allow(async_fn_in_trait)] // session futures are driven on the local task, not spawned
pub trait StreamingChannel {
    /// Establish the single logical connection for this channel.
    async fn connect(&mut self) -> Result<(), ChannelError>;

    /// Forward one binary audio chunk. Dropped silently if disconnected.
    fn send_chunk(&mut self, chunk: AudioChunk);

    /// Send a payload-less named control message. Same drop semantics as
    /// [`send_chunk`](StreamingChannel::send_chunk).
    fn send_control(&mut self, signal: ControlSignal);

    /// Next inbound event, or `None` once no event can ever arrive.
    async fn next_event(&mut self) -> Option<ChannelEvent>;

    /// Close the connection. Idempotent; safe after the remote end
    /// already closed.
    async fn disconnect(&mut self);
}
