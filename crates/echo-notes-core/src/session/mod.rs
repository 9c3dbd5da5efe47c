#[allow(clippy::module_inception)]
mod session;
mod state;

pub use {
    session::{SessionCommand, SessionHandle, StreamingSession},
    state::SessionState,
};
