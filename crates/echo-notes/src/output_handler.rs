//! Clipboard export of generated notes.
//!
//! Converts rendered notes markup to plain text and places it on the
//! system clipboard.

use crate::{AppError, AppResult};

use std::panic::Location;

use arboard::Clipboard;
use echo_notes_core::markup;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Output handler for clipboard operations.
pub struct OutputHandler {
    pub(crate) clipboard: Clipboard,
}

impl OutputHandler {
    /// Create a new output handler.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("OutputHandler initialized");

        Ok(Self { clipboard })
    }

    /// Copy rendered notes markup to the clipboard as plain text.
    ///
    /// Returns the plain text that was placed on the clipboard.
    #[instrument(skip(self, rendered))]
    pub fn copy_notes(&mut self, rendered: &str) -> AppResult<String> {
        let plain = markup::to_plain_text(rendered);

        self.clipboard
            .set_text(&plain)
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(text_len = plain.len(), "Notes copied to clipboard");

        Ok(plain)
    }
}
