use crate::{AppResult, OutputHandler, config::Config};

use std::time::Duration;

use echo_notes_core::{
    CaptureConfig, MicrophoneSource, NotesResult, StreamingSession, WsChannel, markup,
};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Main application state.
///
/// Runs one streaming session from the microphone to the remote
/// note-generation service, then presents and exports the result.
pub struct App {
    pub(crate) config: Config,
    pub(crate) output_handler: OutputHandler,
}

impl App {
    /// Run a single recording session to completion.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("EchoNotes starting");

        let capture = MicrophoneSource::new(CaptureConfig {
            chunk_interval: Duration::from_millis(self.config.audio.chunk_interval_ms),
            device_name: self.config.audio.selected_device.clone(),
        });
        let channel = WsChannel::new(self.config.stream_url());
        let (mut session, handle) = StreamingSession::new(capture, channel);

        println!("Recording. Press Enter to stop, Ctrl+C to cancel.");

        // Stdin forwarding via a single persistent blocking task.
        //
        // read_line blocks with no async counterpart in scope here, so
        // the task lives on the blocking pool. When line_rx is dropped,
        // blocking_send fails and the loop ends on the next line.
        let (line_tx, mut line_rx) = mpsc::channel(8);
        let stdin_handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if line_tx.blocking_send(()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        // Controller: translates user input into session commands. Kept
        // separate from the session so Ctrl+C still cancels after Enter.
        let controller_handle = {
            let handle = handle.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        line = line_rx.recv() => match line {
                            Some(()) => handle.stop().await,
                            None => break,
                        },
                        result = tokio::signal::ctrl_c() => {
                            if result.is_ok() {
                                handle.cancel().await;
                            }
                            break;
                        }
                    }
                }
            })
        };

        // The capture stream is !Send, so the session runs on this task
        // rather than a spawned one.
        let outcome = session.run().await;

        controller_handle.abort();

        match tokio::time::timeout(Duration::from_secs(1), stdin_handle).await {
            Ok(Ok(())) => info!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => info!(
                "Stdin forwarder still blocked on input, \
                     will be cleaned up on exit"
            ),
        }

        let result = outcome?;
        self.present(&result)?;

        info!("EchoNotes shut down successfully");

        Ok(())
    }

    /// Print the session result and export the notes.
    fn present(&mut self, result: &NotesResult) -> AppResult<()> {
        if result.is_empty() {
            println!("No transcription or notes were produced for this session.");
            return Ok(());
        }

        if let Some(transcription) = &result.transcription {
            println!("\nTranscription:\n{transcription}");
        }

        if let Some(notes) = &result.notes {
            let rendered = markup::render(&markup::format(notes));

            if self.config.behavior.auto_copy {
                let plain = self.output_handler.copy_notes(&rendered)?;
                println!("\nNotes:\n{plain}");
                println!("(notes copied to clipboard)");
            } else {
                println!("\nNotes:\n{}", markup::to_plain_text(&rendered));
            }
        }

        Ok(())
    }
}
