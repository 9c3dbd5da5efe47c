//! EchoNotes: live audio streaming into structured meeting notes.

mod app;
mod config;
mod error;
mod output_handler;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    output_handler::OutputHandler,
};

use crate::config::Config;

use tracing::error;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("echo_notes=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let output_handler = match OutputHandler::new() {
        Ok(oh) => oh,
        Err(e) => {
            error!("Failed to create OutputHandler: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let app = App {
            config,
            output_handler,
        };

        if let Err(e) = app.run().await {
            error!(error = ?e, "App error");
            std::process::exit(1);
        }
    });
}
