use crate::config::{default_host, default_port};

use serde::{Deserialize, Serialize};

/// Remote note-generation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname of the note-generation service.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port of the note-generation service.
    #[serde(default = "default_port")]
    pub port: u16,
}
