use crate::config::default_auto_copy;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to automatically copy generated notes to the clipboard.
    #[serde(default = "default_auto_copy")]
    pub auto_copy: bool,
}
