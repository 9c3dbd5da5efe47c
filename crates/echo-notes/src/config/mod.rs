mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod server_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    server_config::ServerConfig,
};

pub(crate) const DEFAULT_AUTO_COPY: bool = true;
pub(crate) const DEFAULT_HOST: &str = "localhost";
pub(crate) const DEFAULT_PORT: u16 = 5000;
pub(crate) const DEFAULT_CHUNK_INTERVAL_MS: u64 = 1000;

pub(crate) fn default_auto_copy() -> bool {
    DEFAULT_AUTO_COPY
}

pub(crate) fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_chunk_interval_ms() -> u64 {
    DEFAULT_CHUNK_INTERVAL_MS
}
