//! API server configuration.

use voyage_core::relay::RelayConfig;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// Completion service settings. Checked per request, not at startup.
    pub relay: RelayConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                  | Default          |
    /// |---------------------------|------------------|
    /// | `BIND_ADDR`               | `127.0.0.1:3100` |
    /// | `AZURE_OPENAI_*`          | see [`RelayConfig::from_env`] |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            relay: RelayConfig::from_env(),
        }
    }
}
