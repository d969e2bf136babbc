//! Shared HTTP client construction policy for the remote store.
//!
//! Keeps timeout, user-agent, and compression defaults in one place.

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::debug;

use crate::config::{ClientConfig, ConfigError};
use crate::user_agent;

/// Builds the HTTP client used by [`HttpRemoteStore`](super::HttpRemoteStore).
///
/// # Errors
///
/// Returns [`ConfigError::ClientBuild`] when client construction fails.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client, ConfigError> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(user_agent::default_user_agent);
    debug!(
        user_agent = %user_agent,
        connect_timeout_ms = config.connect_timeout.as_millis(),
        read_timeout_ms = config.read_timeout.as_millis(),
        "Building remote store HTTP client"
    );

    apply_env_proxy(
        Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(user_agent)
            .gzip(true),
    )
    .build()
    .map_err(|error| ConfigError::ClientBuild {
        reason: error.to_string(),
    })
}

fn apply_env_proxy(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy("MODINDEX_PROXY")
        && let Ok(resolved) = Proxy::all(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
