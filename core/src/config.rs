//! Process-wide client configuration.
//!
//! Read once at startup and never mutated afterwards. The bearer token is
//! optional: without one, requests still go out and the server decides.

use std::env;

use tracing::warn;

/// Endpoint used when `FAX_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/graphql";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Build from `FAX_API_URL` and `API_KEY`.
    pub fn from_env() -> Self {
        let base_url = env::var("FAX_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let config = Self::new(base_url, env::var("API_KEY").ok());
        if config.auth_token.is_none() {
            warn!("API_KEY is not set; requests will be sent without a bearer token");
        }
        config
    }
}
