//! Client configuration surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and retry settings for one infrastructure API client.
///
/// Authentication is either a pre-issued `auth_token` or a
/// username/password pair; the token wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL of the API service endpoint.
    pub api_endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Pre-issued auth token; takes precedence over username/password.
    pub auth_token: Option<String>,
    pub tenant_name: Option<String>,
    pub region: Option<String>,
    /// Version of the API service endpoint.
    pub api_version: u32,
    /// How many retries when a request conflicts.
    pub max_retries: u32,
    /// Seconds between retries.
    pub retry_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            username: None,
            password: None,
            auth_token: None,
            tenant_name: None,
            region: None,
            api_version: 1,
            max_retries: 60,
            retry_interval_secs: 2,
        }
    }
}

impl ClientConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Whether enough credential material is present to attempt
    /// authentication at all.
    pub fn has_credentials(&self) -> bool {
        self.auth_token.is_some() || (self.username.is_some() && self.password.is_some())
    }
}
