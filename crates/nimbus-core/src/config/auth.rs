//! Identity consumption configuration.
//!
//! Nimbus Drive does not issue sessions itself; it validates bearer tokens
//! minted by the upstream identity service and consumes the embedded
//! (user id, email) pair.

use serde::{Deserialize, Serialize};

/// Bearer-token validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity service.
    #[serde(default)]
    pub jwt_secret: String,
    /// URL of the frontend used to build share links.
    #[serde(default = "default_client_url")]
    pub client_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            client_url: default_client_url(),
        }
    }
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}
