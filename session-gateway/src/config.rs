//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for connecting to an Account Aggregator endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// AA endpoint base URL
    pub endpoint: String,

    /// Certificate-pinning allow-list (base64 SPKI hashes). Empty disables
    /// pinning. Enforcement belongs to the channel layer.
    #[serde(default)]
    pub certificate_pins: Vec<String>,

    /// Platform silent-auth (SNA) delegate configuration, if available
    #[serde(default)]
    pub silent_auth: Option<SilentAuthConfig>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// Path for the persisted login profile
    #[serde(default)]
    pub profile_path: Option<std::path::PathBuf>,
}

/// Silent-auth (SNA) delegate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilentAuthConfig {
    /// Application id registered with the platform auth delegate
    pub app_id: String,
}

fn default_timeout() -> u64 {
    crate::DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:8443/consentapi".to_string(),
            certificate_pins: Vec::new(),
            silent_auth: None,
            request_timeout_seconds: default_timeout(),
            profile_path: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
