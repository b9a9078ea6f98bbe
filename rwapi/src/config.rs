use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::errors::RwApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.reliefweb.int/v1/";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identifies the application to the API operators.
    #[serde(default)]
    pub appname: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            appname: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self, RwApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RwApiError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            RwApiError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// Default functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}
