use crate::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Also write logs to a daily rolling file under the data directory
    #[serde(default)]
    pub file_logging: bool,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
