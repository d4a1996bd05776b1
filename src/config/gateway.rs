//! HTTP gateway configuration types.

use std::time::Duration;

use serde::Deserialize;

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address and port to listen on.
    pub addr: String,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            timeout_ms: 1000,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
