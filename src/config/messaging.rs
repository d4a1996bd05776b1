//! Messaging and bus configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Default subject for lookup requests.
pub const DEFAULT_SUBJECT: &str = "news_items";

/// Messaging type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingType {
    /// NATS core request/reply.
    #[default]
    Nats,
    /// In-process channels (standalone mode).
    Channel,
}

/// Messaging configuration (discriminated union).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Messaging type discriminator.
    #[serde(rename = "type")]
    pub messaging_type: MessagingType,
    /// Subject lookup requests are sent on.
    pub subject: String,
    /// Upper bound for one request/reply round trip, in milliseconds.
    pub request_timeout_ms: u64,
    /// NATS-specific configuration.
    pub nats: NatsConfig,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            messaging_type: MessagingType::Nats,
            subject: DEFAULT_SUBJECT.to_string(),
            request_timeout_ms: 1000,
            nats: NatsConfig::default(),
        }
    }
}

impl MessagingConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// NATS-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    /// NATS server URL.
    pub url: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
        }
    }
}
