//! Feed connection configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the feed connection manager.
///
/// The reconnection policy is a bounded attempt count at a fixed delay;
/// there is no exponential growth. The defaults match the dashboard's
/// original client settings: five attempts, one second apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed server URL (e.g. `ws://localhost:4000/`).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Maximum number of reconnection attempts per outage (0 = unlimited).
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Fixed delay between reconnection attempts, in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Interval between periodic snapshot requests, in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Capacity of the outbound message queue while connected.
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

fn default_endpoint() -> String {
    "ws://localhost:4000/".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_reconnect_delay_ms() -> u64 {
    1_000
}

fn default_refresh_interval_ms() -> u64 {
    5_000
}

fn default_outbound_capacity() -> usize {
    64
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

impl FeedConfig {
    /// Creates a new builder for `FeedConfig`.
    #[must_use]
    pub fn builder() -> FeedConfigBuilder {
        FeedConfigBuilder::default()
    }

    /// Returns the connection timeout as a Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the reconnect delay as a Duration.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Returns the snapshot refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Returns whether another attempt is allowed after `attempts` failures.
    #[must_use]
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_reconnect_attempts == 0 || attempts <= self.max_reconnect_attempts
    }
}

/// Builder for `FeedConfig`.
#[derive(Debug, Default)]
pub struct FeedConfigBuilder {
    endpoint: Option<String>,
    connect_timeout_ms: Option<u64>,
    max_reconnect_attempts: Option<u32>,
    reconnect_delay_ms: Option<u64>,
    refresh_interval_ms: Option<u64>,
    outbound_capacity: Option<usize>,
}

impl FeedConfigBuilder {
    /// Sets the feed server URL.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Sets the maximum reconnection attempts per outage.
    #[must_use]
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Sets the fixed reconnection delay.
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay_ms = Some(delay.as_millis() as u64);
        self
    }

    /// Sets the periodic snapshot refresh interval.
    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Sets the outbound queue capacity.
    #[must_use]
    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = Some(capacity);
        self
    }

    /// Builds the `FeedConfig`.
    #[must_use]
    pub fn build(self) -> FeedConfig {
        FeedConfig {
            endpoint: self.endpoint.unwrap_or_else(default_endpoint),
            connect_timeout_ms: self
                .connect_timeout_ms
                .unwrap_or_else(default_connect_timeout_ms),
            max_reconnect_attempts: self
                .max_reconnect_attempts
                .unwrap_or_else(default_max_reconnect_attempts),
            reconnect_delay_ms: self
                .reconnect_delay_ms
                .unwrap_or_else(default_reconnect_delay_ms),
            refresh_interval_ms: self
                .refresh_interval_ms
                .unwrap_or_else(default_refresh_interval_ms),
            outbound_capacity: self.outbound_capacity.unwrap_or_else(default_outbound_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.endpoint, "ws://localhost:4000/");
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.reconnect_delay_ms, 1_000);
        assert_eq!(config.refresh_interval_ms, 5_000);
    }

    #[test]
    fn test_builder() {
        let config = FeedConfig::builder()
            .endpoint("ws://feed.example:4000")
            .connect_timeout(Duration::from_secs(15))
            .max_reconnect_attempts(3)
            .reconnect_delay(Duration::from_millis(250))
            .build();

        assert_eq!(config.endpoint, "ws://feed.example:4000");
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.max_reconnect_attempts, 3);
        assert_eq!(config.reconnect_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_delay_is_fixed() {
        // One knob, one delay; nothing grows with the attempt number.
        let config = FeedConfig::default();
        assert_eq!(config.reconnect_delay(), Duration::from_millis(1_000));
    }

    #[test]
    fn test_should_retry_bounded() {
        let config = FeedConfig::builder().max_reconnect_attempts(3).build();
        assert!(config.should_retry(1));
        assert!(config.should_retry(3));
        assert!(!config.should_retry(4));
    }

    #[test]
    fn test_should_retry_unlimited() {
        let config = FeedConfig::builder().max_reconnect_attempts(0).build();
        assert!(config.should_retry(1_000));
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: FeedConfig = serde_json::from_str(r#"{"endpoint":"ws://x:1"}"#).unwrap();
        assert_eq!(config.endpoint, "ws://x:1");
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.outbound_capacity, 64);
    }
}
