//! Feed connection state machine.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Observable connection state of a feed.
///
/// Transitions: `Disconnected → Connecting → Connected`;
/// `Connected → Reconnecting` on transport loss; `Reconnecting → Connected`
/// on success; `Reconnecting → Failed` once the retry budget is exhausted.
/// `Failed` is terminal until a fresh acquisition restarts the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedState {
    /// No transport; nothing in progress.
    Disconnected,
    /// First connection attempt in progress.
    Connecting,
    /// Live transport established.
    Connected,
    /// Transport lost; retrying within the budget.
    Reconnecting,
    /// Retry budget exhausted; terminal until re-acquired.
    Failed,
}

impl FeedState {
    /// Returns true if the connection is live.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true if a connection attempt is in progress.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Connecting | Self::Reconnecting)
    }

    /// Returns true if the retry budget has been exhausted.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl std::fmt::Display for FeedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Reconnecting => write!(f, "Reconnecting"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Internal mutable state for a shared feed connection.
#[derive(Debug)]
pub(crate) struct InternalState {
    /// Current connection state.
    pub state: FeedState,
    /// Failed attempts in the current outage.
    pub reconnect_attempts: u32,
    /// Last successful connection time.
    pub last_connected: Option<Instant>,
    /// Last inbound event time.
    pub last_event: Option<Instant>,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            state: FeedState::Disconnected,
            reconnect_attempts: 0,
            last_connected: None,
            last_event: None,
        }
    }
}

impl InternalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the cycle for a fresh acquisition.
    pub fn mark_connecting(&mut self) {
        self.state = FeedState::Connecting;
        self.reconnect_attempts = 0;
    }

    /// Marks the connection as established; resets the attempt counter.
    pub fn mark_connected(&mut self) {
        self.state = FeedState::Connected;
        self.reconnect_attempts = 0;
        self.last_connected = Some(Instant::now());
    }

    /// Records a failed attempt or lost transport.
    pub fn mark_reconnecting(&mut self) {
        self.state = FeedState::Reconnecting;
        self.reconnect_attempts += 1;
    }

    /// Marks the retry budget as exhausted.
    pub fn mark_failed(&mut self) {
        self.state = FeedState::Failed;
    }

    /// Marks an intentional teardown.
    pub fn mark_disconnected(&mut self) {
        self.state = FeedState::Disconnected;
    }

    /// Records that an inbound event arrived.
    pub fn record_event(&mut self) {
        self.last_event = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(FeedState::Disconnected.to_string(), "Disconnected");
        assert_eq!(FeedState::Reconnecting.to_string(), "Reconnecting");
        assert_eq!(FeedState::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_state_predicates() {
        assert!(FeedState::Connected.is_connected());
        assert!(!FeedState::Reconnecting.is_connected());

        assert!(FeedState::Connecting.is_transitioning());
        assert!(FeedState::Reconnecting.is_transitioning());
        assert!(!FeedState::Failed.is_transitioning());

        assert!(FeedState::Failed.is_failed());
        assert!(!FeedState::Disconnected.is_failed());
    }

    #[test]
    fn test_transitions() {
        let mut state = InternalState::new();
        assert_eq!(state.state, FeedState::Disconnected);

        state.mark_connecting();
        assert_eq!(state.state, FeedState::Connecting);

        state.mark_connected();
        assert_eq!(state.state, FeedState::Connected);
        assert!(state.last_connected.is_some());

        state.mark_reconnecting();
        state.mark_reconnecting();
        assert_eq!(state.state, FeedState::Reconnecting);
        assert_eq!(state.reconnect_attempts, 2);

        state.mark_connected();
        assert_eq!(state.reconnect_attempts, 0);

        state.mark_failed();
        assert_eq!(state.state, FeedState::Failed);

        state.mark_connecting();
        assert_eq!(state.state, FeedState::Connecting);
        assert_eq!(state.reconnect_attempts, 0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&FeedState::Reconnecting).unwrap();
        let parsed: FeedState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FeedState::Reconnecting);
    }
}
