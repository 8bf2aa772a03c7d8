//! # Tally Feed
//!
//! Connection manager for the live election feed.
//!
//! One shared WebSocket-style transport per endpoint, with:
//! - Deduplicated acquisition and reference-counted teardown
//! - A bounded reconnection policy (fixed attempt budget, fixed delay)
//! - Named-event subscribe/unsubscribe and fire-and-forget emit
//! - Automatic snapshot re-requests on every (re)connection
//!
//! Consumers observe connectivity through the [`state::FeedState`] watch
//! channel; connection failures are never surfaced through the subscribe or
//! emit contracts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Feed connection configuration
pub mod config;

/// Named-event envelope codec and event names
pub mod event;

/// Connection manager and handles
pub mod manager;

/// Connection state machine
pub mod state;

/// Scripted in-memory transport for tests
pub mod testing;

/// Transport seam and the WebSocket implementation
pub mod transport;

pub use config::FeedConfig;
pub use event::EventEnvelope;
pub use manager::{EventHandler, FeedHandle, FeedManager, SubscriptionId};
pub use state::FeedState;
