//! Shared feed connection management.
//!
//! `FeedManager` hands out reference-counted handles to one shared
//! connection per endpoint. All consumer interaction goes through the
//! handle: subscribe/unsubscribe for inbound events, fire-and-forget emit
//! for outbound ones, and a watch channel for connectivity.
//!
//! A single task per connection owns the transport and `select!`s over
//! outbound messages, inbound frames, and shutdown, so inbound dispatch is
//! one logical thread of execution and handlers run in arrival order.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::config::FeedConfig;
use crate::event::EventEnvelope;
use crate::state::{FeedState, InternalState};
use crate::transport::{Frame, Transport, WsTransport};

/// Handler invoked with the payload of each matching inbound event.
pub type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Identifier of one registered subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generates a new unique subscription id.
    #[must_use]
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the inner id value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct SubEntry {
    id: SubscriptionId,
    snapshot_request: Option<String>,
    handler: EventHandler,
}

#[derive(Default)]
struct SubscriptionTable {
    by_event: HashMap<String, Vec<SubEntry>>,
}

impl SubscriptionTable {
    fn insert(
        &mut self,
        event: &str,
        snapshot_request: Option<&str>,
        handler: EventHandler,
    ) -> SubscriptionId {
        let id = SubscriptionId::generate();
        self.by_event
            .entry(event.to_string())
            .or_default()
            .push(SubEntry {
                id,
                snapshot_request: snapshot_request.map(str::to_string),
                handler,
            });
        id
    }

    fn remove(&mut self, event: &str, id: SubscriptionId) {
        if let Some(entries) = self.by_event.get_mut(event) {
            entries.retain(|entry| entry.id != id);
            if entries.is_empty() {
                self.by_event.remove(event);
            }
        }
    }

    fn handlers_for(&self, event: &str) -> Vec<EventHandler> {
        self.by_event
            .get(event)
            .map(|entries| entries.iter().map(|e| Arc::clone(&e.handler)).collect())
            .unwrap_or_default()
    }

    /// Distinct snapshot-request events across all registered families.
    fn snapshot_requests(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .by_event
            .values()
            .flatten()
            .filter_map(|entry| entry.snapshot_request.clone())
            .collect();
        set.into_iter().collect()
    }
}

/// State shared between handles and the connection task.
struct SharedFeed {
    endpoint: String,
    config: FeedConfig,
    transport: Arc<dyn Transport>,
    internal: RwLock<InternalState>,
    state_tx: watch::Sender<FeedState>,
    state_rx: watch::Receiver<FeedState>,
    subs: RwLock<SubscriptionTable>,
    outbound: RwLock<Option<mpsc::Sender<EventEnvelope>>>,
    shutdown: RwLock<Option<mpsc::Sender<()>>>,
    refcount: AtomicUsize,
}

impl SharedFeed {
    fn new(endpoint: &str, config: FeedConfig, transport: Arc<dyn Transport>) -> Arc<Self> {
        let (state_tx, state_rx) = watch::channel(FeedState::Disconnected);
        Arc::new(Self {
            endpoint: endpoint.to_string(),
            config,
            transport,
            internal: RwLock::new(InternalState::new()),
            state_tx,
            state_rx,
            subs: RwLock::new(SubscriptionTable::default()),
            outbound: RwLock::new(None),
            shutdown: RwLock::new(None),
            refcount: AtomicUsize::new(0),
        })
    }

    fn state(&self) -> FeedState {
        self.internal.read().state
    }

    /// Starts the connection task if nothing is running: on first
    /// acquisition, or to restart a `Failed` connection.
    fn ensure_running(shared: &Arc<Self>) {
        {
            let mut internal = shared.internal.write();
            match internal.state {
                FeedState::Disconnected | FeedState::Failed => internal.mark_connecting(),
                _ => return,
            }
        }
        shared.state_tx.send_replace(FeedState::Connecting);

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        *shared.shutdown.write() = Some(shutdown_tx);
        tokio::spawn(Self::run(Arc::clone(shared), shutdown_rx));
    }

    /// Asks the connection task to stop; marks the feed torn down if no
    /// task is alive to process the request.
    fn begin_shutdown(&self) {
        let sender = self.shutdown.write().take();
        let delivered = sender.is_some_and(|tx| tx.try_send(()).is_ok());
        if !delivered {
            self.finish_disconnected();
        }
    }

    fn finish_disconnected(&self) {
        *self.outbound.write() = None;
        self.internal.write().mark_disconnected();
        self.state_tx.send_replace(FeedState::Disconnected);
    }

    /// Decodes a text frame and invokes every handler registered for its
    /// event, in registration order.
    fn dispatch(&self, text: &str) {
        self.internal.write().record_event();

        let envelope = match EventEnvelope::decode(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "discarding undecodable frame");
                return;
            }
        };

        let handlers = self.subs.read().handlers_for(&envelope.event);
        if handlers.is_empty() {
            debug!(event = %envelope.event, "no subscribers for event");
            return;
        }
        for handler in handlers {
            handler(envelope.data.clone());
        }
    }

    /// Connection task: dial, serve, reconnect within budget, fail.
    async fn run(shared: Arc<SharedFeed>, mut shutdown_rx: mpsc::Receiver<()>) {
        loop {
            let dial = shared
                .transport
                .dial(&shared.endpoint, shared.config.connect_timeout());
            let dialed = tokio::select! {
                _ = shutdown_rx.recv() => {
                    shared.finish_disconnected();
                    return;
                }
                result = dial => result,
            };

            match dialed {
                Ok((mut sink, mut source)) => {
                    let (out_tx, mut out_rx) =
                        mpsc::channel::<EventEnvelope>(shared.config.outbound_capacity);
                    *shared.outbound.write() = Some(out_tx);
                    shared.internal.write().mark_connected();

                    // Fresh snapshots for every registered event family, so
                    // subscribers never special-case the reconnect path.
                    let snapshot_requests = shared.subs.read().snapshot_requests();
                    for event in snapshot_requests {
                        match EventEnvelope::request(&event).encode() {
                            Ok(text) => {
                                if let Err(e) = sink.send_text(text).await {
                                    warn!(event = %event, error = %e, "snapshot request failed");
                                }
                            }
                            Err(e) => warn!(event = %event, error = %e, "snapshot request failed"),
                        }
                    }

                    shared.state_tx.send_replace(FeedState::Connected);
                    info!(endpoint = %shared.endpoint, "feed connected");

                    let lost_reason = loop {
                        tokio::select! {
                            _ = shutdown_rx.recv() => {
                                sink.close().await;
                                shared.finish_disconnected();
                                info!(endpoint = %shared.endpoint, "feed disconnected");
                                return;
                            }
                            Some(envelope) = out_rx.recv() => {
                                match envelope.encode() {
                                    Ok(text) => {
                                        if let Err(e) = sink.send_text(text).await {
                                            break e.to_string();
                                        }
                                    }
                                    Err(e) => warn!(error = %e, "dropping unencodable outbound event"),
                                }
                            }
                            frame = source.next_frame() => match frame {
                                None => break "stream ended".to_string(),
                                Some(Err(e)) => break e.to_string(),
                                Some(Ok(Frame::Text(text))) => shared.dispatch(&text),
                                Some(Ok(Frame::Ping(payload))) => {
                                    if let Err(e) = sink.send_pong(payload).await {
                                        warn!(error = %e, "pong failed");
                                    }
                                }
                                Some(Ok(Frame::Pong(_))) => {}
                                Some(Ok(Frame::Closed(reason))) => {
                                    break reason.unwrap_or_else(|| "server closed connection".to_string());
                                }
                            }
                        }
                    };

                    *shared.outbound.write() = None;
                    shared.internal.write().mark_reconnecting();
                    shared.state_tx.send_replace(FeedState::Reconnecting);
                    warn!(endpoint = %shared.endpoint, reason = %lost_reason, "feed connection lost");
                }
                Err(e) => {
                    shared.internal.write().mark_reconnecting();
                    shared.state_tx.send_replace(FeedState::Reconnecting);
                    warn!(endpoint = %shared.endpoint, error = %e, "feed connect failed");
                }
            }

            let attempts = shared.internal.read().reconnect_attempts;
            if !shared.config.should_retry(attempts) {
                error!(
                    endpoint = %shared.endpoint,
                    attempts,
                    "retry budget exhausted, feed failed"
                );
                shared.internal.write().mark_failed();
                shared.state_tx.send_replace(FeedState::Failed);
                return;
            }

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    shared.finish_disconnected();
                    return;
                }
                () = tokio::time::sleep(shared.config.reconnect_delay()) => {}
            }
        }
    }
}

/// Manages one shared feed connection per endpoint.
pub struct FeedManager {
    config: FeedConfig,
    transport: Arc<dyn Transport>,
    connections: Arc<DashMap<String, Arc<SharedFeed>>>,
}

impl FeedManager {
    /// Creates a manager using the production WebSocket transport.
    #[must_use]
    pub fn new(config: FeedConfig) -> Self {
        Self::with_transport(config, Arc::new(WsTransport))
    }

    /// Creates a manager with a custom transport.
    #[must_use]
    pub fn with_transport(config: FeedConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Returns the manager's configuration.
    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Acquires a handle to the shared connection for `endpoint`, creating
    /// it if none exists. Repeated calls return handles to the same logical
    /// connection; a call against a `Failed` connection restarts its cycle.
    pub fn acquire(&self, endpoint: &str) -> FeedHandle {
        let shared = self
            .connections
            .entry(endpoint.to_string())
            .or_insert_with(|| {
                SharedFeed::new(endpoint, self.config.clone(), Arc::clone(&self.transport))
            })
            .clone();

        shared.refcount.fetch_add(1, Ordering::AcqRel);
        SharedFeed::ensure_running(&shared);

        FeedHandle {
            shared,
            connections: Arc::clone(&self.connections),
        }
    }

    /// Returns the number of live shared connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

/// Reference-counted handle to one shared feed connection.
pub struct FeedHandle {
    shared: Arc<SharedFeed>,
    connections: Arc<DashMap<String, Arc<SharedFeed>>>,
}

impl FeedHandle {
    /// Returns the feed endpoint this handle is bound to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.shared.endpoint
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.shared.state()
    }

    /// Returns true if the connection is live.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Returns the failed-attempt count of the current outage.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.internal.read().reconnect_attempts
    }

    /// Returns how long the current connection has been up, if it is up.
    #[must_use]
    pub fn connected_for(&self) -> Option<std::time::Duration> {
        let internal = self.shared.internal.read();
        internal
            .state
            .is_connected()
            .then(|| internal.last_connected.map(|at| at.elapsed()))
            .flatten()
    }

    /// Returns the time since the last inbound event, if any arrived.
    #[must_use]
    pub fn idle_time(&self) -> Option<std::time::Duration> {
        self.shared.internal.read().last_event.map(|at| at.elapsed())
    }

    /// Returns a watch receiver over connection-state transitions.
    #[must_use]
    pub fn state_changes(&self) -> watch::Receiver<FeedState> {
        self.shared.state_rx.clone()
    }

    /// Registers a handler for an inbound event.
    pub fn subscribe(&self, event: &str, handler: EventHandler) -> SubscriptionId {
        self.subscribe_with_resync(event, None, handler)
    }

    /// Registers a handler for an inbound event, declaring the outbound
    /// request that refreshes its event family. The request is emitted on
    /// every transition into `Connected`, and immediately if the
    /// connection is already live.
    pub fn subscribe_with_resync(
        &self,
        event: &str,
        snapshot_request: Option<&str>,
        handler: EventHandler,
    ) -> SubscriptionId {
        let id = self
            .shared
            .subs
            .write()
            .insert(event, snapshot_request, handler);

        if let Some(request) = snapshot_request {
            if self.is_connected() {
                self.emit(request, Value::Null);
            }
        }
        id
    }

    /// Removes a subscription. Safe to call repeatedly or with an id that
    /// was never registered.
    pub fn unsubscribe(&self, event: &str, id: SubscriptionId) {
        self.shared.subs.write().remove(event, id);
    }

    /// Sends an event if the connection is live. Outgoing messages are
    /// advisory; when the feed is not connected the payload is dropped with
    /// a warning rather than queued. Returns whether the event was queued
    /// for sending.
    pub fn emit(&self, event: &str, data: Value) -> bool {
        if !self.is_connected() {
            warn!(
                event = %event,
                state = %self.state(),
                "dropping outbound event while not connected"
            );
            return false;
        }

        let outbound = self.shared.outbound.read();
        let Some(tx) = outbound.as_ref() else {
            warn!(event = %event, "dropping outbound event, no live transport");
            return false;
        };
        match tx.try_send(EventEnvelope::new(event, data)) {
            Ok(()) => true,
            Err(_) => {
                warn!(event = %event, "outbound queue full, dropping event");
                false
            }
        }
    }

    /// Releases this handle. Equivalent to dropping it: the transport is
    /// torn down when the last handle goes away.
    pub fn release(self) {
        drop(self);
    }
}

impl Clone for FeedHandle {
    fn clone(&self) -> Self {
        self.shared.refcount.fetch_add(1, Ordering::AcqRel);
        Self {
            shared: Arc::clone(&self.shared),
            connections: Arc::clone(&self.connections),
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if self.shared.refcount.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.begin_shutdown();
            self.connections
                .remove_if(&self.shared.endpoint, |_, v| Arc::ptr_eq(v, &self.shared));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::events;
    use crate::testing::ScriptedTransport;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    fn test_config() -> FeedConfig {
        FeedConfig::builder()
            .endpoint("ws://test/")
            .max_reconnect_attempts(5)
            .reconnect_delay(Duration::from_millis(100))
            .build()
    }

    async fn wait_for_state(rx: &mut watch::Receiver<FeedState>, target: FeedState) {
        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                if *rx.borrow_and_update() == target {
                    return;
                }
                rx.changed().await.expect("state channel closed");
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {target}"));
    }

    /// Lets the connection task drain pending frames.
    async fn drain() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_shares_one_connection() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let a = manager.acquire("ws://test/");
        let b = manager.acquire("ws://test/");

        assert_eq!(manager.connection_count(), 1);

        let mut rx = a.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;
        assert!(a.is_connected());
        assert!(b.is_connected());
        assert_eq!(transport.dial_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_in_arrival_order() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");

        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        handle.subscribe(
            events::GLOBAL_VOTE_SUMMARY,
            Arc::new(move |data| sink.lock().push(data)),
        );

        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        let link = transport.link(0).unwrap();
        link.push_event(events::GLOBAL_VOTE_SUMMARY, json!({"totalVotes": 1}));
        link.push_event(events::GLOBAL_VOTE_SUMMARY, json!({"totalVotes": 2}));
        drain().await;

        let got = received.lock().clone();
        assert_eq!(got, vec![json!({"totalVotes": 1}), json!({"totalVotes": 2})]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_frames_are_discarded() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");

        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        handle.subscribe(events::LOCATION, Arc::new(move |data| sink.lock().push(data)));

        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        let link = transport.link(0).unwrap();
        link.push_text("not json at all");
        link.push_event(events::LOCATION, json!({"locationId": 1, "totalVotes": 5}));
        drain().await;

        assert_eq!(received.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_is_noop_safe() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");

        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let id = handle.subscribe(events::LOCATION, Arc::new(move |data| sink.lock().push(data)));

        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        handle.unsubscribe(events::LOCATION, id);
        handle.unsubscribe(events::LOCATION, id);
        handle.unsubscribe("never registered", SubscriptionId::generate());

        let link = transport.link(0).unwrap();
        link.push_event(events::LOCATION, json!({"locationId": 1, "totalVotes": 5}));
        drain().await;

        assert!(received.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_while_connected_reaches_the_wire() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");
        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        assert!(handle.emit(events::DEPARTMENT_CLICK, json!(2)));
        drain().await;

        let link = transport.link(0).unwrap();
        assert!(link
            .sent_events()
            .contains(&events::DEPARTMENT_CLICK.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_while_disconnected_is_dropped() {
        let transport = Arc::new(ScriptedTransport::new());
        // Script refuses; the connection never comes up.
        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");

        assert!(!handle.emit(events::GET_GLOBAL_SUMMARY, Value::Null));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_resyncs_exactly_once_per_connection() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();
        transport.accept();
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");
        // Registered before the first connect; no frames are lost in between.
        handle.subscribe_with_resync(
            events::GLOBAL_VOTE_SUMMARY,
            Some(events::GET_GLOBAL_SUMMARY),
            Arc::new(|_| {}),
        );

        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        for round in 0..2 {
            let link = transport.link(round).unwrap();
            assert_eq!(
                link.sent_events(),
                vec![events::GET_GLOBAL_SUMMARY.to_string()],
                "round {round}"
            );

            link.close();
            wait_for_state(&mut rx, FeedState::Reconnecting).await;
            wait_for_state(&mut rx, FeedState::Connected).await;
        }

        let link = transport.link(2).unwrap();
        assert_eq!(
            link.sent_events(),
            vec![events::GET_GLOBAL_SUMMARY.to_string()]
        );
        assert_eq!(transport.dial_count(), 3);
        assert_eq!(handle.reconnect_attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_after_connect_requests_snapshot_immediately() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let handle = manager.acquire("ws://test/");
        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        handle.subscribe_with_resync(
            events::GLOBAL_VOTE_SUMMARY,
            Some(events::GET_GLOBAL_SUMMARY),
            Arc::new(|_| {}),
        );
        drain().await;

        let link = transport.link(0).unwrap();
        assert_eq!(
            link.sent_events(),
            vec![events::GET_GLOBAL_SUMMARY.to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_is_terminal_until_reacquire() {
        let transport = Arc::new(ScriptedTransport::new());
        // Empty script: every dial refused.
        let config = FeedConfig::builder()
            .max_reconnect_attempts(2)
            .reconnect_delay(Duration::from_millis(50))
            .build();
        let manager = FeedManager::with_transport(config, transport.clone());

        let handle = manager.acquire("ws://test/");
        let mut rx = handle.state_changes();
        wait_for_state(&mut rx, FeedState::Failed).await;

        // Initial dial plus two retries.
        assert_eq!(transport.dial_count(), 3);

        // Failed is sticky and emit stays a silent drop.
        assert!(!handle.emit(events::GET_GLOBAL_SUMMARY, Value::Null));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.state(), FeedState::Failed);

        // A fresh acquisition restarts the cycle.
        transport.accept();
        let handle2 = manager.acquire("ws://test/");
        let mut rx2 = handle2.state_changes();
        wait_for_state(&mut rx2, FeedState::Connected).await;
        assert_eq!(transport.dial_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_release_tears_down_transport() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.accept();

        let manager = FeedManager::with_transport(test_config(), transport.clone());
        let a = manager.acquire("ws://test/");
        let b = manager.acquire("ws://test/");

        let mut rx = a.state_changes();
        wait_for_state(&mut rx, FeedState::Connected).await;

        drop(b);
        drain().await;
        assert_eq!(manager.connection_count(), 1);
        assert!(a.is_connected());

        a.release();
        wait_for_state(&mut rx, FeedState::Disconnected).await;
        assert_eq!(manager.connection_count(), 0);
    }
}
