//! The parameterized view synchronizer.
//!
//! One `ViewSync` per displayed aggregate, constructed with the aggregate's
//! event names, a typed decode step, and a reconciliation function. Payload
//! updates are applied in arrival order with no sequence numbers, so a slow
//! snapshot response arriving after a newer push can overwrite it; the feed
//! carries no ordering metadata and this layer does not invent any.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use tally_feed::{EventHandler, FeedHandle, SubscriptionId};

use crate::snapshot::AggregateSnapshot;

struct Cell<T> {
    value: T,
    last_updated_at: Option<DateTime<Utc>>,
}

struct Inner<T> {
    cell: RwLock<Cell<T>>,
    /// Cleared by `stop`; a queued callback that fires afterwards is a no-op.
    active: AtomicBool,
}

type Decode<P> = Arc<dyn Fn(&Value) -> Option<P> + Send + Sync>;
type Validator<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;
type Reconcile<T, P> = Arc<dyn Fn(&mut T, P) + Send + Sync>;

struct Wiring {
    handle: FeedHandle,
    subs: Vec<(String, SubscriptionId)>,
    refresh_task: Option<JoinHandle<()>>,
}

/// Synchronizes one aggregate's view state against the feed.
///
/// `T` is the reconciled state, `P` the typed inbound payload. A payload
/// that fails to decode (or is rejected by the validator) is discarded
/// whole; the previous value stands untouched.
pub struct ViewSync<T, P> {
    events: Vec<String>,
    snapshot_request: Option<String>,
    refresh_interval: Duration,
    decode: Decode<P>,
    validator: Validator<P>,
    reconcile: Reconcile<T, P>,
    inner: Arc<Inner<T>>,
    wiring: Option<Wiring>,
}

impl<T, P> ViewSync<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: serde::de::DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a synchronizer.
    ///
    /// `events` are the inbound event names to listen on;
    /// `snapshot_request` is the outbound event that refreshes this
    /// aggregate's family, re-issued automatically on every reconnection and
    /// on the periodic refresh interval.
    pub fn new<E, S>(
        events: E,
        snapshot_request: Option<&str>,
        initial: T,
        reconcile: impl Fn(&mut T, P) + Send + Sync + 'static,
        refresh_interval: Duration,
    ) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let decode: Decode<P> = Arc::new(|data: &Value| match serde_json::from_value::<P>(
            data.clone(),
        ) {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!(error = %e, "payload failed shape validation");
                None
            }
        });

        Self {
            events: events.into_iter().map(Into::into).collect(),
            snapshot_request: snapshot_request.map(str::to_string),
            refresh_interval,
            decode,
            validator: Arc::new(|_| true),
            reconcile: Arc::new(reconcile),
            inner: Arc::new(Inner {
                cell: RwLock::new(Cell {
                    value: initial,
                    last_updated_at: None,
                }),
                active: AtomicBool::new(true),
            }),
            wiring: None,
        }
    }

    /// Narrows the typed decode with a predicate; payloads it rejects are
    /// discarded like any other invalid payload.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(&P) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Wires the synchronizer to a feed handle: one subscription per event
    /// name, plus the periodic snapshot-request task. Idempotent while
    /// started.
    pub fn start(&mut self, handle: &FeedHandle) {
        if self.wiring.is_some() {
            return;
        }
        self.inner.active.store(true, Ordering::Release);

        let mut subs = Vec::with_capacity(self.events.len());
        for event in &self.events {
            let handler = self.make_handler(event.clone());
            let id = handle.subscribe_with_resync(event, self.snapshot_request.as_deref(), handler);
            subs.push((event.clone(), id));
        }

        let refresh_task = self.snapshot_request.clone().map(|request| {
            let handle = handle.clone();
            let inner = Arc::clone(&self.inner);
            let interval = self.refresh_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                // The subscription itself requests the first snapshot; the
                // ticker only bounds staleness afterwards.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    if !inner.active.load(Ordering::Acquire) {
                        break;
                    }
                    if handle.is_connected() {
                        handle.emit(&request, Value::Null);
                    }
                }
            })
        });

        self.wiring = Some(Wiring {
            handle: handle.clone(),
            subs,
            refresh_task,
        });
    }

    /// Returns the current reconciled snapshot. Pure read.
    #[must_use]
    pub fn snapshot(&self) -> AggregateSnapshot<T> {
        let cell = self.inner.cell.read();
        AggregateSnapshot {
            value: cell.value.clone(),
            last_updated_at: cell.last_updated_at,
            is_live: self
                .wiring
                .as_ref()
                .is_some_and(|w| w.handle.is_connected()),
        }
    }

    /// Validates and reconciles one raw payload.
    pub(crate) fn apply(&self, data: &Value) {
        Self::apply_parts(
            &self.inner,
            &self.decode,
            &self.validator,
            &self.reconcile,
            data,
        );
    }

    fn make_handler(&self, event: String) -> EventHandler {
        let inner = Arc::clone(&self.inner);
        let decode = Arc::clone(&self.decode);
        let validator = Arc::clone(&self.validator);
        let reconcile = Arc::clone(&self.reconcile);
        Arc::new(move |data: Value| {
            if !inner.active.load(Ordering::Acquire) {
                debug!(event = %event, "ignoring event for stopped synchronizer");
                return;
            }
            Self::apply_parts(&inner, &decode, &validator, &reconcile, &data);
        })
    }

    fn apply_parts(
        inner: &Inner<T>,
        decode: &Decode<P>,
        validator: &Validator<P>,
        reconcile: &Reconcile<T, P>,
        data: &Value,
    ) {
        let Some(payload) = decode(data) else {
            return;
        };
        if !validator(&payload) {
            debug!("payload rejected by validator");
            return;
        }
        let mut cell = inner.cell.write();
        reconcile(&mut cell.value, payload);
        cell.last_updated_at = Some(Utc::now());
    }
}

impl<T, P> ViewSync<T, P> {
    /// Unwires the synchronizer. Safe to call at any time, including while a
    /// callback for this synchronizer is already queued; the callback
    /// observes the stop flag and leaves the value untouched.
    pub fn stop(&mut self) {
        let Some(wiring) = self.wiring.take() else {
            return;
        };
        self.inner.active.store(false, Ordering::Release);
        for (event, id) in &wiring.subs {
            wiring.handle.unsubscribe(event, *id);
        }
        if let Some(task) = wiring.refresh_task {
            task.abort();
        }
    }

    /// Returns true while wired to a feed handle.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.wiring.is_some()
    }
}

impl<T, P> Drop for ViewSync<T, P> {
    fn drop(&mut self) {
        self.stop();
    }
}
