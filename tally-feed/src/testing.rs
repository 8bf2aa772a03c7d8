//! Scripted in-memory transport for tests.
//!
//! Lets tests drive the connection manager through connect failures,
//! established links, inbound frames, and server-side closes without a
//! network. Each accepted dial produces a [`ScriptedLink`] probe the test
//! uses to push frames to the client and inspect what the client sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use tally_core::error::TransportError;

use crate::event::EventEnvelope;
use crate::transport::{Frame, FrameSink, FrameSource, Transport};

/// Outcome of the next scripted dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedConnect {
    /// The dial succeeds and produces a link.
    Accept,
    /// The dial is refused.
    Refuse,
}

/// Test probe for one accepted link.
#[derive(Clone)]
pub struct ScriptedLink {
    to_client: mpsc::UnboundedSender<Frame>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLink {
    /// Pushes a text frame to the client. Returns false if the client has
    /// dropped the link.
    pub fn push_text(&self, text: impl Into<String>) -> bool {
        self.to_client.send(Frame::Text(text.into())).is_ok()
    }

    /// Pushes an encoded event envelope to the client.
    pub fn push_event(&self, event: &str, data: serde_json::Value) -> bool {
        let text = EventEnvelope::new(event, data)
            .encode()
            .expect("envelope encodes");
        self.push_text(text)
    }

    /// Simulates a server-side close.
    pub fn close(&self) {
        let _ = self.to_client.send(Frame::Closed(None));
    }

    /// Returns the raw text frames the client sent on this link.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Returns the event names of the envelopes the client sent.
    #[must_use]
    pub fn sent_events(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter_map(|text| EventEnvelope::decode(text).ok())
            .map(|envelope| envelope.event)
            .collect()
    }
}

/// A transport whose dial outcomes are scripted in advance.
///
/// An empty script refuses every dial.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedConnect>>,
    links: Mutex<Vec<ScriptedLink>>,
    dials: AtomicUsize,
}

impl ScriptedTransport {
    /// Creates a transport with an empty (all-refusing) script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next dial to succeed.
    pub fn accept(&self) {
        self.script.lock().push_back(ScriptedConnect::Accept);
    }

    /// Scripts the next dial to be refused.
    pub fn refuse(&self) {
        self.script.lock().push_back(ScriptedConnect::Refuse);
    }

    /// Returns how many dials have been attempted.
    #[must_use]
    pub fn dial_count(&self) -> usize {
        self.dials.load(Ordering::Acquire)
    }

    /// Returns the probe for the nth accepted link.
    #[must_use]
    pub fn link(&self, index: usize) -> Option<ScriptedLink> {
        self.links.lock().get(index).cloned()
    }

    /// Returns how many links have been accepted.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn dial(
        &self,
        _endpoint: &str,
        _connect_timeout: Duration,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>), TransportError> {
        self.dials.fetch_add(1, Ordering::AcqRel);

        match self.script.lock().pop_front() {
            Some(ScriptedConnect::Accept) => {
                let (to_client, from_server) = mpsc::unbounded_channel();
                let sent = Arc::new(Mutex::new(Vec::new()));
                self.links.lock().push(ScriptedLink {
                    to_client,
                    sent: Arc::clone(&sent),
                });
                Ok((
                    Box::new(ScriptedSink { sent }),
                    Box::new(ScriptedSource { rx: from_server }),
                ))
            }
            Some(ScriptedConnect::Refuse) | None => Err(TransportError::ConnectionFailed {
                reason: "scripted refusal".to_string(),
            }),
        }
    }
}

struct ScriptedSink {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl FrameSink for ScriptedSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sent.lock().push(text);
        Ok(())
    }

    async fn send_pong(&mut self, _payload: Vec<u8>) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&mut self) {}
}

struct ScriptedSource {
    rx: mpsc::UnboundedReceiver<Frame>,
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        self.rx.recv().await.map(Ok)
    }
}
