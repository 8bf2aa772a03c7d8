//! Transport seam and the production WebSocket implementation.
//!
//! The manager drives a `Transport` trait rather than a socket directly, so
//! the reconnection policy can be exercised against the scripted transport
//! in [`crate::testing`].

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use tally_core::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// A frame as seen by the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Text payload (a JSON event envelope).
    Text(String),
    /// Transport-level ping; the manager answers with a pong.
    Ping(Vec<u8>),
    /// Transport-level pong.
    Pong(Vec<u8>),
    /// The peer closed the connection.
    Closed(Option<String>),
}

/// Dials a feed endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establishes a connection, returning the send and receive halves.
    async fn dial(
        &self,
        endpoint: &str,
        connect_timeout: Duration,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>), TransportError>;
}

/// Send half of an established connection.
#[async_trait]
pub trait FrameSink: Send {
    /// Sends a text frame.
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Sends a pong in answer to a ping.
    async fn send_pong(&mut self, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Closes the connection.
    async fn close(&mut self);
}

/// Receive half of an established connection.
#[async_trait]
pub trait FrameSource: Send {
    /// Returns the next frame, or `None` once the stream has ended.
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>>;
}

/// Production transport backed by tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

#[async_trait]
impl Transport for WsTransport {
    async fn dial(
        &self,
        endpoint: &str,
        connect_timeout: Duration,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>), TransportError> {
        let (ws_stream, _) = timeout(connect_timeout, connect_async(endpoint))
            .await
            .map_err(|_| TransportError::Timeout {
                timeout_ms: connect_timeout.as_millis() as u64,
            })?
            .map_err(|e| TransportError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        let (sink, source) = ws_stream.split();
        Ok((
            Box::new(WsFrameSink { sink }),
            Box::new(WsFrameSource { source }),
        ))
    }
}

struct WsFrameSink {
    sink: WsSink,
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::Frame {
                reason: e.to_string(),
            })
    }

    async fn send_pong(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        self.sink
            .send(Message::Pong(payload))
            .await
            .map_err(|e| TransportError::Frame {
                reason: e.to_string(),
            })
    }

    async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}

struct WsFrameSource {
    source: WsSource,
}

#[async_trait]
impl FrameSource for WsFrameSource {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        loop {
            match self.source.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(Frame::Text(text))),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(Frame::Text(text))),
                    Err(_) => {
                        debug!("skipping non-utf8 binary frame");
                    }
                },
                Ok(Message::Ping(payload)) => return Some(Ok(Frame::Ping(payload))),
                Ok(Message::Pong(payload)) => return Some(Ok(Frame::Pong(payload))),
                Ok(Message::Close(frame)) => {
                    return Some(Ok(Frame::Closed(frame.map(|f| f.reason.to_string()))));
                }
                Ok(Message::Frame(_)) => {}
                Err(e) => {
                    return Some(Err(TransportError::Frame {
                        reason: e.to_string(),
                    }));
                }
            }
        }
    }
}
