//! Socket layer of the gomoku server.
//!
//! Everything above this crate sees a connection as a byte pipe with an
//! id and the request target it was opened with; the router reads the
//! target to tell lobby traffic from a room's match traffic.
//!
//! # Feature Flags
//!
//! - `websocket` (default): [`WebSocketTransport`] on `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Identifies one accepted socket for its whole life.
///
/// A participant who reconnects keeps their `ParticipantId` but gets a
/// new `ConnectionId`, which is how a room tells the live socket from a
/// stale one that is still closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Source of incoming client sockets.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client and completes its handshake.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops taking new clients. Open connections are left alone.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// One client socket carrying encoded lobby or match messages.
///
/// A room's writer task calls [`send`](Connection::send) while the
/// handler is parked in [`recv`](Connection::recv) on the same
/// connection, so neither may hold the other up.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Next message from the client, or `Ok(None)` once it has closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    /// Path and query the client connected with, e.g.
    /// `/room/ws/3?userId=alice`.
    fn request_target(&self) -> &str;
}
