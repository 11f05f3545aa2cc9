//! `GomokuServer` builder and accept loop.
//!
//! This is the entry point for running a gomoku server. It ties together
//! all the layers: transport → protocol → session → room.

use std::sync::Arc;

use gomoku_protocol::{Codec, JsonCodec};
use gomoku_room::{RoomConfig, RoomRegistry};
use gomoku_session::Authenticator;
use gomoku_transport::{Transport, WebSocketTransport};

use crate::GomokuError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry does its own locking.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) rooms: RoomRegistry,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a gomoku server.
///
/// # Example
///
/// ```rust,no_run
/// use gomoku::prelude::*;
///
/// # async fn run() -> Result<(), GomokuError> {
/// let server = GomokuServer::builder()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig {
///         disconnect_policy: DisconnectPolicy::Abandon,
///         ..RoomConfig::default()
///     })
///     .build(TrustedAuthenticator)
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GomokuServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl GomokuServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the policies every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and builds the server with the given
    /// authenticator.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, which is what the
    /// browser client speaks.
    pub async fn build<A: Authenticator>(
        self,
        auth: A,
    ) -> Result<GomokuServer<A, JsonCodec>, GomokuError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: RoomRegistry::new(self.room_config),
            auth,
            codec: JsonCodec,
        });

        Ok(GomokuServer { transport, state })
    }
}

impl Default for GomokuServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound gomoku server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GomokuServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
}

impl GomokuServer<gomoku_session::TrustedAuthenticator, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GomokuServerBuilder {
        GomokuServerBuilder::new()
    }
}

impl<A, C> GomokuServer<A, C>
where
    A: Authenticator,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), GomokuError> {
        tracing::info!(addr = ?self.local_addr().ok(), "gomoku server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
