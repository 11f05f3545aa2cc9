//! Per-connection handler: routing, identity, and the two channels.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Parse the request target → lobby or match channel, `userId` claim
//!   2. Authenticate the claim → `Identity`
//!   3. Lobby: answer requests one by one until the client leaves
//!   4. Match: register with the room, then forward decoded actions to it
//!      while a writer task drains the room's views onto the socket

use std::sync::Arc;

use gomoku_protocol::{
    ClientAction, Codec, Color, LobbyErrorReason, LobbyRequest, LobbyResponse, ParticipantId,
    RoomId, ServerView, WireMessage,
};
use gomoku_room::{Departed, RoomError};
use gomoku_session::{Authenticator, ConnectRequest, Identity, Route};
use gomoku_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GomokuError;
use crate::server::ServerState;

/// Drop guard that reports a match connection as closed when its handler
/// exits, including by panic. `Drop` is synchronous, so the disconnect
/// runs on a spawned task.
struct MatchGuard<A: Authenticator, C: Codec> {
    room_id: RoomId,
    participant: ParticipantId,
    connection: ConnectionId,
    state: Arc<ServerState<A, C>>,
}

impl<A: Authenticator, C: Codec> Drop for MatchGuard<A, C> {
    fn drop(&mut self) {
        let room_id = self.room_id;
        let participant = self.participant.clone();
        let connection = self.connection;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            match state.rooms.disconnect(room_id, participant, connection).await {
                Ok(Departed::Stale) | Err(RoomError::NotFound(_)) => {}
                Ok(departed) => {
                    tracing::debug!(%room_id, %connection, ?departed, "match connection closed");
                }
                Err(e) => {
                    tracing::warn!(%room_id, %connection, error = %e, "disconnect failed");
                }
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, C>>,
) -> Result<(), GomokuError>
where
    A: Authenticator,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, request = conn.request_target(), "handling new connection");

    let request = match ConnectRequest::parse(conn.request_target()) {
        Ok(request) => request,
        Err(e) => {
            reject_match(&conn, &state.codec, &e.to_string()).await;
            return Err(e.into());
        }
    };

    let identity = match state.auth.authenticate(&request.user_id).await {
        Ok(identity) => identity,
        Err(e) => {
            match request.route {
                Route::Lobby => reject_lobby(&conn, &state.codec, &e.to_string()).await,
                Route::Match(_) => reject_match(&conn, &state.codec, &e.to_string()).await,
            }
            return Err(e.into());
        }
    };

    tracing::info!(%conn_id, participant = %identity.id, route = ?request.route, "participant connected");

    match request.route {
        Route::Lobby => run_lobby(&conn, &state, &identity).await,
        Route::Match(room_id) => run_match(Arc::new(conn), state, identity, room_id).await,
    }
}

// ---------------------------------------------------------------------------
// Lobby channel
// ---------------------------------------------------------------------------

async fn run_lobby<A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<A, C>>,
    identity: &Identity,
) -> Result<(), GomokuError>
where
    A: Authenticator,
    C: Codec,
{
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(participant = %identity.id, "lobby connection closed");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let response = match state.codec.decode::<LobbyRequest>(&data) {
            Ok(request) => handle_lobby_request(state, identity, request).await,
            Err(e) => {
                tracing::debug!(participant = %identity.id, error = %e, "bad lobby request");
                LobbyResponse::Error {
                    reason: LobbyErrorReason::BadRequest,
                    message: e.to_string(),
                }
            }
        };

        let bytes = state.codec.encode(&response)?;
        conn.send(&bytes).await?;
    }
}

async fn handle_lobby_request<A, C>(
    state: &Arc<ServerState<A, C>>,
    identity: &Identity,
    request: LobbyRequest,
) -> LobbyResponse
where
    A: Authenticator,
    C: Codec,
{
    match request {
        LobbyRequest::ListRooms => LobbyResponse::RoomList {
            rooms: state.rooms.list().await,
        },
        LobbyRequest::CreateRoom { name } => {
            let room = state.rooms.create(identity, &name).await;
            LobbyResponse::RoomCreated {
                room_id: room.id,
                room_name: room.name,
                player: Color::Black,
            }
        }
        LobbyRequest::JoinRoom { room_id } => match state.rooms.join(room_id, identity).await {
            Ok(()) => LobbyResponse::RoomJoined {
                room_id,
                player: Color::White,
            },
            Err(e) => LobbyResponse::Error {
                reason: e.lobby_reason(),
                message: e.to_string(),
            },
        },
    }
}

// ---------------------------------------------------------------------------
// Match channel
// ---------------------------------------------------------------------------

async fn run_match<A, C>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<A, C>>,
    identity: Identity,
    room_id: RoomId,
) -> Result<(), GomokuError>
where
    A: Authenticator,
    C: Codec,
{
    let conn_id = conn.id();
    let participant = identity.id;

    let (tx, rx) = mpsc::unbounded_channel();
    let registered = match state.rooms.get(room_id).await {
        Ok(handle) => handle
            .connect(participant.clone(), conn_id, tx)
            .await
            .map(|()| handle),
        Err(e) => Err(e),
    };
    let handle = match registered {
        Ok(handle) => handle,
        Err(e) => {
            reject_match(&conn, &state.codec, &e.to_string()).await;
            return Err(e.into());
        }
    };

    // The guard is armed only once registration succeeded.
    let _guard = MatchGuard {
        room_id,
        participant: participant.clone(),
        connection: conn_id,
        state: Arc::clone(&state),
    };
    tokio::spawn(write_views(Arc::clone(&conn), Arc::clone(&state), rx));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%room_id, %participant, %conn_id, "match connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%room_id, %participant, %conn_id, error = %e, "recv error");
                break;
            }
        };

        let msg: WireMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%room_id, %participant, error = %e, "failed to decode message");
                continue;
            }
        };

        let Some(action) = ClientAction::from_wire(&msg) else {
            tracing::debug!(%room_id, %participant, kind = %msg.kind, "ignoring unknown action");
            continue;
        };

        if let Err(e) = handle.perform(participant.clone(), action).await {
            tracing::debug!(%room_id, %participant, error = %e, "room closed under connection");
            break;
        }
    }

    // _guard drops here → the room hears about the disconnect.
    Ok(())
}

/// Drains the views a room addresses to this connection onto the socket.
///
/// The room drops the sending half when this connection is unregistered
/// or replaced by a newer one; the socket is closed then.
async fn write_views<A, C>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<A, C>>,
    mut views: mpsc::UnboundedReceiver<ServerView>,
) where
    A: Authenticator,
    C: Codec,
{
    while let Some(view) = views.recv().await {
        let wire = WireMessage::from(view);
        let bytes = match state.codec.encode(&wire) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(conn_id = %conn.id(), error = %e, "failed to encode view");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::warn!(conn_id = %conn.id(), error = %e, "failed to deliver view");
            break;
        }
    }
    let _ = conn.close().await;
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Sends a single match-channel `error` message and closes.
async fn reject_match(conn: &WebSocketConnection, codec: &impl Codec, message: &str) {
    let view = ServerView::Error {
        message: message.to_string(),
    };
    send_and_close(conn, codec, &WireMessage::from(view)).await;
}

/// Sends a single lobby `error` response and closes.
async fn reject_lobby(conn: &WebSocketConnection, codec: &impl Codec, message: &str) {
    let response = LobbyResponse::Error {
        reason: LobbyErrorReason::BadRequest,
        message: message.to_string(),
    };
    send_and_close(conn, codec, &response).await;
}

async fn send_and_close<T: serde::Serialize>(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    message: &T,
) {
    tracing::debug!(conn_id = %conn.id(), "rejecting connection");
    match codec.encode(message) {
        Ok(bytes) => {
            if let Err(e) = conn.send(&bytes).await {
                tracing::debug!(conn_id = %conn.id(), error = %e, "failed to send rejection");
            }
        }
        Err(e) => tracing::warn!(conn_id = %conn.id(), error = %e, "failed to encode rejection"),
    }
    let _ = conn.close().await;
}
