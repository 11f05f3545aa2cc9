//! # Gomoku
//!
//! A server for two-player five-in-a-row matches over WebSockets.
//!
//! Clients open a lobby channel to list, create and join rooms, then a
//! match channel per room to ready up and play. The server owns every
//! room's state; clients only send actions and render the views they get
//! back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gomoku::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GomokuError> {
//!     let server = GomokuServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .build(TrustedAuthenticator)
//!         .await?;
//!     server.run().await
//! }
//! ```
//!
//! ## Channels
//!
//! | Path | Messages |
//! |---|---|
//! | `/lobby?userId=<id>` | [`LobbyRequest`](prelude::LobbyRequest) / [`LobbyResponse`](prelude::LobbyResponse) |
//! | `/room/ws/<roomId>?userId=<id>` | [`WireMessage`](prelude::WireMessage) both ways |

mod error;
mod handler;
mod server;

pub use error::GomokuError;
pub use server::{GomokuServer, GomokuServerBuilder};

/// Everything needed to run a server or write a client against it.
pub mod prelude {
    pub use crate::{GomokuError, GomokuServer, GomokuServerBuilder};
    pub use gomoku_protocol::{
        BOARD_SIZE, ClientAction, Codec, Color, JsonCodec, LobbyErrorReason, LobbyRequest,
        LobbyResponse, MatchId, ParticipantId, RoomId, RoomStatus, RoomSummary, ServerView,
        WireMessage,
    };
    pub use gomoku_room::{DisconnectPolicy, ResetPolicy, RoomConfig};
    pub use gomoku_session::{Authenticator, Identity, SessionError, TrustedAuthenticator};
}
