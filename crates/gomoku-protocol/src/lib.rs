//! Wire protocol for the gomoku server.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ParticipantId`], [`RoomId`], [`Color`], [`RoomStatus`]) —
//!   identities and enums shared by every layer.
//! - **Match channel** ([`WireMessage`], [`ClientAction`], [`ServerView`]) —
//!   the flat envelope on the wire and the typed variants used internally.
//! - **Lobby channel** ([`LobbyRequest`], [`LobbyResponse`]) — room listing,
//!   creation and joining.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (WireMessage ⇄ ClientAction / ServerView) → Room
//! ```

mod codec;
mod error;
mod lobby;
mod types;
mod wire;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use lobby::{LobbyErrorReason, LobbyRequest, LobbyResponse, RoomSummary};
pub use types::{
    BOARD_SIZE, Color, MatchId, ParticipantId, RoomId, RoomStatus, color_code,
};
pub use wire::{ClientAction, ServerView, WireMessage};
