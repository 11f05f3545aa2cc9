//! Rooms for the gomoku server.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! room's participants, lobby status, and match, and applies commands one
//! at a time.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates, lists, and destroys rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`Room`] — the synchronous lobby/match state machine an actor drives
//! - [`RoomConfig`] — disconnect and reset policies

mod config;
mod coordinator;
mod error;
mod hub;
mod manager;
mod room;

pub use config::{DisconnectPolicy, ROOM_CAPACITY, ResetPolicy, RoomConfig};
pub use coordinator::{Departure, Outcome, Participant, Recipient, Room, Views};
pub use error::{Decline, RoomError};
pub use hub::ParticipantSender;
pub use manager::RoomRegistry;
pub use room::{Departed, RoomHandle, RoomInfo};

use hub::ConnectionHub;
