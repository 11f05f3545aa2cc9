//! Session gateway for the gomoku server.
//!
//! The boundary between an upstream identity provider and the room layer:
//!
//! 1. **Routing** — which channel a connection asked for and who it claims
//!    to be ([`ConnectRequest`]).
//! 2. **Identity** — turning that claim into a verified [`Identity`]
//!    ([`Authenticator`] trait).
//!
//! Credential checking itself lives upstream. Rooms trust whatever
//! identity comes out of this crate.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← receives (participant, room) per connection
//!     ↕
//! Session Layer (this crate)  ← routes and identifies connections
//!     ↕
//! Protocol Layer (below)  ← provides ParticipantId, RoomId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod route;

pub use auth::{Authenticator, Identity, TrustedAuthenticator};
pub use error::SessionError;
pub use route::{ConnectRequest, Route};
