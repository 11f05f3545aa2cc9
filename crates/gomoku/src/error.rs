//! Unified error type for the gomoku server.

use gomoku_protocol::ProtocolError;
use gomoku_room::RoomError;
use gomoku_session::SessionError;
use gomoku_transport::TransportError;

/// Top-level error that wraps every layer's error.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GomokuError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (routing, identity).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (full, not found, not a participant).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use gomoku_protocol::{ParticipantId, RoomId};

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Handshake("bad upgrade".into());
        let gomoku_err: GomokuError = err.into();
        assert!(matches!(gomoku_err, GomokuError::Transport(_)));
        assert!(gomoku_err.to_string().contains("bad upgrade"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let gomoku_err: GomokuError = err.into();
        assert!(matches!(gomoku_err, GomokuError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let gomoku_err: GomokuError = err.into();
        assert!(matches!(gomoku_err, GomokuError::Session(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotParticipant(ParticipantId::from("eve"), RoomId(1));
        let gomoku_err: GomokuError = err.into();
        assert!(matches!(gomoku_err, GomokuError::Room(_)));
        assert_eq!(gomoku_err.to_string(), "participant eve is not in room room-1");
    }
}
