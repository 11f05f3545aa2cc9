//! Error and decline types for the room layer.

use gomoku_board::MoveRejected;
use gomoku_protocol::{LobbyErrorReason, ParticipantId, RoomId};

/// Errors from registry and room-membership operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (or was destroyed when it emptied).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both participant slots are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The identity already occupies a slot in this room.
    #[error("participant {0} already joined room {1}")]
    AlreadyJoined(ParticipantId, RoomId),

    /// The identity holds no slot in this room, so it cannot open a
    /// match channel for it.
    #[error("participant {0} is not in room {1}")]
    NotParticipant(ParticipantId, RoomId),
}

impl RoomError {
    /// The reason code reported on the lobby channel.
    pub fn lobby_reason(&self) -> LobbyErrorReason {
        match self {
            Self::NotFound(_) => LobbyErrorReason::RoomNotFound,
            Self::RoomFull(_) => LobbyErrorReason::RoomFull,
            Self::AlreadyJoined(..) => LobbyErrorReason::AlreadyJoined,
            Self::NotParticipant(..) => LobbyErrorReason::BadRequest,
        }
    }
}

/// A gameplay action the room refused. Declines are ordinary outcomes,
/// not faults: state is unchanged and the connection stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Decline {
    #[error("not a participant in this room")]
    NotParticipant,

    #[error("cannot start game - only the room owner can start")]
    NotOwner,

    #[error("cannot start game - players not ready")]
    NotReady,

    #[error("match in progress")]
    MatchInProgress,

    #[error("no match in progress")]
    NoMatch,

    #[error("not your turn")]
    NotYourTurn,

    #[error("illegal move: {0}")]
    IllegalMove(MoveRejected),

    #[error("only the room owner can reset the match")]
    ResetNotAllowed,
}

impl Decline {
    /// Silent declines produce no `error` message for the requester.
    /// Moves and resets against the wrong state are dropped quietly;
    /// lobby and start refusals are explained.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::NotParticipant | Self::NoMatch | Self::NotYourTurn | Self::IllegalMove(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_reasons() {
        assert_eq!(
            RoomError::NotFound(RoomId(1)).lobby_reason(),
            LobbyErrorReason::RoomNotFound
        );
        assert_eq!(
            RoomError::RoomFull(RoomId(1)).lobby_reason(),
            LobbyErrorReason::RoomFull
        );
        assert_eq!(
            RoomError::AlreadyJoined(ParticipantId::from("a"), RoomId(1)).lobby_reason(),
            LobbyErrorReason::AlreadyJoined
        );
    }

    #[test]
    fn test_move_declines_are_silent_start_declines_are_not() {
        assert!(Decline::NotYourTurn.is_silent());
        assert!(Decline::IllegalMove(MoveRejected::Finished).is_silent());
        assert!(Decline::NoMatch.is_silent());
        assert!(!Decline::NotOwner.is_silent());
        assert!(!Decline::NotReady.is_silent());
        assert!(!Decline::MatchInProgress.is_silent());
        assert!(!Decline::ResetNotAllowed.is_silent());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(RoomError::RoomFull(RoomId(3)).to_string(), "room room-3 is full");
        assert_eq!(
            Decline::IllegalMove(MoveRejected::Occupied { row: 1, col: 2 }).to_string(),
            "illegal move: (1, 2) is already occupied"
        );
    }
}
