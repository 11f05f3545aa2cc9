//! The match channel: flat wire envelope plus typed views.
//!
//! Every message on a match channel carries the same flat set of fields,
//! with unused ones left at zero or empty. That shape is kept for the
//! browser client, but nothing inside the server builds a `WireMessage`
//! by hand: inbound messages become a [`ClientAction`] and outbound ones
//! start life as a [`ServerView`].

use serde::{Deserialize, Serialize};

use crate::{Color, MatchId, ParticipantId, RoomStatus, color_code};

/// The flat message shape shared by both directions of a match channel.
///
/// `#[serde(default)]` lets clients send only the fields that matter for
/// their action (`{"type":"move","row":7,"col":7}`); everything else
/// decodes as zero or empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireMessage {
    /// Message discriminator, e.g. `"move"` or `"room_update"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub game_id: String,
    /// Signed so that out-of-range coordinates from a client still decode
    /// and get declined by the board instead of failing to parse.
    pub row: i64,
    pub col: i64,
    /// `BOARD_SIZE` rows of cell codes (0 empty, 1 black, 2 white), or
    /// empty when the message carries no board.
    pub board: Vec<Vec<u8>>,
    pub current_player_color: u8,
    pub winner_color: u8,
    pub room_status: u8,
    pub turn_color: u8,
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    pub owner: String,
    pub room_name: String,
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// An action a participant asks the room to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAction {
    Ready,
    CancelReady,
    StartGame,
    Move { row: i64, col: i64 },
    Reset,
    GetState,
}

impl ClientAction {
    /// Interprets a wire message. Unknown kinds yield `None` and are
    /// ignored by the caller.
    pub fn from_wire(msg: &WireMessage) -> Option<Self> {
        let action = match msg.kind.as_str() {
            "ready" => Self::Ready,
            "cancel_ready" => Self::CancelReady,
            "start_game" => Self::StartGame,
            "move" => Self::Move {
                row: msg.row,
                col: msg.col,
            },
            "reset" => Self::Reset,
            "get_state" => Self::GetState,
            _ => return None,
        };
        Some(action)
    }

    /// The wire discriminator for this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::CancelReady => "cancel_ready",
            Self::StartGame => "start_game",
            Self::Move { .. } => "move",
            Self::Reset => "reset",
            Self::GetState => "get_state",
        }
    }

    /// Builds the wire form, as a client would send it.
    pub fn to_wire(&self) -> WireMessage {
        let (row, col) = match *self {
            Self::Move { row, col } => (row, col),
            _ => (0, 0),
        };
        WireMessage {
            kind: self.kind().to_string(),
            row,
            col,
            ..WireMessage::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A view of room or match state sent to participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerView {
    /// Lobby-level state: status, owner, whose turn, room name.
    RoomUpdate {
        status: RoomStatus,
        owner: Option<ParticipantId>,
        current_turn: Option<Color>,
        room_name: String,
    },

    /// Match state after a move, reset, or forfeit.
    Update {
        match_id: MatchId,
        board: Vec<Vec<u8>>,
        current_turn: Color,
        winner: Option<Color>,
    },

    /// Sent to each participant when a match starts, carrying the color
    /// that participant was assigned.
    GameStart {
        match_id: MatchId,
        board: Vec<Vec<u8>>,
        current_turn: Color,
        assigned: Color,
        status: RoomStatus,
        owner: Option<ParticipantId>,
        room_name: String,
    },

    /// A declined action, explained.
    Error { message: String },
}

impl ServerView {
    /// The wire discriminator for this view.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoomUpdate { .. } => "room_update",
            Self::Update { .. } => "update",
            Self::GameStart { .. } => "game_start",
            Self::Error { .. } => "error",
        }
    }
}

impl From<ServerView> for WireMessage {
    fn from(view: ServerView) -> Self {
        let kind = view.kind().to_string();
        match view {
            ServerView::RoomUpdate {
                status,
                owner,
                current_turn,
                room_name,
            } => WireMessage {
                kind,
                room_status: status.into(),
                owner: owner.map(|o| o.0).unwrap_or_default(),
                current_player_color: color_code(current_turn),
                room_name,
                success: true,
                ..WireMessage::default()
            },
            ServerView::Update {
                match_id,
                board,
                current_turn,
                winner,
            } => WireMessage {
                kind,
                game_id: match_id.to_string(),
                board,
                current_player_color: current_turn.into(),
                winner_color: color_code(winner),
                success: true,
                ..WireMessage::default()
            },
            ServerView::GameStart {
                match_id,
                board,
                current_turn,
                assigned,
                status,
                owner,
                room_name,
            } => WireMessage {
                kind,
                game_id: match_id.to_string(),
                board,
                current_player_color: current_turn.into(),
                turn_color: assigned.into(),
                room_status: status.into(),
                owner: owner.map(|o| o.0).unwrap_or_default(),
                room_name,
                success: true,
                ..WireMessage::default()
            },
            ServerView::Error { message } => WireMessage {
                kind,
                error: message,
                success: false,
                ..WireMessage::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_action_from_wire_known_kinds() {
        for action in [
            ClientAction::Ready,
            ClientAction::CancelReady,
            ClientAction::StartGame,
            ClientAction::Move { row: 3, col: 11 },
            ClientAction::Reset,
            ClientAction::GetState,
        ] {
            assert_eq!(ClientAction::from_wire(&action.to_wire()), Some(action));
        }
    }

    #[test]
    fn test_client_action_unknown_kind_is_ignored() {
        let msg = WireMessage {
            kind: "surrender".into(),
            ..WireMessage::default()
        };
        assert_eq!(ClientAction::from_wire(&msg), None);
    }

    #[test]
    fn test_move_keeps_negative_coordinates() {
        let msg: WireMessage =
            serde_json::from_str(r#"{"type":"move","row":-1,"col":20}"#).unwrap();
        assert_eq!(
            ClientAction::from_wire(&msg),
            Some(ClientAction::Move { row: -1, col: 20 })
        );
    }

    #[test]
    fn test_room_update_json_shape_has_every_field() {
        let wire: WireMessage = ServerView::RoomUpdate {
            status: RoomStatus::Ready,
            owner: Some(ParticipantId::from("alice")),
            current_turn: None,
            room_name: "den".into(),
        }
        .into();
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["type"], "room_update");
        assert_eq!(json["roomStatus"], 1);
        assert_eq!(json["owner"], "alice");
        assert_eq!(json["roomName"], "den");
        assert_eq!(json["currentPlayerColor"], 0);
        // Unused fields are present with zero/empty values.
        assert_eq!(json["gameId"], "");
        assert_eq!(json["row"], 0);
        assert_eq!(json["board"], serde_json::json!([]));
        assert_eq!(json["winnerColor"], 0);
        assert_eq!(json["turnColor"], 0);
        assert_eq!(json["success"], true);
        // `error` is the one optional key.
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_update_json_shape() {
        let mut board = vec![vec![0u8; crate::BOARD_SIZE]; crate::BOARD_SIZE];
        board[7][7] = 1;
        let wire: WireMessage = ServerView::Update {
            match_id: MatchId(5),
            board,
            current_turn: Color::White,
            winner: None,
        }
        .into();
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["type"], "update");
        assert_eq!(json["gameId"], "game-5");
        assert_eq!(json["board"][7][7], 1);
        assert_eq!(json["board"].as_array().unwrap().len(), crate::BOARD_SIZE);
        assert_eq!(json["currentPlayerColor"], 2);
        assert_eq!(json["winnerColor"], 0);
    }

    #[test]
    fn test_game_start_carries_assigned_color() {
        let wire: WireMessage = ServerView::GameStart {
            match_id: MatchId(1),
            board: vec![],
            current_turn: Color::Black,
            assigned: Color::White,
            status: RoomStatus::Started,
            owner: Some(ParticipantId::from("alice")),
            room_name: "den".into(),
        }
        .into();

        assert_eq!(wire.kind, "game_start");
        assert_eq!(wire.turn_color, 2);
        assert_eq!(wire.current_player_color, 1);
        assert_eq!(wire.room_status, 2);
        assert!(wire.success);
    }

    #[test]
    fn test_error_view_sets_success_false() {
        let wire: WireMessage = ServerView::Error {
            message: "not owner".into(),
        }
        .into();
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "not owner");
    }
}
