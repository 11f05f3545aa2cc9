//! The lobby channel: listing, creating and joining rooms.
//!
//! Unlike the match channel these messages are internally tagged
//! (`{"type":"join_room","roomId":3}`): each variant carries only its own
//! fields.

use serde::{Deserialize, Serialize};

use crate::{Color, ParticipantId, RoomId, RoomStatus};

/// A summary of one room, as shown in the lobby list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    pub owner: Option<ParticipantId>,
    pub is_full: bool,
}

/// Client → server lobby requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LobbyRequest {
    ListRooms,
    CreateRoom {
        #[serde(default)]
        name: String,
    },
    JoinRoom { room_id: RoomId },
}

/// Why a lobby request was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyErrorReason {
    RoomFull,
    AlreadyJoined,
    RoomNotFound,
    BadRequest,
}

/// Server → client lobby responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LobbyResponse {
    RoomList { rooms: Vec<RoomSummary> },

    /// The creator always plays from the Black seat in the lobby view.
    RoomCreated {
        room_id: RoomId,
        room_name: String,
        player: Color,
    },

    RoomJoined { room_id: RoomId, player: Color },

    Error {
        reason: LobbyErrorReason,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_request_decodes_from_client_json() {
        let req: LobbyRequest =
            serde_json::from_str(r#"{"type":"create_room","name":"den"}"#).unwrap();
        assert_eq!(req, LobbyRequest::CreateRoom { name: "den".into() });

        let req: LobbyRequest =
            serde_json::from_str(r#"{"type":"create_room"}"#).unwrap();
        assert_eq!(req, LobbyRequest::CreateRoom { name: String::new() });

        let req: LobbyRequest =
            serde_json::from_str(r#"{"type":"list_rooms"}"#).unwrap();
        assert_eq!(req, LobbyRequest::ListRooms);
    }

    #[test]
    fn test_lobby_request_unknown_type_fails() {
        let result: Result<LobbyRequest, _> =
            serde_json::from_str(r#"{"type":"matchmake"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_room_created_json_shape() {
        let json = serde_json::to_value(LobbyResponse::RoomCreated {
            room_id: RoomId(3),
            room_name: "den".into(),
            player: Color::Black,
        })
        .unwrap();
        assert_eq!(json["type"], "room_created");
        assert_eq!(json["roomId"], 3);
        assert_eq!(json["roomName"], "den");
        assert_eq!(json["player"], 1);
    }

    #[test]
    fn test_room_list_json_shape() {
        let json = serde_json::to_value(LobbyResponse::RoomList {
            rooms: vec![RoomSummary {
                id: RoomId(1),
                name: "den".into(),
                status: RoomStatus::Started,
                owner: Some(ParticipantId::from("alice")),
                is_full: true,
            }],
        })
        .unwrap();
        let room = &json["rooms"][0];
        assert_eq!(room["id"], 1);
        assert_eq!(room["status"], 2);
        assert_eq!(room["owner"], "alice");
        assert_eq!(room["isFull"], true);
    }

    #[test]
    fn test_error_reason_serializes_by_name() {
        let json = serde_json::to_value(LobbyResponse::Error {
            reason: LobbyErrorReason::RoomFull,
            message: "room room-1 is full".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["reason"], "RoomFull");
    }
}
