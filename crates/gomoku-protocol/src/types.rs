//! Core protocol types shared by every layer.
//!
//! Identities, stone colors and the room status enum. Colors and statuses
//! travel as small integers on the wire (the browser client compares
//! against numeric enums), so they convert through `u8` for serde.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 15;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The verified identity of a participant.
///
/// Supplied by the upstream authenticator and trusted literally; the room
/// layer never inspects it beyond equality.
///
/// `#[serde(transparent)]` serializes `ParticipantId("alice")` as just
/// `"alice"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A unique identifier for a room.
///
/// Serialized as a plain number; displayed as `room-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room-{}", self.0)
    }
}

/// Accepts both the bare number (`"7"`) and the display form (`"room-7"`),
/// so ids copied out of logs work in URLs.
impl FromStr for RoomId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("room-").unwrap_or(s);
        digits
            .parse::<u64>()
            .map(RoomId)
            .map_err(|_| ProtocolError::InvalidMessage(format!("bad room id: {s:?}")))
    }
}

/// Identifies one match (game). Stable across in-place resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A stone color. Black always moves first.
///
/// Wire codes: 1 = Black, 2 = White. "No color" (an empty cell, an
/// undecided winner, an unassigned player) is 0 and is modeled as
/// `Option<Color>` rather than a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other color.
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        match color {
            Color::Black => 1,
            Color::White => 2,
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            other => Err(ProtocolError::InvalidMessage(format!(
                "color code out of range: {other}"
            ))),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// Wire code for an optional color: 0 when absent.
pub fn color_code(color: Option<Color>) -> u8 {
    color.map_or(0, u8::from)
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lobby-to-match state of a room.
///
/// ```text
/// Unready ⇄ Ready → Started → Finished
///    ↑                 │          │
///    └──── disconnect ─┴──────────┘
/// ```
///
/// Wire codes follow declaration order: 0 Unready, 1 Ready, 2 Started,
/// 3 Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RoomStatus {
    #[default]
    Unready,
    Ready,
    Started,
    Finished,
}

impl RoomStatus {
    /// Returns `true` while a match is live (in play or showing its result).
    pub fn has_match(self) -> bool {
        matches!(self, Self::Started | Self::Finished)
    }

    /// Returns `true` while players are still readying up.
    pub fn is_lobby(self) -> bool {
        matches!(self, Self::Unready | Self::Ready)
    }
}

impl From<RoomStatus> for u8 {
    fn from(status: RoomStatus) -> u8 {
        match status {
            RoomStatus::Unready => 0,
            RoomStatus::Ready => 1,
            RoomStatus::Started => 2,
            RoomStatus::Finished => 3,
        }
    }
}

impl TryFrom<u8> for RoomStatus {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unready),
            1 => Ok(Self::Ready),
            2 => Ok(Self::Started),
            3 => Ok(Self::Finished),
            other => Err(ProtocolError::InvalidMessage(format!(
                "room status out of range: {other}"
            ))),
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unready => write!(f, "Unready"),
            Self::Ready => write!(f, "Ready"),
            Self::Started => write!(f, "Started"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ParticipantId::from("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }

    #[test]
    fn test_room_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&RoomId(99)).unwrap(), "99");
        assert_eq!(RoomId(3).to_string(), "room-3");
    }

    #[test]
    fn test_room_id_parses_bare_and_prefixed() {
        assert_eq!("12".parse::<RoomId>().unwrap(), RoomId(12));
        assert_eq!("room-12".parse::<RoomId>().unwrap(), RoomId(12));
        assert!("room-x".parse::<RoomId>().is_err());
        assert!("".parse::<RoomId>().is_err());
    }

    #[test]
    fn test_color_wire_codes() {
        assert_eq!(serde_json::to_string(&Color::Black).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Color::White).unwrap(), "2");
        let white: Color = serde_json::from_str("2").unwrap();
        assert_eq!(white, Color::White);
        assert!(serde_json::from_str::<Color>("0").is_err());
    }

    #[test]
    fn test_color_opponent_and_code() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(color_code(None), 0);
        assert_eq!(color_code(Some(Color::White)), 2);
    }

    #[test]
    fn test_room_status_wire_codes_follow_declaration_order() {
        for (status, code) in [
            (RoomStatus::Unready, 0u8),
            (RoomStatus::Ready, 1),
            (RoomStatus::Started, 2),
            (RoomStatus::Finished, 3),
        ] {
            assert_eq!(u8::from(status), code);
            assert_eq!(RoomStatus::try_from(code).unwrap(), status);
        }
        assert!(RoomStatus::try_from(4).is_err());
    }

    #[test]
    fn test_room_status_predicates() {
        assert!(RoomStatus::Unready.is_lobby());
        assert!(RoomStatus::Ready.is_lobby());
        assert!(!RoomStatus::Started.is_lobby());
        assert!(RoomStatus::Started.has_match());
        assert!(RoomStatus::Finished.has_match());
        assert!(!RoomStatus::Ready.has_match());
    }
}
