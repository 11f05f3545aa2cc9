//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The server never cares HOW a message is serialized; it only needs
//! something that implements [`Codec`]. The browser client speaks JSON, so
//! [`JsonCodec`] is the one in use.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec value is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use gomoku_protocol::{ClientAction, Codec, JsonCodec, WireMessage};
///
/// let codec = JsonCodec;
/// let msg: WireMessage = codec.decode(br#"{"type":"move","row":7,"col":7}"#).unwrap();
/// assert_eq!(ClientAction::from_wire(&msg), Some(ClientAction::Move { row: 7, col: 7 }));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{LobbyRequest, RoomId, WireMessage};

    #[test]
    fn test_json_codec_decodes_partial_wire_message() {
        let msg: WireMessage =
            JsonCodec.decode(br#"{"type":"reset"}"#).unwrap();
        assert_eq!(msg.kind, "reset");
        assert_eq!(msg.row, 0);
        assert!(msg.board.is_empty());
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<WireMessage, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_encodes_lobby_request() {
        let bytes = JsonCodec
            .encode(&LobbyRequest::JoinRoom { room_id: RoomId(4) })
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], "join_room");
        assert_eq!(value["roomId"], 4);
    }
}
