//! Connect routing: which channel a connection is for, and who it claims
//! to be.
//!
//! ```text
//! /lobby?userId=alice          → Route::Lobby
//! /room/ws/7?userId=alice      → Route::Match(RoomId(7))
//! ```

use gomoku_protocol::RoomId;

use crate::SessionError;

/// The channel a connection asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Room listing, creation and joining.
    Lobby,
    /// Gameplay for one room.
    Match(RoomId),
}

/// A parsed connect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub route: Route,
    /// The unverified `userId` claim; pass it to an
    /// [`Authenticator`](crate::Authenticator).
    pub user_id: String,
}

impl ConnectRequest {
    /// Parses a request target (path plus optional query).
    pub fn parse(target: &str) -> Result<Self, SessionError> {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let route = parse_route(path)?;

        let user_id = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "userId")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or(SessionError::MissingIdentity)?;

        Ok(Self { route, user_id })
    }
}

fn parse_route(path: &str) -> Result<Route, SessionError> {
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        ["lobby"] => Ok(Route::Lobby),
        ["room", "ws", room] => room
            .parse::<RoomId>()
            .map(Route::Match)
            .map_err(|_| SessionError::BadRoomId((*room).to_string())),
        _ => Err(SessionError::UnknownRoute(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lobby_route() {
        let req = ConnectRequest::parse("/lobby?userId=alice").unwrap();
        assert_eq!(req.route, Route::Lobby);
        assert_eq!(req.user_id, "alice");
    }

    #[test]
    fn test_parse_match_route() {
        let req = ConnectRequest::parse("/room/ws/7?userId=bob").unwrap();
        assert_eq!(req.route, Route::Match(RoomId(7)));
        assert_eq!(req.user_id, "bob");
    }

    #[test]
    fn test_parse_match_route_with_display_room_id() {
        let req = ConnectRequest::parse("/room/ws/room-7?userId=bob").unwrap();
        assert_eq!(req.route, Route::Match(RoomId(7)));
    }

    #[test]
    fn test_parse_decodes_percent_escapes() {
        let req =
            ConnectRequest::parse("/lobby?x=1&userId=ann%20lee%40example").unwrap();
        assert_eq!(req.user_id, "ann lee@example");
    }

    #[test]
    fn test_parse_missing_user_id() {
        assert!(matches!(
            ConnectRequest::parse("/lobby"),
            Err(SessionError::MissingIdentity)
        ));
        assert!(matches!(
            ConnectRequest::parse("/lobby?userId="),
            Err(SessionError::MissingIdentity)
        ));
    }

    #[test]
    fn test_parse_unknown_route() {
        assert!(matches!(
            ConnectRequest::parse("/admin?userId=a"),
            Err(SessionError::UnknownRoute(_))
        ));
        assert!(matches!(
            ConnectRequest::parse("/room/ws?userId=a"),
            Err(SessionError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_parse_bad_room_id() {
        assert!(matches!(
            ConnectRequest::parse("/room/ws/abc?userId=a"),
            Err(SessionError::BadRoomId(id)) if id == "abc"
        ));
    }
}
