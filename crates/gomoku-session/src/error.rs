//! Error types for the session layer.

/// Errors that can occur while routing and identifying a connection.
///
/// Every variant ends the connection before it reaches a room.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The [`Authenticator`](crate::Authenticator) rejected the identity.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The connect request carried no `userId`.
    #[error("missing userId")]
    MissingIdentity,

    /// The request path matches no channel.
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// The room segment of a match route is not a room id.
    #[error("bad room id: {0}")]
    BadRoomId(String),
}
