//! Identity hook for connecting participants.
//!
//! The server doesn't verify credentials itself. It defines the
//! [`Authenticator`] trait: one async method that takes the identity claim
//! a client connected with and returns a verified [`Identity`] or an error.
//! Deployments behind an authenticating proxy use [`TrustedAuthenticator`];
//! anything else plugs in its own implementation.

use gomoku_protocol::ParticipantId;

use crate::SessionError;

/// A verified participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: ParticipantId,
    /// Display handle shown to the other player.
    pub handle: String,
}

/// Validates a connecting client's identity claim.
///
/// # Example
///
/// ```rust
/// use gomoku_protocol::ParticipantId;
/// use gomoku_session::{Authenticator, Identity, SessionError};
///
/// /// Only lets through identities on an allow list.
/// struct AllowList(Vec<String>);
///
/// impl Authenticator for AllowList {
///     async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
///         if !self.0.iter().any(|u| u == token) {
///             return Err(SessionError::AuthFailed(format!("{token} not allowed")));
///         }
///         Ok(Identity { id: ParticipantId::from(token), handle: token.to_string() })
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates `token` (the `userId` the client connected with) and
    /// returns the participant's identity.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}

/// Accepts any non-empty identity literally.
///
/// For deployments where an upstream proxy has already verified the
/// caller and forwards its id as `userId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedAuthenticator;

impl Authenticator for TrustedAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::MissingIdentity);
        }
        tracing::trace!(participant = token, "trusting upstream identity");
        Ok(Identity {
            id: ParticipantId::from(token),
            handle: token.to_string(),
        })
    }
}
