//! Session lifecycle states.

use std::fmt;

/// Where a client is in the `/auth` handshake.
///
/// ```text
/// Disconnected -> ChallengeRequested -> Authenticating -> Authenticated
///      ^                                                      |
///      +------------------------ logout ----------------------+
/// ```
///
/// Any failure during login drops back to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No authenticated session
    #[default]
    Disconnected,
    /// `GET /auth` sent, waiting for challenge headers
    ChallengeRequested,
    /// Digest posted, waiting for confirmation
    Authenticating,
    /// Handshake completed and confirmed
    Authenticated,
}

impl SessionState {
    /// Returns `true` only for [`SessionState::Authenticated`].
    pub fn is_authenticated(self) -> bool {
        self == SessionState::Authenticated
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::ChallengeRequested => "challenge-requested",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
        };
        f.write_str(s)
    }
}
