//! Authentication and authorization errors.

use thiserror::Error;
use tonic::Status;

/// Why a call was not authorized.
///
/// The detail carried by each variant is for local logs only; the
/// conversion into [`Status`] drops it.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The scheme this call needs is not enabled.
    #[error("authentication scheme not enabled")]
    Unimplemented,

    /// No credential accepted by an enabled scheme was presented.
    #[error("no acceptable credential presented")]
    MissingCredential,

    /// Token malformed, expired, or signed with another secret.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Username/password pair rejected.
    #[error("credentials rejected for {user}: {reason}")]
    InvalidCredentials {
        /// Login name that was tried.
        user: String,
        /// Cause reported by the validator.
        reason: String,
    },

    /// OS group membership could not be resolved.
    #[error("cannot resolve roles for {user}: {reason}")]
    RoleLookup {
        /// User whose roles were looked up.
        user: String,
        /// Cause of the failure.
        reason: String,
    },

    /// Client certificate could not be used as an identity.
    #[error("client certificate rejected: {0}")]
    Certificate(String),

    /// Token still has more lifetime left than the refresh window.
    #[error("token is not yet eligible for refresh")]
    RefreshTooEarly,

    /// Internal failure (token signing, task join).
    #[error("internal authentication failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub(crate) fn credentials(user: &str, reason: impl Into<String>) -> Self {
        AuthError::InvalidCredentials {
            user: user.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn role_lookup(user: &str, reason: impl Into<String>) -> Self {
        AuthError::RoleLookup {
            user: user.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unimplemented => Status::unimplemented(""),
            AuthError::MissingCredential => Status::permission_denied("No Valid Credentials"),
            AuthError::InvalidToken(_) => Status::permission_denied("Invalid JWT Token"),
            AuthError::InvalidCredentials { .. } | AuthError::RoleLookup { .. } => {
                Status::permission_denied("Invalid Username or Password")
            }
            AuthError::Certificate(_) => Status::permission_denied("Invalid Client Certificate"),
            AuthError::RefreshTooEarly => Status::invalid_argument("Invalid JWT Token"),
            AuthError::Internal(_) => Status::internal(""),
        }
    }
}
