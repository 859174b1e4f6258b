//! Username/password validation strategies.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::error::AuthError;

/// Default SSH endpoint used for login checks.
pub const DEFAULT_LOGIN_ENDPOINT: &str = "127.0.0.1:22";

/// Default timeout for one login attempt.
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default PAM service name.
pub const DEFAULT_PAM_SERVICE: &str = "login";

/// Verifies a username/password pair. Implementations may block.
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// The password validation strategy, chosen once at startup.
#[derive(Clone, Default)]
pub enum CredentialValidator {
    /// Password login unavailable; every attempt fails.
    #[default]
    None,
    /// Password handshake against the local SSH daemon.
    #[cfg(feature = "ssh-login")]
    RemoteLogin(super::ssh::RemoteLogin),
    /// Host PAM stack.
    #[cfg(feature = "pam")]
    LocalPam(super::pam::PamLogin),
    /// Caller-supplied verifier.
    Custom(Arc<dyn PasswordVerifier>),
}

impl CredentialValidator {
    /// Wrap a custom verifier.
    pub fn custom(verifier: impl PasswordVerifier + 'static) -> Self {
        CredentialValidator::Custom(Arc::new(verifier))
    }

    /// Verify `username`/`password`. Blocks for the I/O-backed strategies.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self {
            CredentialValidator::None => Err(AuthError::Unimplemented),
            #[cfg(feature = "ssh-login")]
            CredentialValidator::RemoteLogin(login) => login.verify(username, password),
            #[cfg(feature = "pam")]
            CredentialValidator::LocalPam(pam) => pam.verify(username, password),
            CredentialValidator::Custom(verifier) => verifier.verify(username, password),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CredentialValidator::None => "none",
            #[cfg(feature = "ssh-login")]
            CredentialValidator::RemoteLogin(_) => "remote-login",
            #[cfg(feature = "pam")]
            CredentialValidator::LocalPam(_) => "pam",
            CredentialValidator::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialValidator({})", self.name())
    }
}

/// Accepts exactly one username/password pair.
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl PasswordVerifier for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.username && password == self.password {
            Ok(())
        } else {
            Err(AuthError::credentials(username, "password mismatch"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_fails_closed() {
        assert!(matches!(
            CredentialValidator::None.verify("admin", "admin"),
            Err(AuthError::Unimplemented)
        ));
    }

    #[test]
    fn test_custom_verifier() {
        let validator = CredentialValidator::custom(FixedCredentials::new("admin", "s3cret"));
        assert!(validator.verify("admin", "s3cret").is_ok());
        assert!(matches!(
            validator.verify("admin", "wrong"),
            Err(AuthError::InvalidCredentials { .. })
        ));
        assert_eq!(validator.name(), "custom");
    }
}
