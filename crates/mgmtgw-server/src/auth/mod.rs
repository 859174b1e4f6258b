//! Authentication and authorization for every RPC.
//!
//! # Schemes
//!
//! - **Client certificate**: identity from the subject common name of a
//!   TLS client certificate verified against the configured CA
//! - **Token**: HS256 bearer token in the `access_token` call metadata,
//!   issued by the login RPC
//! - **Password**: username/password login, validated by a
//!   [`CredentialValidator`], that yields a token
//!
//! Roles are the caller's OS group names and are resolved once, when the
//! identity is established.

mod cert;
mod config;
mod credential;
mod error;
mod gateway;
mod identity;
#[cfg(feature = "pam")]
mod pam;
mod roles;
#[cfg(feature = "ssh-login")]
mod ssh;
mod token;

pub use cert::{common_name, fingerprint};
pub use config::{AuthConfig, AuthScheme};
pub use credential::{
    CredentialValidator, FixedCredentials, PasswordVerifier, DEFAULT_LOGIN_ENDPOINT,
    DEFAULT_LOGIN_TIMEOUT, DEFAULT_PAM_SERVICE,
};
pub use error::AuthError;
pub use gateway::AuthGateway;
pub use identity::{AuthMethod, CallContext, Identity, PeerCertificates};
#[cfg(feature = "pam")]
pub use pam::PamLogin;
pub use roles::{OsRoleResolver, RoleResolver, StaticRoles};
#[cfg(feature = "ssh-login")]
pub use ssh::RemoteLogin;
pub use token::{
    system_clock, Claims, Clock, IssuedToken, TokenSecret, TokenService, TokenSettings,
    DEFAULT_REFRESH_WINDOW_SECS, DEFAULT_TOKEN_LIFETIME_SECS,
};
