//! Token login messages and the generated `gnoi.jwt.JwtService` stubs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Call-metadata key carrying a bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Username/password login.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

impl AuthenticateRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A signed bearer token as handed to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtToken {
    pub access_token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticateResponse {
    pub token: Option<JwtToken>,
}

/// Refresh request; the current token travels in call metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshResponse {
    pub token: Option<JwtToken>,
}

include!(concat!(env!("OUT_DIR"), "/gnoi.jwt.JwtService.rs"));
