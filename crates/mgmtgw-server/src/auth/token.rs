//! Short-lived bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the username and roles:
//!
//! ```json
//! {
//!   "sub": "admin",
//!   "roles": ["admin", "sudo"],
//!   "iat": 1735603200,
//!   "exp": 1735606800
//! }
//! ```
//!
//! The signing secret is generated once per process and never persisted, so
//! every token dies with the server that issued it. Expiry is checked here
//! against an injectable clock with zero leeway rather than by the JWT
//! library, which keeps expiry testable.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use mgmtgw_proto::JwtToken;

use super::error::AuthError;
use super::identity::Identity;

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Default refresh window in seconds.
pub const DEFAULT_REFRESH_WINDOW_SECS: u64 = 30;

/// Length of a generated secret in bytes.
const SECRET_LEN: usize = 32;

/// Source of the current Unix time in seconds.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// The wall clock.
pub fn system_clock() -> Clock {
    Arc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    })
}

/// HMAC signing secret.
#[derive(Clone)]
pub struct TokenSecret(Arc<[u8]>);

impl TokenSecret {
    /// Generate a fresh random secret from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(Arc::from(&bytes[..]))
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(Arc::from(bytes.as_ref()))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Token lifetime settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSettings {
    /// How long an issued token stays valid.
    pub lifetime: Duration,
    /// How close to expiry a token must be before it can be refreshed.
    pub refresh_window: Duration,
}

impl TokenSettings {
    pub fn new(lifetime: Duration, refresh_window: Duration) -> Self {
        Self {
            lifetime,
            refresh_window,
        }
    }

    /// Check that a refreshed token always outlives the one it replaces.
    pub fn validate(&self) -> Result<(), String> {
        if self.lifetime.as_secs() == 0 {
            return Err("token lifetime must be at least one second".to_string());
        }
        if self.refresh_window >= self.lifetime {
            return Err(format!(
                "refresh window ({}s) must be shorter than the token lifetime ({}s)",
                self.refresh_window.as_secs(),
                self.lifetime.as_secs()
            ));
        }
        Ok(())
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS),
            Duration::from_secs(DEFAULT_REFRESH_WINDOW_SECS),
        )
    }
}

/// Claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// OS group names at login time.
    pub roles: Vec<String>,
    /// Issued at (Unix seconds).
    pub iat: u64,
    /// Expires at (Unix seconds).
    pub exp: u64,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub encoded: String,
    pub claims: Claims,
}

impl IssuedToken {
    /// The client-facing view of this token.
    pub fn to_jwt_token(&self) -> JwtToken {
        JwtToken {
            access_token: self.encoded.clone(),
            token_type: "Bearer".to_string(),
            expires_in: i64::try_from(self.claims.exp.saturating_sub(self.claims.iat))
                .unwrap_or(i64::MAX),
        }
    }
}

/// Issues, validates and refreshes tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    settings: TokenSettings,
    clock: Clock,
}

impl TokenService {
    /// Create a service signing with `secret`, using the wall clock.
    pub fn new(secret: &TokenSecret, settings: TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            settings,
            clock: system_clock(),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    fn now(&self) -> u64 {
        (self.clock)()
    }

    /// Sign a token for `identity`.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, AuthError> {
        self.sign(identity.username.clone(), identity.roles.clone())
    }

    fn sign(&self, sub: String, roles: Vec<String>) -> Result<IssuedToken, AuthError> {
        let iat = self.now();
        let claims = Claims {
            sub,
            roles,
            iat,
            exp: iat.saturating_add(self.settings.lifetime.as_secs()),
        };
        let encoded = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {}", e)))?;
        Ok(IssuedToken { encoded, claims })
    }

    /// Verify signature and expiry.
    ///
    /// Malformed, expired and foreign tokens all yield
    /// [`AuthError::InvalidToken`].
    pub fn validate(&self, encoded: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(encoded, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        if self.now() >= claims.exp {
            return Err(AuthError::InvalidToken("token expired".to_string()));
        }
        Ok(claims)
    }

    /// Exchange a token close to expiry for a new one with the same subject
    /// and roles.
    pub fn refresh(&self, encoded: &str) -> Result<IssuedToken, AuthError> {
        let claims = self.validate(encoded)?;
        let remaining = claims.exp.saturating_sub(self.now());
        if remaining > self.settings.refresh_window.as_secs() {
            return Err(AuthError::RefreshTooEarly);
        }
        self.sign(claims.sub, claims.roles)
    }
}
