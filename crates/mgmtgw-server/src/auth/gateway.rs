//! The per-call authentication gate.

use std::sync::Arc;

use super::cert;
use super::config::{AuthConfig, AuthScheme};
use super::credential::CredentialValidator;
use super::error::AuthError;
use super::identity::{AuthMethod, CallContext, Identity};
use super::roles::RoleResolver;
use super::token::{IssuedToken, TokenService};

/// Decides who a caller is, or that it may not proceed.
///
/// Regular calls are checked with [`AuthGateway::check`]. The login calls
/// ([`AuthGateway::login`] and [`AuthGateway::refresh`]) bypass it and apply
/// their own scheme requirements.
#[derive(Clone)]
pub struct AuthGateway {
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
    validator: CredentialValidator,
    roles: Arc<dyn RoleResolver>,
}

impl AuthGateway {
    pub fn new(
        config: AuthConfig,
        tokens: TokenService,
        validator: CredentialValidator,
        roles: Arc<dyn RoleResolver>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            validator,
            roles,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authorize a regular call.
    ///
    /// A verified client certificate is tried first, then a bearer token.
    /// Without either, the call fails with `Unimplemented` when nothing is
    /// enabled and is denied otherwise. May block on role lookup.
    pub fn check(&self, ctx: &CallContext) -> Result<Identity, AuthError> {
        if self.config.is_enabled(AuthScheme::ClientCert) {
            if let Some(der) = ctx.client_certificate() {
                return self.identity_from_certificate(der);
            }
        }

        if self.config.is_enabled(AuthScheme::Token) {
            if let Some(token) = ctx.access_token() {
                let claims = self.tokens.validate(token)?;
                return Ok(Identity::new(claims.sub, claims.roles, AuthMethod::Token));
            }
        }

        if self.config.is_empty() {
            Err(AuthError::Unimplemented)
        } else {
            Err(AuthError::MissingCredential)
        }
    }

    fn identity_from_certificate(&self, der: &[u8]) -> Result<Identity, AuthError> {
        let username = cert::common_name(der)?;
        let roles = self.roles.resolve(&username)?;
        tracing::debug!(
            user = %username,
            fingerprint = %cert::fingerprint(der),
            "client certificate accepted"
        );
        Ok(Identity::new(username, roles, AuthMethod::ClientCert))
    }

    /// Async wrapper around [`AuthGateway::check`] that keeps role lookups off
    /// the executor.
    pub async fn authorize(&self, ctx: CallContext) -> Result<Identity, AuthError> {
        let gateway = self.clone();
        tokio::task::spawn_blocking(move || gateway.check(&ctx))
            .await
            .map_err(|e| AuthError::Internal(format!("auth task failed: {}", e)))?
    }

    /// Validate a username/password pair and issue a token for it.
    ///
    /// Requires both the password and token schemes. Blocks on the
    /// credential validator.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if !self.config.is_enabled(AuthScheme::Password)
            || !self.config.is_enabled(AuthScheme::Token)
        {
            return Err(AuthError::Unimplemented);
        }

        self.validator.verify(username, password)?;
        let roles = self.roles.resolve(username)?;
        let identity = Identity::new(username, roles, AuthMethod::Password);

        let issued = self.tokens.issue(&identity)?;
        tracing::info!(user = %username, roles = ?identity.roles, "login succeeded");
        Ok(issued)
    }

    /// Async wrapper around [`AuthGateway::authenticate`].
    pub async fn login(&self, username: String, password: String) -> Result<IssuedToken, AuthError> {
        let gateway = self.clone();
        tokio::task::spawn_blocking(move || gateway.authenticate(&username, &password))
            .await
            .map_err(|e| AuthError::Internal(format!("login task failed: {}", e)))?
    }

    /// Exchange the caller's token for a new one.
    ///
    /// The token comes from call metadata. Requires the token scheme.
    pub fn refresh(&self, ctx: &CallContext) -> Result<IssuedToken, AuthError> {
        if !self.config.is_enabled(AuthScheme::Token) {
            return Err(AuthError::Unimplemented);
        }
        let token = ctx.access_token().ok_or(AuthError::MissingCredential)?;
        self.tokens.refresh(token)
    }
}
