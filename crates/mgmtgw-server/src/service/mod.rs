//! RPC handlers.
//!
//! Every handler except the login calls authorizes through the
//! [`AuthGateway`] before touching the backend.

mod gnmi;
mod jwt;
mod sonic;
mod system;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tonic::{Request, Status};

use crate::auth::{
    AuthGateway, CallContext, Identity, OsRoleResolver, TokenSecret, TokenService,
};
use crate::backend::SharedBackend;
use crate::config::ServerConfig;
use crate::dispatch::ActionDispatcher;
use crate::error::Error;

pub use gnmi::GnmiHandler;
pub use jwt::JwtHandler;
pub use sonic::SonicHandler;
pub use system::SystemHandler;

/// State shared by every handler.
#[derive(Clone)]
pub struct ServiceContext {
    gateway: AuthGateway,
    backend: SharedBackend,
}

impl ServiceContext {
    pub fn new(gateway: AuthGateway, backend: SharedBackend) -> Self {
        Self { gateway, backend }
    }

    /// Assemble the gateway and backend described by `config`.
    ///
    /// The token signing secret is generated here, so tokens do not outlive
    /// the process.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        config.validate()?;
        let tokens = TokenService::new(&TokenSecret::generate(), config.token_settings);
        let validator = config.credential_validator()?;
        tracing::info!(
            schemes = %config.auth,
            validator = validator.name(),
            backend = ?config.backend,
            "authentication configured"
        );

        let gateway = AuthGateway::new(
            config.auth.clone(),
            tokens,
            validator,
            Arc::new(OsRoleResolver),
        );
        Ok(Self::new(gateway, config.backend.build()))
    }

    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    pub fn dispatcher(&self) -> ActionDispatcher {
        ActionDispatcher::new(self.backend.clone())
    }

    /// Authorize `request` for `rpc`, logging denials locally.
    ///
    /// The returned future does not borrow `request`.
    pub fn authorize<T>(
        &self,
        request: &Request<T>,
        rpc: &'static str,
    ) -> impl Future<Output = Result<Identity, Status>> + Send + '_ {
        let ctx = CallContext::from_request(request);
        let remote = request.remote_addr();
        self.authorize_call(ctx, remote, rpc)
    }

    async fn authorize_call(
        &self,
        ctx: CallContext,
        remote: Option<SocketAddr>,
        rpc: &'static str,
    ) -> Result<Identity, Status> {
        match self.gateway.authorize(ctx).await {
            Ok(identity) => {
                tracing::debug!(
                    rpc,
                    user = %identity.username,
                    method = %identity.method,
                    "request authorized"
                );
                Ok(identity)
            }
            Err(e) => {
                tracing::info!(rpc, remote = ?remote, error = %e, "request denied");
                Err(e.into())
            }
        }
    }

    /// Build all four handlers.
    pub fn handlers(&self) -> (SystemHandler, SonicHandler, JwtHandler, GnmiHandler) {
        (
            SystemHandler::new(self.clone()),
            SonicHandler::new(self.clone()),
            JwtHandler::new(self.clone()),
            GnmiHandler::new(self.clone()),
        )
    }
}

/// Wall-clock time in nanoseconds since the Unix epoch.
pub(crate) fn now_nanos() -> Result<u64, Status> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Status::internal(format!("system clock before epoch: {}", e)))?;
    u64::try_from(elapsed.as_nanos()).map_err(|_| Status::internal("system clock overflow"))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use tonic::Request;

    use super::ServiceContext;
    use crate::auth::{
        AuthGateway, CredentialValidator, FixedCredentials, StaticRoles, TokenSecret,
        TokenService, TokenSettings,
    };
    use crate::backend::{MemoryBackend, SharedBackend};

    pub const USER: &str = "admin";
    pub const PASSWORD: &str = "s3cret";

    pub fn context(schemes: &str) -> ServiceContext {
        context_with_backend(schemes, Arc::new(MemoryBackend::with_self_test()))
    }

    pub fn context_with_backend(schemes: &str, backend: SharedBackend) -> ServiceContext {
        let gateway = AuthGateway::new(
            schemes.parse().unwrap(),
            TokenService::new(&TokenSecret::generate(), TokenSettings::default()),
            CredentialValidator::custom(FixedCredentials::new(USER, PASSWORD)),
            Arc::new(StaticRoles::new().with_user(USER, ["admin", "sudo"])),
        );
        ServiceContext::new(gateway, backend)
    }

    /// Wrap `message` in a request carrying a fresh token for the test user.
    pub fn authorized<T>(ctx: &ServiceContext, message: T) -> Request<T> {
        let token = ctx.gateway().authenticate(USER, PASSWORD).unwrap().encoded;
        let mut request = Request::new(message);
        request
            .metadata_mut()
            .insert(mgmtgw_proto::ACCESS_TOKEN_KEY, token.parse().unwrap());
        request
    }
}
