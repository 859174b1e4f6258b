use tonic::{Request, Response, Status};

use mgmtgw_proto::jwt::jwt_service_server::JwtService;
use mgmtgw_proto::jwt::{AuthenticateRequest, AuthenticateResponse, RefreshRequest, RefreshResponse};

use super::ServiceContext;
use crate::auth::CallContext;

/// `gnoi.jwt.JwtService`.
///
/// Neither call goes through the regular per-call check: `Authenticate`
/// validates the supplied password and `Refresh` validates the token it
/// replaces.
pub struct JwtHandler {
    ctx: ServiceContext,
}

impl JwtHandler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }
}

#[tonic::async_trait]
impl JwtService for JwtHandler {
    async fn authenticate(
        &self,
        request: Request<AuthenticateRequest>,
    ) -> Result<Response<AuthenticateResponse>, Status> {
        let remote = request.remote_addr();
        let AuthenticateRequest { username, password } = request.into_inner();

        match self.ctx.gateway().login(username.clone(), password).await {
            Ok(issued) => Ok(Response::new(AuthenticateResponse {
                token: Some(issued.to_jwt_token()),
            })),
            Err(e) => {
                tracing::info!(user = %username, remote = ?remote, error = %e, "login rejected");
                Err(e.into())
            }
        }
    }

    async fn refresh(
        &self,
        request: Request<RefreshRequest>,
    ) -> Result<Response<RefreshResponse>, Status> {
        let call = CallContext::from_request(&request);
        match self.ctx.gateway().refresh(&call) {
            Ok(issued) => {
                tracing::debug!(user = %issued.claims.sub, "token refreshed");
                Ok(Response::new(RefreshResponse {
                    token: Some(issued.to_jwt_token()),
                }))
            }
            Err(e) => {
                tracing::info!(remote = ?request.remote_addr(), error = %e, "refresh rejected");
                Err(e.into())
            }
        }
    }
}
