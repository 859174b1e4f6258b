use serde::de::DeserializeOwned;
use serde::Serialize;
use tonic::{Request, Response, Status};

use mgmtgw_proto::sonic::sonic_service_server::SonicService;
use mgmtgw_proto::sonic::{
    ClearAuditLogRequest, ClearAuditLogResponse, ClearNeighborsRequest, ClearNeighborsResponse,
    ConfigFileRequest, ConfigFileResponse, CopyConfigRequest, CopyConfigResponse,
    GetAuditLogRequest, GetAuditLogResponse, ImageDefaultRequest, ImageDefaultResponse,
    ImageInstallRequest, ImageInstallResponse, ImageRemoveRequest, ImageRemoveResponse,
    SumRequest, SumResponse, TechsupportRequest, TechsupportResponse,
};

use super::ServiceContext;
use crate::actions::{self, ActionSpec};

/// `gnoi.sonic.SonicService`. Each RPC forwards to one backend action.
pub struct SonicHandler {
    ctx: ServiceContext,
}

impl SonicHandler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    async fn call<Req, Resp>(
        &self,
        request: Request<Req>,
        rpc: &'static str,
        action: &ActionSpec,
    ) -> Result<Response<Resp>, Status>
    where
        Req: Serialize + Send + Sync,
        Resp: DeserializeOwned + Send,
    {
        let identity = self.ctx.authorize(&request, rpc).await?;
        tracing::info!(rpc, user = %identity.username, uri = %action.uri, "invoking action");

        match self.ctx.dispatcher().invoke(action, request.get_ref()).await {
            Ok(response) => Ok(Response::new(response)),
            Err(e) => {
                tracing::warn!(rpc, uri = %action.uri, error = %e, "action failed");
                Err(e.into())
            }
        }
    }
}

#[tonic::async_trait]
impl SonicService for SonicHandler {
    async fn show_techsupport(
        &self,
        request: Request<TechsupportRequest>,
    ) -> Result<Response<TechsupportResponse>, Status> {
        self.call(request, "ShowTechsupport", &actions::SHOW_TECHSUPPORT).await
    }

    async fn sum(&self, request: Request<SumRequest>) -> Result<Response<SumResponse>, Status> {
        self.call(request, "Sum", &actions::SUM).await
    }

    async fn copy_config(
        &self,
        request: Request<CopyConfigRequest>,
    ) -> Result<Response<CopyConfigResponse>, Status> {
        self.call(request, "CopyConfig", &actions::COPY_CONFIG).await
    }

    async fn image_install(
        &self,
        request: Request<ImageInstallRequest>,
    ) -> Result<Response<ImageInstallResponse>, Status> {
        self.call(request, "ImageInstall", &actions::IMAGE_INSTALL).await
    }

    async fn image_remove(
        &self,
        request: Request<ImageRemoveRequest>,
    ) -> Result<Response<ImageRemoveResponse>, Status> {
        self.call(request, "ImageRemove", &actions::IMAGE_REMOVE).await
    }

    async fn image_default(
        &self,
        request: Request<ImageDefaultRequest>,
    ) -> Result<Response<ImageDefaultResponse>, Status> {
        self.call(request, "ImageDefault", &actions::IMAGE_DEFAULT).await
    }

    async fn clear_neighbors(
        &self,
        request: Request<ClearNeighborsRequest>,
    ) -> Result<Response<ClearNeighborsResponse>, Status> {
        self.call(request, "ClearNeighbors", &actions::CLEAR_NEIGHBORS).await
    }

    async fn get_audit_log(
        &self,
        request: Request<GetAuditLogRequest>,
    ) -> Result<Response<GetAuditLogResponse>, Status> {
        self.call(request, "GetAuditLog", &actions::GET_AUDIT_LOG).await
    }

    async fn clear_audit_log(
        &self,
        request: Request<ClearAuditLogRequest>,
    ) -> Result<Response<ClearAuditLogResponse>, Status> {
        self.call(request, "ClearAuditLog", &actions::CLEAR_AUDIT_LOG).await
    }

    async fn save_config(
        &self,
        request: Request<ConfigFileRequest>,
    ) -> Result<Response<ConfigFileResponse>, Status> {
        self.call(request, "SaveConfig", &actions::SAVE_CONFIG).await
    }

    async fn reload_config(
        &self,
        request: Request<ConfigFileRequest>,
    ) -> Result<Response<ConfigFileResponse>, Status> {
        self.call(request, "ReloadConfig", &actions::RELOAD_CONFIG).await
    }

    async fn load_mgmt_config(
        &self,
        request: Request<ConfigFileRequest>,
    ) -> Result<Response<ConfigFileResponse>, Status> {
        self.call(request, "LoadMgmtConfig", &actions::LOAD_MGMT_CONFIG).await
    }

    async fn load_minigraph(
        &self,
        request: Request<ConfigFileRequest>,
    ) -> Result<Response<ConfigFileResponse>, Status> {
        self.call(request, "LoadMinigraph", &actions::LOAD_MINIGRAPH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MemoryBackend};
    use crate::service::testing::{authorized, context, context_with_backend};
    use mgmtgw_proto::sonic::{ImageInput, SumInput};
    use serde_json::json;
    use std::sync::Arc;
    use tonic::Code;

    #[tokio::test]
    async fn test_sum() {
        let ctx = context("password,jwt");
        let handler = SonicHandler::new(ctx.clone());

        let request = authorized(
            &ctx,
            SumRequest {
                input: SumInput { left: 40, right: 2 },
            },
        );
        let response = handler.sum(request).await.unwrap().into_inner();
        assert_eq!(response.output.result, 42);
    }

    #[tokio::test]
    async fn test_requires_credentials() {
        let handler = SonicHandler::new(context("password,jwt"));
        let status = handler.sum(Request::new(SumRequest::default())).await.unwrap_err();
        assert_eq!(status.code(), Code::PermissionDenied);
    }

    #[tokio::test]
    async fn test_disabled_is_unimplemented() {
        let handler = SonicHandler::new(context(""));
        let status = handler
            .clear_audit_log(Request::new(ClearAuditLogRequest {}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unimplemented);
    }

    #[tokio::test]
    async fn test_image_install_routes_to_action() {
        let backend = MemoryBackend::new();
        backend.register_action(actions::IMAGE_INSTALL.uri, |input| {
            let image = input["sonic-image-management:input"]["imagename"].clone();
            Ok(json!({
                "sonic-image-management:output": {"status": 0, "status-detail": image}
            }))
        });
        let ctx = context_with_backend("password,jwt", Arc::new(backend));
        let handler = SonicHandler::new(ctx.clone());

        let request = authorized(
            &ctx,
            ImageInstallRequest {
                input: ImageInput {
                    imagename: "/tmp/sonic.bin".into(),
                },
            },
        );
        let response = handler.image_install(request).await.unwrap().into_inner();
        assert_eq!(response.output.status, 0);
        assert_eq!(response.output.status_detail, "/tmp/sonic.bin");
    }

    #[tokio::test]
    async fn test_backend_failure_is_unknown() {
        let backend = MemoryBackend::new();
        backend.register_action(actions::LOAD_MINIGRAPH.uri, |_| {
            Err(BackendError::internal("%Error: minigraph.xml missing"))
        });
        let ctx = context_with_backend("password,jwt", Arc::new(backend));
        let handler = SonicHandler::new(ctx.clone());

        let request = authorized(&ctx, ConfigFileRequest::new("/etc/sonic/minigraph.xml"));
        let status = handler.load_minigraph(request).await.unwrap_err();
        assert_eq!(status.code(), Code::Unknown);
        assert_eq!(status.message(), "%Error: minigraph.xml missing");
    }

    #[tokio::test]
    async fn test_unregistered_action_is_unknown() {
        let ctx = context("password,jwt");
        let handler = SonicHandler::new(ctx.clone());

        let request = authorized(&ctx, GetAuditLogRequest::default());
        let status = handler.get_audit_log(request).await.unwrap_err();
        assert_eq!(status.code(), Code::Unknown);
        assert!(status.message().contains(actions::GET_AUDIT_LOG.uri));
    }
}
