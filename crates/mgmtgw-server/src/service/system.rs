use std::future::Future;

use futures::stream::BoxStream;
use tonic::{Request, Response, Status, Streaming};

use mgmtgw_proto::system::system_server::System;
use mgmtgw_proto::system::{
    CancelRebootRequest, CancelRebootResponse, PingRequest, PingResponse, RebootRequest,
    RebootResponse, RebootStatusRequest, RebootStatusResponse, SetPackageRequest,
    SetPackageResponse, SwitchControlProcessorRequest, SwitchControlProcessorResponse,
    TimeRequest, TimeResponse, TracerouteRequest, TracerouteResponse,
};

use super::{now_nanos, ServiceContext};

/// `gnoi.system.System`. Only `Time` is supported.
pub struct SystemHandler {
    ctx: ServiceContext,
}

impl SystemHandler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Authorize, then refuse. Does not borrow `request` past the call.
    fn unsupported<T>(
        &self,
        request: &Request<T>,
        rpc: &'static str,
    ) -> impl Future<Output = Status> + Send + '_ {
        let authorized = self.ctx.authorize(request, rpc);
        async move {
            match authorized.await {
                Ok(_) => Status::unimplemented(""),
                Err(status) => status,
            }
        }
    }
}

#[tonic::async_trait]
impl System for SystemHandler {
    async fn reboot(
        &self,
        request: Request<RebootRequest>,
    ) -> Result<Response<RebootResponse>, Status> {
        let refused = self.unsupported(&request, "Reboot");
        Err(refused.await)
    }

    async fn reboot_status(
        &self,
        request: Request<RebootStatusRequest>,
    ) -> Result<Response<RebootStatusResponse>, Status> {
        let refused = self.unsupported(&request, "RebootStatus");
        Err(refused.await)
    }

    async fn cancel_reboot(
        &self,
        request: Request<CancelRebootRequest>,
    ) -> Result<Response<CancelRebootResponse>, Status> {
        let refused = self.unsupported(&request, "CancelReboot");
        Err(refused.await)
    }

    type PingStream = BoxStream<'static, Result<PingResponse, Status>>;

    async fn ping(
        &self,
        request: Request<PingRequest>,
    ) -> Result<Response<Self::PingStream>, Status> {
        let refused = self.unsupported(&request, "Ping");
        Err(refused.await)
    }

    type TracerouteStream = BoxStream<'static, Result<TracerouteResponse, Status>>;

    async fn traceroute(
        &self,
        request: Request<TracerouteRequest>,
    ) -> Result<Response<Self::TracerouteStream>, Status> {
        let refused = self.unsupported(&request, "Traceroute");
        Err(refused.await)
    }

    async fn set_package(
        &self,
        request: Request<Streaming<SetPackageRequest>>,
    ) -> Result<Response<SetPackageResponse>, Status> {
        let refused = self.unsupported(&request, "SetPackage");
        Err(refused.await)
    }

    async fn switch_control_processor(
        &self,
        request: Request<SwitchControlProcessorRequest>,
    ) -> Result<Response<SwitchControlProcessorResponse>, Status> {
        let refused = self.unsupported(&request, "SwitchControlProcessor");
        Err(refused.await)
    }

    async fn time(&self, request: Request<TimeRequest>) -> Result<Response<TimeResponse>, Status> {
        self.ctx.authorize(&request, "Time").await?;
        Ok(Response::new(TimeResponse { time: now_nanos()? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{authorized, context};
    use tonic::Code;

    #[tokio::test]
    async fn test_time_requires_auth() {
        let handler = SystemHandler::new(context("password,jwt"));
        let err = handler.time(Request::new(TimeRequest {})).await.unwrap_err();
        assert_eq!(err.code(), Code::PermissionDenied);
    }

    #[tokio::test]
    async fn test_time_non_decreasing() {
        let ctx = context("password,jwt");
        let handler = SystemHandler::new(ctx.clone());

        let first = handler
            .time(authorized(&ctx, TimeRequest {}))
            .await
            .unwrap()
            .into_inner()
            .time;
        let second = handler
            .time(authorized(&ctx, TimeRequest {}))
            .await
            .unwrap()
            .into_inner()
            .time;
        assert!(first > 0);
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_unsupported_after_auth() {
        let ctx = context("password,jwt");
        let handler = SystemHandler::new(ctx.clone());

        let err = handler
            .reboot(authorized(&ctx, RebootRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::Unimplemented);

        let err = handler
            .reboot(Request::new(RebootRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::PermissionDenied);
    }

    #[tokio::test]
    async fn test_all_disabled() {
        let handler = SystemHandler::new(context(""));
        let err = handler.time(Request::new(TimeRequest {})).await.unwrap_err();
        assert_eq!(err.code(), Code::Unimplemented);
    }
}
