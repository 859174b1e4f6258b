//! Generates the tonic client and server stubs for every exposed service.
//!
//! Services are described with `tonic_build::manual` so no `.proto` files or
//! `protoc` are needed; every method is wired to the JSON codec in
//! `crate::codec`.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "crate::codec::JsonCodec";

struct Rpc {
    name: &'static str,
    route: &'static str,
    input: &'static str,
    output: &'static str,
    client_streaming: bool,
    server_streaming: bool,
}

fn unary(
    name: &'static str,
    route: &'static str,
    input: &'static str,
    output: &'static str,
) -> Rpc {
    Rpc {
        name,
        route,
        input,
        output,
        client_streaming: false,
        server_streaming: false,
    }
}

impl Rpc {
    fn server_streaming(mut self) -> Self {
        self.server_streaming = true;
        self
    }

    fn client_streaming(mut self) -> Self {
        self.client_streaming = true;
        self
    }

    fn build(&self, module: &str) -> Method {
        let mut builder = Method::builder()
            .name(self.name)
            .route_name(self.route)
            .input_type(format!("crate::{}::{}", module, self.input))
            .output_type(format!("crate::{}::{}", module, self.output))
            .codec_path(CODEC);
        if self.client_streaming {
            builder = builder.client_streaming();
        }
        if self.server_streaming {
            builder = builder.server_streaming();
        }
        builder.build()
    }
}

fn service(package: &str, name: &str, module: &str, rpcs: &[Rpc]) -> Service {
    rpcs.iter()
        .fold(
            Service::builder().name(name).package(package),
            |builder, rpc| builder.method(rpc.build(module)),
        )
        .build()
}

fn main() {
    let gnmi = service(
        "gnmi",
        "Gnmi",
        "gnmi",
        &[
            unary("capabilities", "Capabilities", "CapabilityRequest", "CapabilityResponse"),
            unary("get", "Get", "GetRequest", "GetResponse"),
            unary("set", "Set", "SetRequest", "SetResponse"),
        ],
    );

    let system = service(
        "gnoi.system",
        "System",
        "system",
        &[
            unary("reboot", "Reboot", "RebootRequest", "RebootResponse"),
            unary("reboot_status", "RebootStatus", "RebootStatusRequest", "RebootStatusResponse"),
            unary("cancel_reboot", "CancelReboot", "CancelRebootRequest", "CancelRebootResponse"),
            unary("ping", "Ping", "PingRequest", "PingResponse").server_streaming(),
            unary("traceroute", "Traceroute", "TracerouteRequest", "TracerouteResponse")
                .server_streaming(),
            unary("set_package", "SetPackage", "SetPackageRequest", "SetPackageResponse")
                .client_streaming(),
            unary(
                "switch_control_processor",
                "SwitchControlProcessor",
                "SwitchControlProcessorRequest",
                "SwitchControlProcessorResponse",
            ),
            unary("time", "Time", "TimeRequest", "TimeResponse"),
        ],
    );

    let sonic = service(
        "gnoi.sonic",
        "SonicService",
        "sonic",
        &[
            unary("show_techsupport", "ShowTechsupport", "TechsupportRequest", "TechsupportResponse"),
            unary("sum", "Sum", "SumRequest", "SumResponse"),
            unary("copy_config", "CopyConfig", "CopyConfigRequest", "CopyConfigResponse"),
            unary("image_install", "ImageInstall", "ImageInstallRequest", "ImageInstallResponse"),
            unary("image_remove", "ImageRemove", "ImageRemoveRequest", "ImageRemoveResponse"),
            unary("image_default", "ImageDefault", "ImageDefaultRequest", "ImageDefaultResponse"),
            unary("clear_neighbors", "ClearNeighbors", "ClearNeighborsRequest", "ClearNeighborsResponse"),
            unary("get_audit_log", "GetAuditLog", "GetAuditLogRequest", "GetAuditLogResponse"),
            unary("clear_audit_log", "ClearAuditLog", "ClearAuditLogRequest", "ClearAuditLogResponse"),
            unary("save_config", "SaveConfig", "ConfigFileRequest", "ConfigFileResponse"),
            unary("reload_config", "ReloadConfig", "ConfigFileRequest", "ConfigFileResponse"),
            unary("load_mgmt_config", "LoadMgmtConfig", "ConfigFileRequest", "ConfigFileResponse"),
            unary("load_minigraph", "LoadMinigraph", "ConfigFileRequest", "ConfigFileResponse"),
        ],
    );

    let jwt = service(
        "gnoi.jwt",
        "JwtService",
        "jwt",
        &[
            unary("authenticate", "Authenticate", "AuthenticateRequest", "AuthenticateResponse"),
            unary("refresh", "Refresh", "RefreshRequest", "RefreshResponse"),
        ],
    );

    Builder::new().compile(&[gnmi, system, sonic, jwt]);
}
