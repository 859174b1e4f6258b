//! One gNOI call, chosen by module and RPC name.

use anyhow::{bail, Context};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde_json::Value;

use mgmtgw_client::proto::jwt::{AuthenticateRequest, RefreshRequest};
use mgmtgw_client::proto::sonic::{
    ClearAuditLogRequest, ClearNeighborsRequest, ConfigFileRequest, CopyConfigRequest,
    GetAuditLogRequest, ImageDefaultRequest, ImageInstallRequest, ImageRemoveRequest, SumRequest,
    TechsupportRequest,
};
use mgmtgw_client::proto::system::TimeRequest;
use mgmtgw_client::Client;

/// Service an RPC belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Module {
    System,
    Sonic,
    Jwt,
}

impl Module {
    /// RPC names accepted for this module.
    pub fn rpcs(self) -> &'static [&'static str] {
        match self {
            Module::System => &["Time"],
            Module::Sonic => &[
                "ShowTechsupport",
                "Sum",
                "CopyConfig",
                "ImageInstall",
                "ImageRemove",
                "ImageDefault",
                "ClearNeighbors",
                "GetAuditLog",
                "ClearAuditLog",
                "SaveConfig",
                "ReloadConfig",
                "LoadMgmtConfig",
                "LoadMinigraph",
            ],
            Module::Jwt => &["Authenticate", "Refresh"],
        }
    }
}

/// Fold `imageInstall`, `image_install` and `ImageInstall` together.
fn normalize(rpc: &str) -> String {
    rpc.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Decode the `--jsonin` argument; empty input means an empty request.
fn input<T: DeserializeOwned + Default>(json: &str) -> anyhow::Result<T> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json).context("invalid --jsonin")
}

macro_rules! unary {
    ($stub:expr, $method:ident, $request:ty, $json:expr) => {{
        let request: $request = input($json)?;
        let response = $stub.$method(request).await?.into_inner();
        serde_json::to_value(response)?
    }};
}

/// Send one RPC and return its response as JSON.
pub async fn call(client: &Client, module: Module, rpc: &str, json: &str) -> anyhow::Result<Value> {
    let name = normalize(rpc);
    tracing::debug!(?module, rpc = %rpc, "calling");

    let response = match module {
        Module::System => {
            let mut stub = client.system();
            match name.as_str() {
                "time" => unary!(stub, time, TimeRequest, json),
                _ => bail!(unknown(module, rpc)),
            }
        }
        Module::Sonic => {
            let mut stub = client.sonic();
            match name.as_str() {
                "showtechsupport" => unary!(stub, show_techsupport, TechsupportRequest, json),
                "sum" => unary!(stub, sum, SumRequest, json),
                "copyconfig" => unary!(stub, copy_config, CopyConfigRequest, json),
                "imageinstall" => unary!(stub, image_install, ImageInstallRequest, json),
                "imageremove" => unary!(stub, image_remove, ImageRemoveRequest, json),
                "imagedefault" => unary!(stub, image_default, ImageDefaultRequest, json),
                "clearneighbors" => unary!(stub, clear_neighbors, ClearNeighborsRequest, json),
                "getauditlog" => unary!(stub, get_audit_log, GetAuditLogRequest, json),
                "clearauditlog" => unary!(stub, clear_audit_log, ClearAuditLogRequest, json),
                "saveconfig" => unary!(stub, save_config, ConfigFileRequest, json),
                "reloadconfig" => unary!(stub, reload_config, ConfigFileRequest, json),
                "loadmgmtconfig" => unary!(stub, load_mgmt_config, ConfigFileRequest, json),
                "loadminigraph" => unary!(stub, load_minigraph, ConfigFileRequest, json),
                // Older scripts reach the login calls through the vendor module.
                "authenticate" => unary!(client.jwt(), authenticate, AuthenticateRequest, json),
                "refresh" => unary!(client.jwt(), refresh, RefreshRequest, json),
                _ => bail!(unknown(module, rpc)),
            }
        }
        Module::Jwt => {
            let mut stub = client.jwt();
            match name.as_str() {
                "authenticate" => unary!(stub, authenticate, AuthenticateRequest, json),
                "refresh" => unary!(stub, refresh, RefreshRequest, json),
                _ => bail!(unknown(module, rpc)),
            }
        }
    };
    Ok(response)
}

fn unknown(module: Module, rpc: &str) -> String {
    format!(
        "unknown {:?} rpc {:?}; expected one of: {}",
        module,
        rpc,
        module.rpcs().join(", ")
    )
}
