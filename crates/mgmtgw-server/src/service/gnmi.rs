use serde_json::Value;
use tonic::{Request, Response, Status};

use mgmtgw_proto::gnmi::gnmi_server::Gnmi;
use mgmtgw_proto::gnmi::{CapabilityRequest, CapabilityResponse, Encoding, ModelData};
use mgmtgw_proto::{
    GetRequest, GetResponse, Notification, Path, SetRequest, SetResponse, TypedValue, Update,
    UpdateOp, UpdateResult, GNMI_VERSION,
};

use super::{now_nanos, ServiceContext};
use crate::backend::{run_blocking, Backend, BackendError};
use crate::translate::translate;

/// `gnmi.Gnmi`: configuration reads and writes against the backend.
pub struct GnmiHandler {
    ctx: ServiceContext,
}

impl GnmiHandler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }
}

fn supported_models() -> Vec<ModelData> {
    vec![
        ModelData::new("openconfig-acl", "OpenConfig working group", "1.1"),
        ModelData::new("openconfig-vlan", "Broadcom", "1.0"),
    ]
}

fn timestamp() -> Result<i64, Status> {
    i64::try_from(now_nanos()?).map_err(|_| Status::internal("system clock overflow"))
}

/// One write of a set, ready for the backend.
enum Operation {
    Delete { path: Path, uri: String },
    Replace { path: Path, uri: String, payload: Value },
    Update { path: Path, uri: String, payload: Value },
}

impl Operation {
    fn apply(self, backend: &dyn Backend) -> Result<UpdateResult, BackendError> {
        let (path, op) = match self {
            Operation::Delete { path, uri } => {
                backend.delete(&uri)?;
                (path, UpdateOp::Delete)
            }
            Operation::Replace { path, uri, payload } => {
                backend.replace(&uri, payload)?;
                (path, UpdateOp::Replace)
            }
            Operation::Update { path, uri, payload } => {
                backend.update(&uri, payload)?;
                (path, UpdateOp::Update)
            }
        };
        Ok(UpdateResult { path, op })
    }
}

fn payload(update: &Update, uri: &str) -> Result<Value, Status> {
    let value = update
        .val
        .as_ref()
        .ok_or_else(|| Status::invalid_argument(format!("no value for {}", uri)))?;
    value
        .to_json()
        .map_err(|e| Status::invalid_argument(format!("{}: {}", uri, e)))
}

/// Translate and validate every write before any is applied.
fn plan(request: &SetRequest) -> Result<Vec<Operation>, Status> {
    let prefix = request.prefix.as_ref();
    let mut ops = Vec::with_capacity(
        request.delete.len() + request.replace.len() + request.update.len(),
    );

    for path in &request.delete {
        ops.push(Operation::Delete {
            uri: translate(prefix, path),
            path: path.clone(),
        });
    }
    for update in &request.replace {
        let uri = translate(prefix, &update.path);
        ops.push(Operation::Replace {
            payload: payload(update, &uri)?,
            path: update.path.clone(),
            uri,
        });
    }
    for update in &request.update {
        let uri = translate(prefix, &update.path);
        ops.push(Operation::Update {
            payload: payload(update, &uri)?,
            path: update.path.clone(),
            uri,
        });
    }
    Ok(ops)
}

#[tonic::async_trait]
impl Gnmi for GnmiHandler {
    async fn capabilities(
        &self,
        request: Request<CapabilityRequest>,
    ) -> Result<Response<CapabilityResponse>, Status> {
        self.ctx.authorize(&request, "Capabilities").await?;
        Ok(Response::new(CapabilityResponse {
            supported_models: supported_models(),
            supported_encodings: vec![Encoding::JsonIetf],
            gnmi_version: GNMI_VERSION.to_string(),
            extension: Vec::new(),
        }))
    }

    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let identity = self.ctx.authorize(&request, "Get").await?;
        let request = request.into_inner();
        if request.encoding != Encoding::JsonIetf {
            return Err(Status::unimplemented(format!(
                "unsupported encoding {:?}",
                request.encoding
            )));
        }

        let mut notification = Vec::with_capacity(request.path.len());
        for path in request.path {
            let uri = translate(request.prefix.as_ref(), &path);
            tracing::debug!(user = %identity.username, uri = %uri, "get");

            let value = run_blocking(self.ctx.backend(), move |backend| backend.get(&uri))
                .await
                .map_err(|e| {
                    tracing::info!(error = %e, "get failed");
                    Status::from(e)
                })?;
            let encoded = serde_json::to_vec(&value)
                .map_err(|e| Status::internal(format!("cannot encode value: {}", e)))?;

            notification.push(Notification {
                timestamp: timestamp()?,
                prefix: request.prefix.clone(),
                update: vec![Update::new(path, TypedValue::json_ietf(encoded))],
                delete: Vec::new(),
            });
        }

        Ok(Response::new(GetResponse {
            notification,
            extension: Vec::new(),
        }))
    }

    async fn set(&self, request: Request<SetRequest>) -> Result<Response<SetResponse>, Status> {
        let identity = self.ctx.authorize(&request, "Set").await?;
        let request = request.into_inner();

        match request.bundle_version() {
            Some(Ok(bundle)) => {
                tracing::info!(user = %identity.username, version = %bundle.version, "set with bundle version")
            }
            Some(Err(e)) => return Err(Status::invalid_argument(e.to_string())),
            None => {}
        }

        let ops = plan(&request).map_err(|status| {
            tracing::info!(user = %identity.username, error = %status.message(), "set rejected");
            status
        })?;
        tracing::info!(
            user = %identity.username,
            deletes = request.delete.len(),
            replaces = request.replace.len(),
            updates = request.update.len(),
            "set"
        );

        let response: Vec<UpdateResult> = run_blocking(self.ctx.backend(), move |backend| {
            ops.into_iter().map(|op| op.apply(backend)).collect()
        })
        .await
        .map_err(|e| {
            tracing::warn!(user = %identity.username, error = %e, "set failed");
            Status::from(e)
        })?;

        Ok(Response::new(SetResponse {
            prefix: request.prefix,
            response,
            timestamp: timestamp()?,
            extension: Vec::new(),
        }))
    }
}
