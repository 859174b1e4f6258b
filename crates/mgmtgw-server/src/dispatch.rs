//! Typed request to backend action bridge.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::actions::ActionSpec;
use crate::backend::{run_blocking, BackendError, SharedBackend};

/// Failure of an action invocation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The typed request could not be turned into JSON.
    #[error("cannot encode input for {uri}: {reason}")]
    Encode { uri: &'static str, reason: String },

    /// The backend rejected the action.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The backend reply does not match the response type.
    #[error("cannot decode output of {uri}: {reason}")]
    Decode { uri: &'static str, reason: String },
}

/// Every dispatch failure is `Unknown`; backend failures keep their message.
impl From<DispatchError> for tonic::Status {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Backend(e) => e.into(),
            other => tonic::Status::unknown(other.to_string()),
        }
    }
}

/// Invokes backend actions on behalf of typed RPCs.
#[derive(Clone)]
pub struct ActionDispatcher {
    backend: SharedBackend,
}

impl ActionDispatcher {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Run `action` with `request` as input and decode the reply.
    pub async fn invoke<Req, Resp>(
        &self,
        action: &ActionSpec,
        request: &Req,
    ) -> Result<Resp, DispatchError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let input = encode_input(action, request)?;
        let uri = action.uri;
        let output = run_blocking(&self.backend, move |backend| backend.action(uri, input)).await?;
        decode_output(action, output)
    }
}

fn encode_input<Req: Serialize>(action: &ActionSpec, request: &Req) -> Result<Value, DispatchError> {
    let mut value = serde_json::to_value(request).map_err(|e| DispatchError::Encode {
        uri: action.uri,
        reason: e.to_string(),
    })?;

    if let (Some(key), Value::Object(map)) = (action.input_key(), &mut value) {
        if let Some(input) = map.remove("input") {
            map.insert(key, input);
        }
    }
    Ok(value)
}

fn decode_output<Resp: DeserializeOwned>(
    action: &ActionSpec,
    mut output: Value,
) -> Result<Resp, DispatchError> {
    if let Value::Object(map) = &mut output {
        if let Some(result) = map.remove(&action.output_key()) {
            map.insert("output".to_string(), result);
        }
    }

    serde_json::from_value(output).map_err(|e| DispatchError::Decode {
        uri: action.uri,
        reason: e.to_string(),
    })
}
