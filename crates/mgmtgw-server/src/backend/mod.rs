//! The device configuration/action engine, seen through its interface.

mod memory;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use memory::{ActionFn, MemoryBackend, SUM_ACTION_URI};

/// Category of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    /// No resource at the path.
    NotFound,
    /// Resource already exists.
    AlreadyExists,
    /// Payload rejected.
    InvalidInput,
    /// Path or action not supported.
    NotSupported,
    /// Anything else.
    Internal,
}

/// A failed backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub code: BackendErrorCode,
    pub message: String,
}

impl BackendError {
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::AlreadyExists, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::InvalidInput, message)
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::NotSupported, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Internal, message)
    }
}

/// Backend failures reach callers as `Unknown` with the backend's message.
impl From<BackendError> for tonic::Status {
    fn from(err: BackendError) -> Self {
        tonic::Status::unknown(err.message)
    }
}

/// Resource and action API of the device.
///
/// Paths are URIs produced by [`crate::translate`]; payloads are JSON.
/// Calls are synchronous and may block.
pub trait Backend: Send + Sync + 'static {
    /// Read the subtree at `path`.
    fn get(&self, path: &str) -> Result<Value, BackendError>;

    /// Create a resource that must not exist yet.
    ///
    /// Part of the backend contract only: no RPC issues a create, since
    /// gNMI Set expresses writes as replace and update.
    fn create(&self, path: &str, payload: Value) -> Result<(), BackendError>;

    /// Replace the subtree at `path`.
    fn replace(&self, path: &str, payload: Value) -> Result<(), BackendError>;

    /// Merge `payload` into the subtree at `path`.
    fn update(&self, path: &str, payload: Value) -> Result<(), BackendError>;

    /// Remove the subtree at `path`.
    fn delete(&self, path: &str) -> Result<(), BackendError>;

    /// Invoke the action at `uri`.
    fn action(&self, uri: &str, input: Value) -> Result<Value, BackendError>;
}

/// Backend handle shared by all handlers.
pub type SharedBackend = Arc<dyn Backend>;

/// Run `f` against the backend on the blocking pool.
pub async fn run_blocking<T, F>(backend: &SharedBackend, f: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: FnOnce(&dyn Backend) -> Result<T, BackendError> + Send + 'static,
{
    let backend = Arc::clone(backend);
    tokio::task::spawn_blocking(move || f(backend.as_ref()))
        .await
        .map_err(|e| BackendError::internal(format!("backend task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_run_blocking() {
        let backend: SharedBackend = Arc::new(MemoryBackend::new());
        run_blocking(&backend, |b| b.replace("/a", json!(1)))
            .await
            .unwrap();
        let value = run_blocking(&backend, |b| b.get("/a")).await.unwrap();
        assert_eq!(value, json!(1));
    }

    #[test]
    fn test_status_carries_message() {
        let status = tonic::Status::from(BackendError::not_found("%Error: Resource not found"));
        assert_eq!(status.code(), tonic::Code::Unknown);
        assert_eq!(status.message(), "%Error: Resource not found");
    }
}
