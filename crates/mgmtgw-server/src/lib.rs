//! mgmtgw server library.
//!
//! This crate provides the gateway core: per-call authentication, path
//! translation, action dispatch to a configuration backend, the RPC
//! handlers built on them, and the tonic transport that serves them.

pub mod actions;
pub mod auth;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod service;
pub mod translate;
pub mod transport;

pub use auth::{AuthConfig, AuthGateway, AuthScheme, CallContext, Identity};
pub use backend::{Backend, BackendError, MemoryBackend, SharedBackend};
pub use config::{Args, ServerConfig};
pub use dispatch::ActionDispatcher;
pub use error::Error;
pub use service::ServiceContext;
pub use translate::translate;
pub use transport::{create_transport, Transport};
