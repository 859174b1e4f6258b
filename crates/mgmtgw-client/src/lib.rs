//! mgmtgw client - client library for the management gateway.
//!
//! Wraps the generated gRPC stubs with bearer-token metadata and TLS.
//!
//! # Quick Start
//!
//! ```ignore
//! use mgmtgw_client::{Client, ClientConfig};
//! use mgmtgw_proto::SetRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and log in; the token is kept for later calls
//!     let client = Client::connect(ClientConfig::localhost()).await?;
//!     client.authenticate("admin", "password").await?;
//!
//!     // Change the hostname
//!     let set = SetRequest::from_xpaths::<&str>(
//!         &[],
//!         &[],
//!         &["/openconfig-system:system/config/hostname:\"sw1\""],
//!     )?;
//!     client.set(set).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{AuthChannel, Client, TokenInterceptor};
pub use config::{ClientConfig, TlsOptions};
pub use error::Error;

/// Re-export protocol types.
pub use mgmtgw_proto as proto;
