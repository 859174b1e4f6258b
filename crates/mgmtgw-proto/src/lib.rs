//! Wire types for the mgmtgw management gateway.
//!
//! This crate defines the messages exchanged over the gateway's gRPC
//! services, the structured path model they address, and the JSON codec the
//! generated client and server stubs use on the wire.
//!
//! # Modules
//!
//! - [`path`] - Structured, keyed paths
//! - [`value`] - Typed leaf values
//! - [`xpath`] - Parsing of textual paths and `path:value` pairs
//! - [`gnmi`] - Configuration service (`gnmi.Gnmi`)
//! - [`system`] - System operations (`gnoi.system.System`)
//! - [`sonic`] - Vendor operations (`gnoi.sonic.SonicService`)
//! - [`jwt`] - Token login (`gnoi.jwt.JwtService`)
//! - [`codec`] - JSON message codec
//! - [`error`] - Protocol error types
//!
//! # Example
//!
//! ```
//! use mgmtgw_proto::{parse_xpath, SetRequest};
//!
//! let path = parse_xpath("/interfaces/interface[name=Ethernet0]/config").unwrap();
//! assert_eq!(path.len(), 3);
//!
//! let req = SetRequest::from_xpaths(
//!     &["/openconfig-acl:acl/acl-sets"],
//!     &[],
//!     &["/openconfig-system:system/config/hostname:\"sw1\""],
//! )
//! .unwrap();
//! assert_eq!(req.update.len(), 1);
//! ```

pub mod codec;
pub mod error;
pub mod gnmi;
pub mod jwt;
pub mod path;
pub mod sonic;
pub mod system;
pub mod value;
pub mod xpath;

pub use error::{Error, Result};

// Re-export commonly used types at crate root
pub use gnmi::{
    BundleVersion, Extension, GetRequest, GetResponse, Notification, SetRequest, SetResponse,
    Update, UpdateOp, UpdateResult, BUNDLE_VERSION_EXTENSION_ID,
};
pub use jwt::{JwtToken, ACCESS_TOKEN_KEY};
pub use path::{KeyMap, Path, PathElem};
pub use value::TypedValue;
pub use xpath::{parse_path_value, parse_value, parse_xpath, PathValue};

/// gNMI protocol version implemented by the gateway.
pub const GNMI_VERSION: &str = "0.7.0";
