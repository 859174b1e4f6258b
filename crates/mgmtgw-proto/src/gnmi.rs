//! gNMI configuration messages and the generated `gnmi.Gnmi` service stubs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::Path;
use crate::value::TypedValue;
use crate::xpath::{parse_path_value, parse_xpath};

/// Registered extension id carrying a [`BundleVersion`].
pub const BUNDLE_VERSION_EXTENSION_ID: i32 = 999;

/// A schema model the server supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelData {
    pub name: String,
    pub organization: String,
    pub version: String,
}

impl ModelData {
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            version: version.into(),
        }
    }
}

/// Data encodings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Encoding {
    Json,
    Bytes,
    Proto,
    Ascii,
    #[default]
    JsonIetf,
}

/// An extension attached to a request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    RegisteredExt(RegisteredExtension),
}

/// An extension identified by a registered numeric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisteredExtension {
    pub id: i32,
    pub msg: Vec<u8>,
}

/// Version tag of the model bundle a client was built against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleVersion {
    pub version: String,
}

impl Extension {
    /// Wrap a bundle version into its registered extension.
    pub fn bundle_version(version: impl Into<String>) -> Result<Self> {
        let msg = serde_json::to_vec(&BundleVersion {
            version: version.into(),
        })
        .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Extension::RegisteredExt(RegisteredExtension {
            id: BUNDLE_VERSION_EXTENSION_ID,
            msg,
        }))
    }

    /// Decode the bundle version carried by this extension, if it is one.
    pub fn as_bundle_version(&self) -> Option<Result<BundleVersion>> {
        match self {
            Extension::RegisteredExt(ext) if ext.id == BUNDLE_VERSION_EXTENSION_ID => Some(
                serde_json::from_slice(&ext.msg)
                    .map_err(|e| Error::Deserialization(e.to_string())),
            ),
            Extension::RegisteredExt(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityRequest {
    pub extension: Vec<Extension>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityResponse {
    pub supported_models: Vec<ModelData>,
    pub supported_encodings: Vec<Encoding>,
    pub gnmi_version: String,
    pub extension: Vec<Extension>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetRequest {
    pub prefix: Option<Path>,
    pub path: Vec<Path>,
    pub encoding: Encoding,
    pub extension: Vec<Extension>,
}

/// A path and the value found or written there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Update {
    pub path: Path,
    pub val: Option<TypedValue>,
}

impl Update {
    pub fn new(path: Path, val: TypedValue) -> Self {
        Self {
            path,
            val: Some(val),
        }
    }
}

/// A timestamped set of updates and deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub prefix: Option<Path>,
    pub update: Vec<Update>,
    pub delete: Vec<Path>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetResponse {
    pub notification: Vec<Notification>,
    pub extension: Vec<Extension>,
}

/// A configuration change: deletes, then replaces, then updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetRequest {
    pub prefix: Option<Path>,
    pub delete: Vec<Path>,
    pub replace: Vec<Update>,
    pub update: Vec<Update>,
    pub extension: Vec<Extension>,
}

impl SetRequest {
    /// Build a request from textual operator input.
    ///
    /// `delete` entries are xpaths; `replace` and `update` entries are
    /// `path:value` pairs.
    pub fn from_xpaths<S: AsRef<str>>(delete: &[S], replace: &[S], update: &[S]) -> Result<Self> {
        let to_update = |item: &S| {
            parse_path_value(item.as_ref()).map(|pv| Update::new(pv.path, pv.value))
        };

        Ok(Self {
            prefix: None,
            delete: delete
                .iter()
                .map(|p| parse_xpath(p.as_ref()))
                .collect::<Result<_>>()?,
            replace: replace.iter().map(to_update).collect::<Result<_>>()?,
            update: update.iter().map(to_update).collect::<Result<_>>()?,
            extension: Vec::new(),
        })
    }

    /// Set the target on the request prefix.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        let prefix = self.prefix.take().unwrap_or_default();
        self.prefix = Some(prefix.with_target(target));
        self
    }

    /// Attach a bundle version extension.
    pub fn with_bundle_version(mut self, version: impl Into<String>) -> Result<Self> {
        self.extension.push(Extension::bundle_version(version)?);
        Ok(self)
    }

    /// Bundle version carried by the request, if any.
    pub fn bundle_version(&self) -> Option<Result<BundleVersion>> {
        self.extension.iter().find_map(Extension::as_bundle_version)
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.replace.is_empty() && self.update.is_empty()
    }
}

/// Kind of operation applied by a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateOp {
    Delete,
    Replace,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub path: Path,
    pub op: UpdateOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetResponse {
    pub prefix: Option<Path>,
    pub response: Vec<UpdateResult>,
    pub timestamp: i64,
    pub extension: Vec<Extension>,
}

include!(concat!(env!("OUT_DIR"), "/gnmi.Gnmi.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_from_xpaths() {
        let req = SetRequest::from_xpaths(
            &["/openconfig-acl:acl/acl-sets"],
            &["/openconfig-system:system/config/hostname:\"sw1\""],
            &["/openconfig-interfaces:interfaces/interface[name=Ethernet0]/config/mtu:9100"],
        )
        .unwrap()
        .with_target("dut")
        .with_bundle_version("1.0.2")
        .unwrap();

        assert_eq!(req.delete.len(), 1);
        assert_eq!(req.replace[0].val, Some(TypedValue::StringVal("sw1".into())));
        assert_eq!(req.update[0].val, Some(TypedValue::IntVal(9100)));
        assert_eq!(req.prefix.as_ref().unwrap().target, "dut");
        assert_eq!(req.bundle_version().unwrap().unwrap().version, "1.0.2");
    }

    #[test]
    fn test_set_request_rejects_bad_xpath() {
        let err = SetRequest::from_xpaths(&["/a[k=v"], &[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_unregistered_extension_is_not_bundle_version() {
        let ext = Extension::RegisteredExt(RegisteredExtension { id: 1, msg: vec![] });
        assert!(ext.as_bundle_version().is_none());
    }

    #[test]
    fn test_encoding_wire_names() {
        let json = serde_json::to_string(&Encoding::JsonIetf).unwrap();
        assert_eq!(json, "\"JSON_IETF\"");
        let op: UpdateOp = serde_json::from_str("\"REPLACE\"").unwrap();
        assert_eq!(op, UpdateOp::Replace);
    }
}
