//! Vendor operations (`gnoi.sonic.SonicService`).
//!
//! Every request wraps its parameters in an `input` object and every
//! response its result in an `output` object; field names follow the
//! backend's YANG naming so the messages pass through the action bridge
//! without per-field mapping.

use serde::{Deserialize, Serialize};

/// Status returned by most vendor actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonicOutput {
    pub status: i32,
    #[serde(rename = "status-detail")]
    pub status_detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechsupportInput {
    /// Only collect logs newer than this date; empty for everything.
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechsupportRequest {
    pub input: TechsupportInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechsupportOutput {
    #[serde(rename = "output-filename")]
    pub output_filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechsupportResponse {
    pub output: TechsupportOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SumInput {
    pub left: i32,
    pub right: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SumRequest {
    pub input: SumInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SumOutput {
    pub result: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SumResponse {
    pub output: SumOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfigInput {
    pub source: String,
    pub overwrite: bool,
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfigRequest {
    pub input: CopyConfigInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfigResponse {
    pub output: SonicOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInput {
    pub imagename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInstallRequest {
    pub input: ImageInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInstallResponse {
    pub output: SonicOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRemoveRequest {
    pub input: ImageInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRemoveResponse {
    pub output: SonicOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefaultRequest {
    pub input: ImageInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefaultResponse {
    pub output: SonicOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearNeighborsInput {
    pub force: bool,
    pub family: String,
    pub ip: String,
    pub ifname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearNeighborsRequest {
    pub input: ClearNeighborsInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearNeighborsOutput {
    pub response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearNeighborsResponse {
    pub output: ClearNeighborsOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAuditLogInput {
    /// `all` for the full log, anything else for the most recent entries.
    #[serde(rename = "content-type")]
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAuditLogRequest {
    pub input: GetAuditLogInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditLogOutput {
    #[serde(rename = "audit-content")]
    pub audit_content: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAuditLogResponse {
    pub output: AuditLogOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearAuditLogRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearAuditLogResponse {
    pub output: SonicOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFileInput {
    pub file_path: String,
}

/// Request shared by the save/reload/load configuration-file operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFileRequest {
    pub input: ConfigFileInput,
}

impl ConfigFileRequest {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            input: ConfigFileInput {
                file_path: file_path.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFileResponse {
    pub output: SonicOutput,
}

include!(concat!(env!("OUT_DIR"), "/gnoi.sonic.SonicService.rs"));

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kebab_field_names() {
        let resp: TechsupportResponse =
            serde_json::from_value(json!({"output": {"output-filename": "/var/dump/a.tar.gz"}}))
                .unwrap();
        assert_eq!(resp.output.output_filename, "/var/dump/a.tar.gz");

        let req = GetAuditLogRequest {
            input: GetAuditLogInput {
                content_type: "all".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({"input": {"content-type": "all"}})
        );
    }

    #[test]
    fn test_missing_output_fields_default() {
        let resp: ConfigFileResponse = serde_json::from_value(json!({"output": {}})).unwrap();
        assert_eq!(resp.output, SonicOutput::default());
        let resp: CopyConfigResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.output.status, 0);
    }
}
