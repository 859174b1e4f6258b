//! gNOI system operations and the generated `gnoi.system.System` stubs.

use serde::{Deserialize, Serialize};

use crate::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebootMethod {
    #[default]
    Unknown,
    Cold,
    Powerdown,
    Halt,
    Warm,
    Nsf,
    Powerup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebootRequest {
    pub method: RebootMethod,
    /// Delay in nanoseconds before the reboot starts.
    pub delay: u64,
    pub message: String,
    pub subcomponents: Vec<Path>,
    pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebootResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebootStatusRequest {
    pub subcomponents: Vec<Path>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebootStatusResponse {
    pub active: bool,
    pub wait: u64,
    pub when: u64,
    pub reason: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelRebootRequest {
    pub message: String,
    pub subcomponents: Vec<Path>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRebootResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingRequest {
    pub destination: String,
    pub source: String,
    pub count: i32,
    /// Nanoseconds between requests.
    pub interval: i64,
    /// Nanoseconds to wait for a response.
    pub wait: i64,
    pub size: i32,
    pub do_not_fragment: bool,
    pub do_not_resolve: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingResponse {
    pub source: String,
    pub time: i64,
    pub sent: i32,
    pub received: i32,
    pub min_time: i64,
    pub avg_time: i64,
    pub max_time: i64,
    pub std_dev: i64,
    pub bytes: i32,
    pub sequence: i32,
    pub ttl: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerouteRequest {
    pub source: String,
    pub destination: String,
    pub initial_ttl: u32,
    pub max_ttl: i32,
    pub wait: i64,
    pub do_not_fragment: bool,
    pub do_not_resolve: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerouteResponse {
    pub destination_name: String,
    pub destination_address: String,
    pub hops: i32,
    pub packet_size: i32,
    pub hop: i32,
    pub address: String,
    pub name: String,
    pub rtt: i64,
}

/// Package metadata sent as the first message of a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    pub filename: String,
    pub version: String,
    pub activate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashType {
    pub method: String,
    pub hash: Vec<u8>,
}

/// One message of a package transfer: metadata, a content chunk, or the final hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPackageRequest {
    Package(Package),
    Contents(Vec<u8>),
    Hash(HashType),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPackageResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchControlProcessorRequest {
    pub control_processor: Option<Path>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchControlProcessorResponse {
    pub control_processor: Option<Path>,
    pub version: String,
    pub uptime: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeResponse {
    /// Nanoseconds since the Unix epoch.
    pub time: u64,
}

include!(concat!(env!("OUT_DIR"), "/gnoi.system.System.rs"));
