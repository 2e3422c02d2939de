//! Response shapes of the reporting API.
//!
//! Every struct here is parsed at the fetch boundary. Fields are optional
//! because the reporting API omits whatever a host did not record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Role of a test participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Sender,
    Receiver,
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value {
            "sender" => Role::Sender,
            "receiver" => Role::Receiver,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Sender => "sender",
            Role::Receiver => "receiver",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the report/test properties endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    #[serde(alias = "envResourceRole")]
    pub role: Option<Role>,
    pub protocol: Option<String>,
    pub duration: Option<Value>,
    pub duration_type: Option<String>,
    pub fcl: Option<f64>,
    pub api_name: Option<String>,
    pub api_version: Option<String>,
    pub parallel_count: Option<i64>,
    pub message_size: Option<i64>,
    pub variable_size: Option<bool>,
    pub rate: Option<i64>,
    pub limit_destinations: Option<i64>,
    pub broker_uri: Option<String>,
}

/// `/report/report/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    #[serde(alias = "role")]
    pub test_host_role: Option<Role>,
}

/// Row of the report index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub report_id: Option<i64>,
    pub test_id: Option<i64>,
    pub test_number: Option<i64>,
    pub test_name: Option<String>,
    pub test_script: Option<String>,
    pub test_host: Option<String>,
    pub test_host_role: Option<Role>,
    pub test_result: Option<String>,
    pub test_result_message: Option<String>,
    pub test_date: Option<Value>,
    pub aggregated: Option<bool>,
    pub valid: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyStatistics {
    /// Role of the host that recorded these statistics, when the API
    /// reports it.
    pub env_resource_role: Option<Role>,
    pub latency_total_count: Option<f64>,
    pub latency_max_value: Option<f64>,
    pub latency50th: Option<f64>,
    pub latency90th: Option<f64>,
    pub latency95th: Option<f64>,
    pub latency99th: Option<f64>,
    pub latency999th: Option<f64>,
    pub latency9999th: Option<f64>,
    pub latency99999th: Option<f64>,
    pub latency_mean: Option<f64>,
    pub latency_std_deviation: Option<f64>,
    #[serde(rename = "latencyStartTS")]
    pub latency_start_ts: Option<f64>,
    #[serde(rename = "latencyEndTS")]
    pub latency_end_ts: Option<f64>,
}

/// Latency statistics endpoint payload. Either list may be empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatencyProperties {
    #[serde(rename = "ServiceTimeStatistics", default)]
    pub service_time: Vec<LatencyStatistics>,
    #[serde(rename = "ResponseTimeStatistics", default)]
    pub response_time: Vec<LatencyStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateStatistics {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub geometric_mean: Option<f64>,
    pub standard_deviation: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RateStatistics {
    /// Look up a field by its wire name, including the ones not modelled.
    pub fn field(&self, name: &str) -> Option<Value> {
        let known = match name {
            "max" => self.max,
            "min" => self.min,
            "mean" => self.mean,
            "geometricMean" => self.geometric_mean,
            "standardDeviation" => self.standard_deviation,
            _ => return self.extra.get(name).filter(|v| !v.is_null()).cloned(),
        };
        known.map(Value::from)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateProperties {
    #[serde(rename = "Statistics", default)]
    pub statistics: Vec<RateStatistics>,
}

/// Entry of the archive file list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveFile {
    pub name: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SutNodeInfo {
    pub sut_node_id: Option<i64>,
    pub sut_node_name: Option<String>,
    pub sut_node_os_name: Option<String>,
    pub sut_node_os_arch: Option<String>,
    pub sut_node_os_version: Option<String>,
    pub sut_node_os_other: Option<String>,
    pub sut_node_hw_name: Option<String>,
    pub sut_node_hw_model: Option<String>,
    pub sut_node_hw_cpu: Option<String>,
    pub sut_node_hw_cpu_count: Option<i64>,
    pub sut_node_hw_ram: Option<i64>,
    pub sut_node_hw_disk_type: Option<String>,
    pub sut_node_hw_other: Option<String>,
}

/// Chart payload: the x-axis field and each series, keyed by name.
pub type ChartPayload = Map<String, Value>;

/// Fold the roles of a test's report records into the role of the test:
/// any receiver wins, then any sender, otherwise whatever the first
/// record claims.
pub fn test_host_role(records: &[ReportRecord]) -> Role {
    let roles: Vec<&Role> = records.iter().filter_map(|r| r.role.as_ref()).collect();

    if roles.iter().any(|r| **r == Role::Receiver) {
        Role::Receiver
    } else if roles.iter().any(|r| **r == Role::Sender) {
        Role::Sender
    } else {
        roles
            .first()
            .map(|r| (*r).clone())
            .unwrap_or_else(|| Role::Other(String::new()))
    }
}
