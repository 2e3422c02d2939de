//! Reporting API endpoint paths.
//!
//! Endpoints are kept as raw path segments; the HTTP client encodes them
//! when joining onto the configured API base.

use std::fmt;

use crate::model::Role;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Endpoint {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// `/report/`: every report known to the API.
pub fn all_reports() -> Endpoint {
    Endpoint::new(["report", ""])
}

pub fn report_info(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "report", report_id])
}

pub fn report_properties(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "report", report_id, "properties"])
}

pub fn test_properties(test_id: &str, test_number: &str) -> Endpoint {
    Endpoint::new(["report", "test", test_id, "number", test_number, "properties"])
}

pub fn report_latency_distribution(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "latency", "all", "report", report_id])
}

pub fn test_latency_distribution(test_id: &str, test_number: &str) -> Endpoint {
    Endpoint::new(["report", "latency", "aggregated", "test", test_id, "number", test_number])
}

pub fn report_latency_statistics(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "latency", "statistics", "report", report_id])
}

pub fn test_latency_statistics(test_id: &str, test_number: &str) -> Endpoint {
    Endpoint::new([
        "report", "latency", "aggregated", "statistics", "test", test_id, "number", test_number,
    ])
}

pub fn report_rate_distribution(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "rate", "report", report_id])
}

pub fn test_rate_distribution(role: &Role, test_id: &str, test_number: &str) -> Endpoint {
    Endpoint::new([
        "report",
        "rate",
        role.as_str(),
        "aggregated",
        "test",
        test_id,
        "number",
        test_number,
    ])
}

pub fn report_rate_statistics(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "rate", "statistics", "report", report_id])
}

pub fn test_rate_statistics(role: &Role, test_id: &str, test_number: &str) -> Endpoint {
    Endpoint::new([
        "report",
        "rate",
        role.as_str(),
        "aggregated",
        "statistics",
        "test",
        test_id,
        "number",
        test_number,
    ])
}

pub fn report_files(report_id: &str) -> Endpoint {
    Endpoint::new(["report", "report", report_id, "files"])
}

pub fn sut_node_info(test_id: &str) -> Endpoint {
    Endpoint::new(["report", "sut", "node", "info", "test", test_id])
}
