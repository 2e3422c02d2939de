use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use maestro_dashboard::api::ReportApi;
use maestro_dashboard::endpoints::Endpoint;
use maestro_dashboard::error::DashboardError;
use serde_json::Value;

/// In-memory reporting API keyed by endpoint path.
#[derive(Default)]
pub struct FakeApi {
    responses: HashMap<String, Value>,
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    /// Make `path` answer with a server error.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn was_requested(&self, path: &str) -> bool {
        self.requested().iter().any(|p| p == path)
    }
}

impl ReportApi for FakeApi {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, DashboardError> {
        let path = endpoint.to_string();
        self.requested.lock().unwrap().push(path.clone());

        if self.failing.contains(&path) {
            return Err(DashboardError::Status {
                url: path,
                status: 500,
            });
        }
        self.responses
            .get(&path)
            .cloned()
            .ok_or(DashboardError::Status {
                url: path,
                status: 404,
            })
    }

    fn link(&self, path: &str) -> String {
        format!("http://reports.test{path}")
    }
}
