//! Reporting API client.
//!
//! [`ReportApi`] is the seam the view layer fetches through; the
//! `reqwest` implementation talks to the reports server, tests substitute
//! an in-memory one.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::endpoints::Endpoint;
use crate::error::DashboardError;

pub trait ReportApi: Send + Sync {
    /// GET an endpoint and return its JSON body.
    fn get_json(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<Value, DashboardError>> + Send;

    /// Resolve a link handed out by the API (e.g. an archive download)
    /// into something a browser can follow.
    fn link(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Fetch an endpoint and parse it into `T`.
pub async fn fetch<T, A>(api: &A, endpoint: &Endpoint) -> Result<T, DashboardError>
where
    T: DeserializeOwned,
    A: ReportApi,
{
    let body = api.get_json(endpoint).await?;
    serde_json::from_value(body).map_err(|e| DashboardError::decode(endpoint.to_string(), e))
}

pub struct HttpReportApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpReportApi {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| DashboardError::Network {
                url: base.to_string(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.segments());
        }
        url
    }
}

impl ReportApi for HttpReportApi {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, DashboardError> {
        let url = self.url_for(endpoint);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| DashboardError::decode(url.as_str(), e))
    }

    fn link(&self, path: &str) -> String {
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| path.to_string())
    }
}

fn network_error(url: &Url, e: reqwest::Error) -> DashboardError {
    let reason = if e.is_connect() {
        "cannot connect to the reports server".to_string()
    } else if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    DashboardError::Network {
        url: url.to_string(),
        reason,
    }
}
