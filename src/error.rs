use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Reporting API returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),

    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

impl DashboardError {
    pub fn decode(url: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::Decode {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Network { .. } => StatusCode::BAD_GATEWAY,
            DashboardError::Status { .. } => StatusCode::BAD_GATEWAY,
            DashboardError::Decode { .. } => StatusCode::BAD_GATEWAY,
            DashboardError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            DashboardError::InvalidApiBase(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::UnknownPage(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
