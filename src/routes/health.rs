use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::api::{HttpReportApi, ReportApi};
use crate::endpoints;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub api: ApiHealth,
    pub dashboard: DashboardInfo,
}

#[derive(Serialize)]
pub struct ApiHealth {
    pub base: String,
    pub responding: bool,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct DashboardInfo {
    pub version: String,
    pub port: u16,
    pub page_length: usize,
    pub skip_count_field: String,
}

/// Determine the overall status string from the reporting API check.
/// This is a pure function extracted for testability.
pub fn determine_overall_status(api_responding: bool) -> &'static str {
    if api_responding {
        "healthy"
    } else {
        "degraded"
    }
}

/// GET /health: dashboard status and reachability of the reporting API.
pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<HealthResponse>) {
    let response = build_health_response(&state).await;
    let code = if response.api.responding {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}

pub async fn build_health_response(state: &SharedState) -> HealthResponse {
    let failure = check_api(&state.api).await;
    let responding = failure.is_none();

    HealthResponse {
        status: determine_overall_status(responding).to_string(),
        api: ApiHealth {
            base: state.api.base().to_string(),
            responding,
            error: failure,
        },
        dashboard: DashboardInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            port: state.config.port,
            page_length: state.config.page_length,
            skip_count_field: state.config.skip_count_field.clone(),
        },
    }
}

/// Fetch the report listing; returns the failure reason, if any.
async fn check_api(api: &HttpReportApi) -> Option<String> {
    match api.get_json(&endpoints::all_reports()).await {
        Ok(_) => None,
        Err(e) => {
            debug!("Reporting API check failed: {}", e);
            Some(e.to_string())
        }
    }
}
