use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{StatusCode, Uri};
use axum::Json;
use maestro_dashboard::config::{parse_api_base, DashboardConfig};
use maestro_dashboard::server::build_router;
use maestro_dashboard::state::DashboardState;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral port and return its address.
async fn spawn(router: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A reporting API answering fixed JSON bodies under `/api`.
async fn spawn_reports(responses: HashMap<&'static str, Value>) -> String {
    let responses = Arc::new(responses);
    let router = axum::Router::new().fallback(move |uri: Uri| {
        let responses = responses.clone();
        async move {
            match responses.get(uri.path()) {
                Some(body) => (StatusCode::OK, Json(body.clone())),
                None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))),
            }
        }
    });
    spawn(router).await
}

async fn spawn_dashboard(api_base: &str) -> String {
    let config = DashboardConfig {
        request_timeout: Duration::from_secs(2),
        ..DashboardConfig::with_api_base(parse_api_base(api_base).unwrap())
    };
    let state = Arc::new(DashboardState::new(config).unwrap());
    spawn(build_router(state)).await
}

fn sender_report() -> HashMap<&'static str, Value> {
    HashMap::from([
        ("/api/report/", json!([{"reportId": 1, "testId": 7, "testNumber": 2}])),
        ("/api/report/report/1", json!({"testHostRole": "sender"})),
        (
            "/api/report/rate/report/1",
            json!({"Periods": ["2018-01-01 10:00:00"], "Rate": [100]}),
        ),
        (
            "/api/report/rate/statistics/report/1",
            json!({"Statistics": [{"max": 100, "min": 90}]}),
        ),
        (
            "/api/report/report/1/properties",
            json!([{"role": "sender", "protocol": "AMQP", "fcl": 10}]),
        ),
        ("/api/report/report/1/files", json!([])),
    ])
}

#[tokio::test]
async fn test_report_page_renders_over_http() {
    let reports = spawn_reports(sender_report()).await;
    let dashboard = spawn_dashboard(&format!("{reports}/api")).await;

    let resp = reqwest::get(format!("{dashboard}/report?report-id=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();

    assert!(html.contains("<title>Report 1</title>"));
    assert!(html.contains(r#"<section id="region-bar-chart-3" hidden></section>"#));
    assert!(html.contains(r#"<div id="line-chart-4"></div>"#));
    assert!(html.contains(r#"<td id="maxRate"><span>100.00 msg/sec</span></td>"#));
    assert!(html.contains("N/A"));
}

#[tokio::test]
async fn test_page_model_as_json() {
    let reports = spawn_reports(sender_report()).await;
    let dashboard = spawn_dashboard(&format!("{reports}/api")).await;

    let page: Value = reqwest::get(format!("{dashboard}/api/page/report?report-id=1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["role"], "sender");
    assert_eq!(page["mode"], "role_minimal");
    assert_eq!(page["history"].as_array().unwrap().last().unwrap(), "populated");
}

#[tokio::test]
async fn test_missing_and_unknown_parameters() {
    let reports = spawn_reports(sender_report()).await;
    let dashboard = spawn_dashboard(&format!("{reports}/api")).await;

    let resp = reqwest::get(format!("{dashboard}/report")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing query parameter: report-id");

    let resp = reqwest::get(format!("{dashboard}/api/page/bogus?report-id=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_index_page() {
    let reports = spawn_reports(sender_report()).await;
    let dashboard = spawn_dashboard(&format!("{reports}/api")).await;

    let html = reqwest::get(format!("{dashboard}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("/report?report-id=1&amp;test-id=7&amp;test-number=2"));
}

#[tokio::test]
async fn test_health_reports_api_reachability() {
    let reports = spawn_reports(sender_report()).await;
    let dashboard = spawn_dashboard(&format!("{reports}/api")).await;

    let resp = reqwest::get(format!("{dashboard}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api"]["responding"], true);

    // Nothing listens under this prefix.
    let dashboard = spawn_dashboard(&format!("{reports}/missing")).await;
    let resp = reqwest::get(format!("{dashboard}/health")).await.unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "degraded");
}
