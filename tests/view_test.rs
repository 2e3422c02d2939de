mod support;

use maestro_dashboard::model::Role;
use maestro_dashboard::page::{Content, PageState, PanelOutcome, ViewMode};
use maestro_dashboard::view::{Subject, ViewController, ViewOptions};
use serde_json::{json, Value};
use support::FakeApi;

const REPORT_INFO: &str = "/report/report/1";
const LATENCY_ALL: &str = "/report/latency/all/report/1";
const LATENCY_STATS: &str = "/report/latency/statistics/report/1";
const RATE: &str = "/report/rate/report/1";
const RATE_STATS: &str = "/report/rate/statistics/report/1";
const PROPERTIES: &str = "/report/report/1/properties";
const FILES: &str = "/report/report/1/files";
const SUT_NODES: &str = "/report/sut/node/info/test/7";

fn report_subject() -> Subject {
    Subject::Report {
        report_id: "1".into(),
        test_id: Some("7".into()),
        test_number: Some("2".into()),
    }
}

fn report_api(role: &str) -> FakeApi {
    FakeApi::new()
        .with(REPORT_INFO, json!({"testHostRole": role}))
        .with(
            LATENCY_ALL,
            json!({"Percentiles": [0.5, 0.9, 0.99], "serviceTime": [1.2, 2.5, 8.0]}),
        )
        .with(
            LATENCY_STATS,
            json!({
                "ServiceTimeStatistics": [{"latencyTotalCount": 1000, "latency99th": 8}],
                "ResponseTimeStatistics": []
            }),
        )
        .with(
            RATE,
            json!({"Periods": ["2018-01-01 10:00:00", "2018-01-01 10:00:01"], "Rate": [100, 120]}),
        )
        .with(
            RATE_STATS,
            json!({"Statistics": [{"max": 120, "min": 100, "mean": 110, "latency99th": 4}]}),
        )
        .with(
            PROPERTIES,
            json!([{"role": role, "protocol": "AMQP", "fcl": 12, "rate": 100, "parallelCount": 2}]),
        )
        .with(FILES, json!([{"name": "sender.tar.bz2", "link": "/raw/1/sender.tar.bz2"}]))
        .with(
            SUT_NODES,
            json!([{"sutNodeId": 1, "sutNodeName": "broker-01", "sutNodeHwCpuCount": 8}]),
        )
}

fn view(api: &FakeApi) -> ViewController<'_, FakeApi> {
    ViewController::new(api, ViewOptions::default())
}

fn cell<'a>(outcome: Option<&'a PanelOutcome>, id: &str) -> &'a str {
    match outcome {
        Some(PanelOutcome::Populated(Content::Cells(cells))) => {
            &cells.iter().find(|c| c.id == id).unwrap().value
        }
        other => panic!("expected cells, got {other:?}"),
    }
}

#[tokio::test]
async fn test_receiver_gets_full_view() {
    let api = report_api("receiver");
    let page = view(&api).initialize(&report_subject()).await;

    assert_eq!(page.role, Some(Role::Receiver));
    assert_eq!(page.mode, Some(ViewMode::Full));
    assert_eq!(
        page.history(),
        &[
            PageState::Loading,
            PageState::RoleDetermined,
            PageState::FullView,
            PageState::Populated
        ]
    );

    assert!(matches!(
        page.outcome("bar-chart-3"),
        Some(PanelOutcome::Populated(Content::Chart(_)))
    ));
    let service = page.outcome("percentile-table-Service");
    assert_eq!(cell(service, "perTotalCountService"), "1000");
    assert_eq!(cell(service, "99percentileService"), "<span>0.008 ms</span>");
    assert!(matches!(
        page.outcome("percentile-table-Response"),
        Some(PanelOutcome::Empty)
    ));
    assert_eq!(cell(page.outcome("rate-statistics"), "skipCount"), "4");
    assert!(page.outcome("properties-table").unwrap().is_populated());
    assert!(page.outcome("sut-node-table").unwrap().is_populated());

    // Archive links resolve against the reports server.
    match page.outcome("archive-files") {
        Some(PanelOutcome::Populated(Content::Grid(grid))) => {
            assert!(grid.rows[0][0].contains("http://reports.test/raw/1/sender.tar.bz2"));
        }
        other => panic!("expected archive grid, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sender_recorded_percentiles_read_not_applicable() {
    let api = report_api("receiver").with(
        LATENCY_STATS,
        json!({
            "ServiceTimeStatistics": [
                {"envResourceRole": "sender", "latencyTotalCount": 1000, "latency99th": 8}
            ],
            "ResponseTimeStatistics": [
                {"envResourceRole": "receiver", "latencyTotalCount": 900, "latency99th": 1234.125}
            ]
        }),
    );
    let page = view(&api).initialize(&report_subject()).await;

    let service = page.outcome("percentile-table-Service");
    assert_eq!(cell(service, "99percentileService"), "N/A");
    assert_eq!(cell(service, "50percentileService"), "");
    assert_eq!(cell(service, "perTotalCountService"), "1000");

    let response = page.outcome("percentile-table-Response");
    assert_eq!(cell(response, "99percentileResponse"), "<span>1.23413 ms</span>");
}

#[tokio::test]
async fn test_sender_never_fetches_latency() {
    let api = report_api("sender");
    let page = view(&api).initialize(&report_subject()).await;

    assert_eq!(page.mode, Some(ViewMode::RoleMinimal));
    assert!(!api.was_requested(LATENCY_ALL));
    assert!(!api.was_requested(LATENCY_STATS));
    assert!(page.is_hidden("bar-chart-3"));
    assert!(page.is_hidden("percentile-table-Service"));
    assert!(page.is_hidden("percentile-table-Response"));

    assert!(api.was_requested(RATE));
    assert!(page.outcome("line-chart-4").unwrap().is_populated());
    assert!(page.outcome("properties-table").unwrap().is_populated());
    assert_eq!(page.state(), PageState::Populated);
}

#[tokio::test]
async fn test_unknown_role_hides_data_panels() {
    let api = report_api("inspector");
    let page = view(&api).initialize(&report_subject()).await;

    assert_eq!(page.mode, Some(ViewMode::Hidden));
    assert!(page.history().contains(&PageState::HiddenView));
    for path in [LATENCY_ALL, LATENCY_STATS, RATE, RATE_STATS, PROPERTIES] {
        assert!(!api.was_requested(path), "{path} should not be fetched");
    }
    for region in [
        "bar-chart-3",
        "line-chart-4",
        "rate-statistics",
        "properties-table",
    ] {
        assert!(page.is_hidden(region), "{region} should be hidden");
    }
    assert!(page.outcome("archive-files").unwrap().is_populated());
}

#[tokio::test]
async fn test_role_lookup_failure_falls_back_to_hidden() {
    let api = report_api("receiver").failing(REPORT_INFO);
    let page = view(&api).initialize(&report_subject()).await;

    assert_eq!(page.role, Some(Role::Other(String::new())));
    assert_eq!(page.mode, Some(ViewMode::Hidden));
    assert!(!api.was_requested(LATENCY_ALL));
    assert_eq!(page.state(), PageState::Populated);
}

#[tokio::test]
async fn test_one_failing_panel_does_not_block_others() {
    let api = report_api("receiver")
        .failing(LATENCY_STATS)
        .with(RATE, json!({"Rate": [1, 2]}));
    let page = view(&api).initialize(&report_subject()).await;

    assert!(matches!(
        page.outcome("percentile-table-Service"),
        Some(PanelOutcome::Failed(_))
    ));
    assert!(matches!(
        page.outcome("percentile-table-Response"),
        Some(PanelOutcome::Failed(_))
    ));
    // Payload without a Periods series is not drawn.
    assert!(matches!(
        page.outcome("line-chart-4"),
        Some(PanelOutcome::Failed(_))
    ));
    assert!(page.outcome("bar-chart-3").unwrap().is_populated());
    assert!(page.outcome("properties-table").unwrap().is_populated());
    assert_eq!(page.state(), PageState::Populated);
}

#[tokio::test]
async fn test_archives_are_listed_by_name() {
    let api = report_api("receiver").with(
        FILES,
        json!([
            {"name": "sender.tar.bz2", "link": "/raw/1/sender.tar.bz2"},
            {"name": "inspector.tar.bz2", "link": "/raw/1/inspector.tar.bz2"},
            {"name": "receiver.tar.bz2", "link": "/raw/1/receiver.tar.bz2"}
        ]),
    );
    let page = view(&api).initialize(&report_subject()).await;

    match page.outcome("archive-files") {
        Some(PanelOutcome::Populated(Content::Grid(grid))) => {
            let keys: Vec<_> = grid.sort_keys.iter().map(|k| k[0].as_deref()).collect();
            assert_eq!(
                keys,
                vec![
                    Some("inspector.tar.bz2"),
                    Some("receiver.tar.bz2"),
                    Some("sender.tar.bz2")
                ]
            );
            assert_eq!(grid.order.column, 0);
        }
        other => panic!("expected archive grid, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_chart_payload() {
    let api = report_api("receiver").with(LATENCY_ALL, json!({}));
    let page = view(&api).initialize(&report_subject()).await;
    assert!(matches!(page.outcome("bar-chart-3"), Some(PanelOutcome::Empty)));
}

fn test_api(role: &str) -> FakeApi {
    let rate = json!({"Periods": ["2018-01-01 10:00:00"], "Rate": [10]});
    let stats = json!({"Statistics": [{"max": 10, "min": 10}]});
    FakeApi::new()
        .with(
            "/report/test/7/number/2/properties",
            json!([{"role": "sender"}, {"role": role}]),
        )
        .with(
            "/report/latency/aggregated/test/7/number/2",
            json!({"Percentiles": [0.5], "serviceTime": [1]}),
        )
        .with(
            "/report/latency/aggregated/statistics/test/7/number/2",
            json!({"ServiceTimeStatistics": [], "ResponseTimeStatistics": []}),
        )
        .with("/report/rate/sender/aggregated/test/7/number/2", rate.clone())
        .with("/report/rate/receiver/aggregated/test/7/number/2", rate)
        .with("/report/rate/sender/aggregated/statistics/test/7/number/2", stats.clone())
        .with("/report/rate/receiver/aggregated/statistics/test/7/number/2", stats)
        .with(SUT_NODES, Value::Array(vec![]))
}

#[tokio::test]
async fn test_aggregated_test_shows_both_sides() {
    let api = test_api("receiver");
    let subject = Subject::AggregatedTest {
        test_id: "7".into(),
        test_number: "2".into(),
    };
    let page = view(&api).initialize(&subject).await;

    assert_eq!(page.role, Some(Role::Receiver));
    assert!(page.outcome("line-chart-4-sender").unwrap().is_populated());
    assert!(page.outcome("line-chart-4-receiver").unwrap().is_populated());
    assert_eq!(
        cell(page.outcome("rate-statistics-sender"), "maxRateSender"),
        "<span>10.00 msg/sec</span>"
    );
    assert_eq!(
        cell(page.outcome("rate-statistics-receiver"), "maxRateReceiver"),
        "<span>10.00 msg/sec</span>"
    );
    assert!(matches!(page.outcome("sut-node-table"), Some(PanelOutcome::Empty)));
    assert_eq!(page.links[0].href, "/test?test-id=7&test-number=2");
}

#[tokio::test]
async fn test_aggregated_sender_only_sees_sender_side() {
    let api = test_api("sender");
    let subject = Subject::AggregatedTest {
        test_id: "7".into(),
        test_number: "2".into(),
    };
    let page = view(&api).initialize(&subject).await;

    assert_eq!(page.mode, Some(ViewMode::RoleMinimal));
    assert!(page.outcome("line-chart-4-sender").unwrap().is_populated());
    assert!(page.is_hidden("line-chart-4-receiver"));
    assert!(page.is_hidden("rate-statistics-receiver"));
    assert!(!api.was_requested("/report/rate/receiver/aggregated/test/7/number/2"));
    assert!(!api.was_requested("/report/latency/aggregated/test/7/number/2"));
}

#[tokio::test]
async fn test_test_page_rate_follows_role() {
    let api = test_api("receiver");
    let subject = Subject::Test {
        test_id: "7".into(),
        test_number: "2".into(),
    };
    let page = view(&api).initialize(&subject).await;

    assert!(api.was_requested("/report/rate/receiver/aggregated/test/7/number/2"));
    assert!(!api.was_requested("/report/rate/sender/aggregated/test/7/number/2"));
    assert!(page.outcome("line-chart-4").unwrap().is_populated());
    assert!(page.region("archive-files").is_none());
    assert_eq!(page.links[0].href, "/aggregated?test-id=7&test-number=2");
}

#[tokio::test]
async fn test_report_index_filter() {
    let api = FakeApi::new().with(
        "/report/",
        json!([
            {"reportId": 1, "testId": 7, "testNumber": 1, "testName": "a", "testResult": "success"},
            {"reportId": 2, "testId": 8, "testNumber": 1, "testName": "b", "testResult": "failed"},
            {"reportId": 3, "testId": 7, "testNumber": 2, "testName": "c", "testResult": "success"}
        ]),
    );

    let page = view(&api).report_index(Some("7")).await;
    match page.outcome("report-list") {
        Some(PanelOutcome::Populated(Content::Grid(grid))) => {
            assert_eq!(grid.rows.len(), 2);
            assert!(grid.rows.iter().all(|r| r[0].contains("test-id=7")));
        }
        other => panic!("expected report grid, got {other:?}"),
    }

    let page = view(&api).report_index(None).await;
    match page.outcome("report-list") {
        Some(PanelOutcome::Populated(Content::Grid(grid))) => assert_eq!(grid.rows.len(), 3),
        other => panic!("expected report grid, got {other:?}"),
    }
}

#[tokio::test]
async fn test_report_index_unreachable() {
    let api = FakeApi::new().failing("/report/");
    let page = view(&api).report_index(None).await;
    assert!(matches!(page.outcome("report-list"), Some(PanelOutcome::Failed(_))));
}
