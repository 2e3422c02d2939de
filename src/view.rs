//! Report view controller.
//!
//! One controller serves every page type. It determines the role of the
//! subject, decides which panels the role gets, fetches those panels
//! concurrently and writes each outcome into its own region of the page.

use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::{fetch, ReportApi};
use crate::charts::{
    check_payload, graph_latency_distribution, rate_distribution_graph, PERCENTILES_FIELD,
    PERIODS_FIELD,
};
use crate::columns::{ARCHIVE_COLUMNS, REPORT_COLUMNS, REPORT_LIST_COLUMNS, SUT_NODE_COLUMNS};
use crate::config::{DashboardConfig, DEFAULT_PAGE_LENGTH, DEFAULT_SKIP_COUNT_FIELD};
use crate::endpoints::{self, Endpoint};
use crate::error::DashboardError;
use crate::formatters::{page_href, TEST_PAGE};
use crate::model::{
    test_host_role, ArchiveFile, ChartPayload, LatencyProperties, RateProperties, ReportInfo,
    ReportRecord, ReportSummary, Role, SutNodeInfo,
};
use crate::page::{Content, Page, PageState, PanelOutcome, RegionUpdate, ViewMode};
use crate::panels::{
    percentile_region, set_percentile_table, set_rate_statistics_table, sided, Panel,
    ARCHIVE_TABLE, LATENCY_CHART, PROPERTIES_TABLE, RATE_CHART, RATE_STATISTICS, REPORT_LIST,
    RESPONSE_TIME, SERVICE_TIME, SUT_NODE_TABLE,
};
use crate::table::{to_rows, SortDirection, SortOrder, TableBinding};

pub const AGGREGATED_PAGE: &str = "/aggregated";

/// Identifiers as they arrive in a page's query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "report-id")]
    pub report_id: Option<String>,
    #[serde(rename = "test-id")]
    pub test_id: Option<String>,
    #[serde(rename = "test-number")]
    pub test_number: Option<String>,
}

impl PageQuery {
    fn require(value: &Option<String>, name: &'static str) -> Result<String, DashboardError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(DashboardError::MissingParameter(name))
    }

    fn optional(value: &Option<String>) -> Option<String> {
        Self::require(value, "").ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Report,
    Test,
    AggregatedTest,
}

impl PageKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "report" => Some(PageKind::Report),
            "test" => Some(PageKind::Test),
            "aggregated" => Some(PageKind::AggregatedTest),
            _ => None,
        }
    }
}

/// What a page is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Report {
        report_id: String,
        test_id: Option<String>,
        test_number: Option<String>,
    },
    Test {
        test_id: String,
        test_number: String,
    },
    AggregatedTest {
        test_id: String,
        test_number: String,
    },
}

impl Subject {
    pub fn from_query(kind: PageKind, query: &PageQuery) -> Result<Self, DashboardError> {
        match kind {
            PageKind::Report => Ok(Subject::Report {
                report_id: PageQuery::require(&query.report_id, "report-id")?,
                test_id: PageQuery::optional(&query.test_id),
                test_number: PageQuery::optional(&query.test_number),
            }),
            PageKind::Test => Ok(Subject::Test {
                test_id: PageQuery::require(&query.test_id, "test-id")?,
                test_number: PageQuery::require(&query.test_number, "test-number")?,
            }),
            PageKind::AggregatedTest => Ok(Subject::AggregatedTest {
                test_id: PageQuery::require(&query.test_id, "test-id")?,
                test_number: PageQuery::require(&query.test_number, "test-number")?,
            }),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Subject::Report { report_id, .. } => format!("Report {report_id}"),
            Subject::Test {
                test_id,
                test_number,
            } => format!("Test {test_id} #{test_number}"),
            Subject::AggregatedTest {
                test_id,
                test_number,
            } => format!("Aggregated test {test_id} #{test_number}"),
        }
    }

    fn test_id(&self) -> Option<&str> {
        match self {
            Subject::Report { test_id, .. } => test_id.as_deref(),
            Subject::Test { test_id, .. } | Subject::AggregatedTest { test_id, .. } => {
                Some(test_id)
            }
        }
    }

    /// Every panel the page type can show, in layout order.
    pub fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![Panel::LatencyDistribution, Panel::LatencyStatistics];
        match self {
            Subject::AggregatedTest { .. } => {
                for side in [Role::Sender, Role::Receiver] {
                    panels.push(Panel::RateDistribution(Some(side.clone())));
                    panels.push(Panel::RateStatistics(Some(side)));
                }
            }
            _ => {
                panels.push(Panel::RateDistribution(None));
                panels.push(Panel::RateStatistics(None));
            }
        }
        panels.push(Panel::Properties);
        if matches!(self, Subject::Report { .. }) {
            panels.push(Panel::Archives);
        }
        if self.test_id().is_some() {
            panels.push(Panel::SutNodes);
        }
        panels
    }

    fn role_endpoint(&self) -> Endpoint {
        match self {
            Subject::Report { report_id, .. } => endpoints::report_info(report_id),
            Subject::Test {
                test_id,
                test_number,
            }
            | Subject::AggregatedTest {
                test_id,
                test_number,
            } => endpoints::test_properties(test_id, test_number),
        }
    }

    /// Endpoint backing a panel. `role` is the page's role, used by test
    /// pages whose single rate panel follows the role of the test.
    pub fn endpoint(&self, panel: &Panel, role: &Role) -> Option<Endpoint> {
        let endpoint = match (self, panel) {
            (Subject::Report { report_id, .. }, panel) => match panel {
                Panel::LatencyDistribution => endpoints::report_latency_distribution(report_id),
                Panel::LatencyStatistics => endpoints::report_latency_statistics(report_id),
                Panel::RateDistribution(_) => endpoints::report_rate_distribution(report_id),
                Panel::RateStatistics(_) => endpoints::report_rate_statistics(report_id),
                Panel::Properties => endpoints::report_properties(report_id),
                Panel::Archives => endpoints::report_files(report_id),
                Panel::SutNodes => endpoints::sut_node_info(self.test_id()?),
            },
            (
                Subject::Test {
                    test_id,
                    test_number,
                }
                | Subject::AggregatedTest {
                    test_id,
                    test_number,
                },
                panel,
            ) => match panel {
                Panel::LatencyDistribution => {
                    endpoints::test_latency_distribution(test_id, test_number)
                }
                Panel::LatencyStatistics => {
                    endpoints::test_latency_statistics(test_id, test_number)
                }
                Panel::RateDistribution(side) => endpoints::test_rate_distribution(
                    side.as_ref().unwrap_or(role),
                    test_id,
                    test_number,
                ),
                Panel::RateStatistics(side) => endpoints::test_rate_statistics(
                    side.as_ref().unwrap_or(role),
                    test_id,
                    test_number,
                ),
                Panel::Properties => endpoints::test_properties(test_id, test_number),
                Panel::Archives => return None,
                Panel::SutNodes => endpoints::sut_node_info(test_id),
            },
        };
        Some(endpoint)
    }

    fn links(&self) -> Vec<(&'static str, String)> {
        match self {
            Subject::Report {
                test_id: Some(test_id),
                test_number: Some(test_number),
                ..
            } => vec![(
                "Test",
                page_href(
                    TEST_PAGE,
                    &[
                        ("test-id", test_id.clone()),
                        ("test-number", test_number.clone()),
                    ],
                ),
            )],
            Subject::Report { .. } => Vec::new(),
            Subject::Test {
                test_id,
                test_number,
            } => vec![(
                "Aggregated",
                page_href(
                    AGGREGATED_PAGE,
                    &[
                        ("test-id", test_id.clone()),
                        ("test-number", test_number.clone()),
                    ],
                ),
            )],
            Subject::AggregatedTest {
                test_id,
                test_number,
            } => vec![(
                "Test",
                page_href(
                    TEST_PAGE,
                    &[
                        ("test-id", test_id.clone()),
                        ("test-number", test_number.clone()),
                    ],
                ),
            )],
        }
    }
}

impl ViewMode {
    pub fn shows(self, panel: &Panel) -> bool {
        match self {
            ViewMode::Full => true,
            ViewMode::RoleMinimal => {
                !panel.is_latency()
                    && !matches!(
                        panel,
                        Panel::RateDistribution(Some(Role::Receiver))
                            | Panel::RateStatistics(Some(Role::Receiver))
                    )
            }
            ViewMode::Hidden => {
                !panel.is_latency() && !panel.is_rate() && *panel != Panel::Properties
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub page_length: usize,
    pub skip_count_field: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            page_length: DEFAULT_PAGE_LENGTH,
            skip_count_field: DEFAULT_SKIP_COUNT_FIELD.to_string(),
        }
    }
}

impl From<&DashboardConfig> for ViewOptions {
    fn from(config: &DashboardConfig) -> Self {
        ViewOptions {
            page_length: config.page_length,
            skip_count_field: config.skip_count_field.clone(),
        }
    }
}

pub struct ViewController<'a, A> {
    api: &'a A,
    options: ViewOptions,
}

impl<'a, A: ReportApi> ViewController<'a, A> {
    pub fn new(api: &'a A, options: ViewOptions) -> Self {
        Self { api, options }
    }

    /// Build the page for `subject`. Only the role lookup gates the other
    /// fetches; panel failures end up in their own region and never abort
    /// the page.
    pub async fn initialize(&self, subject: &Subject) -> Page {
        let mut page = Page::new(subject.title());
        for (label, href) in subject.links() {
            page.link(label, href);
        }

        let role = self.determine_role(subject).await;
        info!("{}: role '{}'", subject.title(), role);
        page.role = Some(role.clone());
        page.advance(PageState::RoleDetermined);

        let mode = ViewMode::for_role(&role);
        page.mode = Some(mode);
        page.advance(mode.state());

        let panels = subject.panels();
        let fetches: Vec<BoxFuture<'_, Vec<RegionUpdate>>> = panels
            .iter()
            .filter(|panel| mode.shows(panel))
            .map(|panel| self.load_panel(subject, panel.clone(), &role))
            .collect();
        let mut loaded = join_all(fetches).await.into_iter();

        for panel in &panels {
            if mode.shows(panel) {
                for update in loaded.next().unwrap_or_default() {
                    page.apply(update);
                }
            } else {
                for region in panel.regions() {
                    page.hide(&region);
                }
            }
        }

        page.advance(PageState::Populated);
        page
    }

    /// The report index, optionally narrowed to one test.
    pub async fn report_index(&self, test_id: Option<&str>) -> Page {
        let mut page = Page::new(match test_id {
            Some(id) => format!("Reports for test {id}"),
            None => "Reports".to_string(),
        });

        let mut binding =
            TableBinding::new(REPORT_LIST, endpoints::all_reports(), REPORT_LIST_COLUMNS)
                .page_length(self.options.page_length);
        if let Some(id) = test_id {
            binding = binding.filtered("testId", id);
        }
        page.apply(binding.bind::<ReportSummary, A>(self.api).await);
        page
    }

    async fn determine_role(&self, subject: &Subject) -> Role {
        let endpoint = subject.role_endpoint();
        let role = match subject {
            Subject::Report { .. } => fetch::<ReportInfo, A>(self.api, &endpoint)
                .await
                .map(|info| info.test_host_role),
            Subject::Test { .. } | Subject::AggregatedTest { .. } => {
                fetch::<Vec<ReportRecord>, A>(self.api, &endpoint)
                    .await
                    .map(|records| Some(test_host_role(&records)))
            }
        };

        match role {
            Ok(Some(role)) => role,
            Ok(None) => Role::Other(String::new()),
            Err(e) => {
                warn!("Unable to determine the role: {}", e);
                Role::Other(String::new())
            }
        }
    }

    fn load_panel<'f>(
        &'f self,
        subject: &'f Subject,
        panel: Panel,
        role: &'f Role,
    ) -> BoxFuture<'f, Vec<RegionUpdate>> {
        async move {
            let Some(endpoint) = subject.endpoint(&panel, role) else {
                return Vec::new();
            };
            let page_length = self.options.page_length;

            match panel {
                Panel::LatencyDistribution => {
                    vec![self.chart(&endpoint, LATENCY_CHART, PERCENTILES_FIELD, false).await]
                }
                Panel::LatencyStatistics => self.latency_statistics(&endpoint, role).await,
                Panel::RateDistribution(side) => {
                    let target = sided(RATE_CHART, side.as_ref());
                    vec![self.chart(&endpoint, &target, PERIODS_FIELD, true).await]
                }
                Panel::RateStatistics(side) => {
                    vec![self.rate_statistics(&endpoint, side.as_ref()).await]
                }
                Panel::Properties => vec![
                    TableBinding::new(PROPERTIES_TABLE, endpoint, REPORT_COLUMNS)
                        .page_length(page_length)
                        .bind::<ReportRecord, A>(self.api)
                        .await,
                ],
                Panel::Archives => vec![self.archives(endpoint).await],
                Panel::SutNodes => vec![
                    TableBinding::new(SUT_NODE_TABLE, endpoint, SUT_NODE_COLUMNS)
                        .page_length(page_length)
                        .bind::<SutNodeInfo, A>(self.api)
                        .await,
                ],
            }
        }
        .boxed()
    }

    async fn chart(
        &self,
        endpoint: &Endpoint,
        target: &str,
        x_field: &str,
        rate: bool,
    ) -> RegionUpdate {
        let outcome = match fetch::<ChartPayload, A>(self.api, endpoint).await {
            Ok(payload) if payload.is_empty() => PanelOutcome::Empty,
            Ok(payload) => match check_payload(&payload, x_field) {
                Ok(()) => {
                    let element = format!("#{target}");
                    let config = if rate {
                        rate_distribution_graph(payload, &element)
                    } else {
                        graph_latency_distribution(payload, &element)
                    };
                    PanelOutcome::Populated(Content::Chart(config))
                }
                Err(reason) => {
                    warn!("Chart {} not drawn: {}", target, reason);
                    PanelOutcome::Failed(reason)
                }
            },
            Err(e) => {
                warn!("Chart {} not drawn: {}", target, e);
                PanelOutcome::Failed(e.to_string())
            }
        };
        RegionUpdate::new(target, outcome)
    }

    async fn latency_statistics(&self, endpoint: &Endpoint, role: &Role) -> Vec<RegionUpdate> {
        let service = percentile_region(SERVICE_TIME);
        let response = percentile_region(RESPONSE_TIME);

        match fetch::<LatencyProperties, A>(self.api, endpoint).await {
            Ok(props) => vec![
                RegionUpdate::new(
                    service,
                    set_percentile_table(props.service_time.first(), SERVICE_TIME, Some(role)),
                ),
                RegionUpdate::new(
                    response,
                    set_percentile_table(props.response_time.first(), RESPONSE_TIME, Some(role)),
                ),
            ],
            Err(e) => {
                warn!("Latency statistics not loaded: {}", e);
                let reason = e.to_string();
                vec![
                    RegionUpdate::new(service, PanelOutcome::Failed(reason.clone())),
                    RegionUpdate::new(response, PanelOutcome::Failed(reason)),
                ]
            }
        }
    }

    async fn rate_statistics(&self, endpoint: &Endpoint, side: Option<&Role>) -> RegionUpdate {
        let target = sided(RATE_STATISTICS, side);
        let outcome = match fetch::<RateProperties, A>(self.api, endpoint).await {
            Ok(props) => set_rate_statistics_table(
                props.statistics.first(),
                side,
                &self.options.skip_count_field,
            ),
            Err(e) => {
                warn!("Rate statistics {} not loaded: {}", target, e);
                PanelOutcome::Failed(e.to_string())
            }
        };
        RegionUpdate::new(target, outcome)
    }

    async fn archives(&self, endpoint: Endpoint) -> RegionUpdate {
        let rows = fetch::<Vec<ArchiveFile>, A>(self.api, &endpoint)
            .await
            .map(|files| {
                files
                    .into_iter()
                    .map(|file| ArchiveFile {
                        link: file.link.map(|link| self.api.link(&link)),
                        ..file
                    })
                    .collect::<Vec<_>>()
            })
            .and_then(|files| to_rows(&files, &endpoint));

        // The archive table has a single column, so sort on it by name.
        TableBinding::new(ARCHIVE_TABLE, endpoint, ARCHIVE_COLUMNS)
            .sorted(SortOrder {
                column: 0,
                direction: SortDirection::Asc,
            })
            .page_length(self.options.page_length)
            .finish(rows)
    }
}
