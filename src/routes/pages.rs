use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;

use crate::error::DashboardError;
use crate::page::Page;
use crate::render::render_page;
use crate::state::SharedState;
use crate::view::{PageKind, PageQuery, Subject, ViewController};

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(rename = "test-id")]
    pub test_id: Option<String>,
}

impl IndexQuery {
    fn test_filter(&self) -> Option<&str> {
        self.test_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

async fn build_page(
    state: &SharedState,
    kind: PageKind,
    query: &PageQuery,
) -> Result<Page, DashboardError> {
    let subject = Subject::from_query(kind, query)?;
    let controller = ViewController::new(&state.api, state.view_options());
    Ok(controller.initialize(&subject).await)
}

async fn build_index(state: &SharedState, query: &IndexQuery) -> Page {
    let controller = ViewController::new(&state.api, state.view_options());
    controller.report_index(query.test_filter()).await
}

/// GET /: report index, optionally filtered with `?test-id=`.
pub async fn index(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> Html<String> {
    Html(render_page(&build_index(&state, &query).await))
}

/// GET /report?report-id=&test-id=&test-number=: single report view.
pub async fn report_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, DashboardError> {
    let page = build_page(&state, PageKind::Report, &query).await?;
    Ok(Html(render_page(&page)))
}

/// GET /test?test-id=&test-number=: test view.
pub async fn test_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, DashboardError> {
    let page = build_page(&state, PageKind::Test, &query).await?;
    Ok(Html(render_page(&page)))
}

/// GET /aggregated?test-id=&test-number=: aggregated test view with
/// separate sender and receiver rate panels.
pub async fn aggregated_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, DashboardError> {
    let page = build_page(&state, PageKind::AggregatedTest, &query).await?;
    Ok(Html(render_page(&page)))
}

/// GET /api/page/{kind}: the page model as JSON.
pub async fn page_json(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page>, DashboardError> {
    let kind = PageKind::parse(&kind).ok_or(DashboardError::UnknownPage(kind))?;
    Ok(Json(build_page(&state, kind, &query).await?))
}

/// GET /api/index: the report index model as JSON.
pub async fn index_json(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> Json<Page> {
    Json(build_index(&state, &query).await)
}
