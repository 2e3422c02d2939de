//! Table binder: fetch a complete record set and lay it out as a grid.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::warn;

use crate::api::{fetch, ReportApi};
use crate::columns::Column;
use crate::config::{DEFAULT_PAGE_LENGTH, DEFAULT_SORT_COLUMN};
use crate::endpoints::Endpoint;
use crate::error::DashboardError;
use crate::formatters::{display_value, escape_html, CellMeta, RenderKind, Row};
use crate::page::{Content, PanelOutcome, RegionUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub column: usize,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder {
            column: DEFAULT_SORT_COLUMN,
            direction: SortDirection::Desc,
        }
    }
}

/// A populated grid. Cells are already rendered markup; paging happens in
/// the browser. `sort_keys` parallels `rows` and holds the plain sort key
/// of every formatted cell.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub sort_keys: Vec<Vec<Option<String>>>,
    pub order: SortOrder,
    pub page_length: usize,
}

pub struct TableBinding {
    pub target: String,
    pub endpoint: Endpoint,
    pub columns: &'static [Column],
    pub order: SortOrder,
    pub page_length: usize,
    pub filter: Option<(&'static str, String)>,
}

impl TableBinding {
    pub fn new(
        target: impl Into<String>,
        endpoint: Endpoint,
        columns: &'static [Column],
    ) -> Self {
        TableBinding {
            target: target.into(),
            endpoint,
            columns,
            order: SortOrder::default(),
            page_length: DEFAULT_PAGE_LENGTH,
            filter: None,
        }
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn page_length(mut self, page_length: usize) -> Self {
        self.page_length = page_length;
        self
    }

    /// Keep only rows whose `field` has the filter text `value`.
    pub fn filtered(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.filter = Some((field, value.into()));
        self
    }

    /// Fetch the endpoint as a list of `T` and bind it into the target.
    /// Fetch failures are logged and leave the target without a grid.
    pub async fn bind<T, A>(self, api: &A) -> RegionUpdate
    where
        T: DeserializeOwned + Serialize,
        A: ReportApi,
    {
        let rows = fetch::<Vec<T>, A>(api, &self.endpoint)
            .await
            .and_then(|records| to_rows(&records, &self.endpoint));
        self.finish(rows)
    }

    /// Bind rows that were fetched (and possibly adjusted) by the caller.
    pub fn finish(self, rows: Result<Vec<Row>, DashboardError>) -> RegionUpdate {
        let outcome = match rows {
            Ok(rows) => self.populate(rows),
            Err(e) => {
                warn!("Table {} not populated: {}", self.target, e);
                PanelOutcome::Failed(e.to_string())
            }
        };
        RegionUpdate::new(self.target, outcome)
    }

    pub fn populate(&self, rows: Vec<Row>) -> PanelOutcome {
        let mut rows: Vec<Row> = match &self.filter {
            Some((field, wanted)) => rows
                .into_iter()
                .filter(|row| self.filter_text(field, row).as_deref() == Some(wanted.as_str()))
                .collect(),
            None => rows,
        };

        if rows.is_empty() {
            return PanelOutcome::Empty;
        }

        if let Some(column) = self.columns.get(self.order.column) {
            rows.sort_by(|a, b| {
                let ord = compare_values(
                    a.get(column.field).unwrap_or(&Value::Null),
                    b.get(column.field).unwrap_or(&Value::Null),
                );
                match self.order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let mut rendered = Vec::with_capacity(rows.len());
        let mut sort_keys = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let (cells, keys): (Vec<String>, Vec<Option<String>>) = self
                .columns
                .iter()
                .enumerate()
                .map(|(j, column)| {
                    let meta = CellMeta { row: i, col: j };
                    let key = column.render.map(|render| {
                        render(cell_value(column, row), RenderKind::Sort, row, &meta)
                    });
                    (render_cell(column, row, meta), key)
                })
                .unzip();
            rendered.push(cells);
            sort_keys.push(keys);
        }

        PanelOutcome::Populated(Content::Grid(Grid {
            columns: self.columns.iter().map(|c| c.title.to_string()).collect(),
            rows: rendered,
            sort_keys,
            order: self.order,
            page_length: self.page_length,
        }))
    }

    /// Filter text of `field`, through its column's formatter when the
    /// field is shown.
    fn filter_text(&self, field: &str, row: &Row) -> Option<String> {
        let value = row.get(field)?;
        let column = self.columns.iter().enumerate().find(|(_, c)| c.field == field);
        let text = match column {
            Some((col, Column { render: Some(render), .. })) => {
                render(value, RenderKind::Filter, row, &CellMeta { row: 0, col })
            }
            _ => display_value(value),
        };
        Some(text)
    }
}

fn cell_value<'r>(column: &Column, row: &'r Row) -> &'r Value {
    row.get(column.field).unwrap_or(&Value::Null)
}

fn render_cell(column: &Column, row: &Row, meta: CellMeta) -> String {
    let value = cell_value(column, row);
    match column.render {
        Some(render) => render(value, RenderKind::Display, row, &meta),
        None => escape_html(&display_value(value)),
    }
}

/// Re-encode typed records as row objects for the column lookup.
pub fn to_rows<T: Serialize>(
    records: &[T],
    endpoint: &Endpoint,
) -> Result<Vec<Row>, DashboardError> {
    records
        .iter()
        .map(|record| match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(DashboardError::decode(
                endpoint.to_string(),
                "expected an array of objects",
            )),
            Err(e) => Err(DashboardError::decode(endpoint.to_string(), e)),
        })
        .collect()
}

/// Nulls first, numbers numerically, everything else by its text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => display_value(a).cmp(&display_value(b)),
    }
}
