//! Page panels: the regions a report page is made of, and how fetched
//! statistics fill them.

use serde_json::Value;

use crate::formatters::{
    display_value, escape_html, js_number, percentile_render, render_rounded_rate, CellMeta,
    RenderKind, Row,
};
use crate::model::{LatencyStatistics, RateStatistics, Role};
use crate::page::{Cell, Content, PanelOutcome};

// Region identifiers
pub const LATENCY_CHART: &str = "bar-chart-3";
pub const PERCENTILE_TABLE: &str = "percentile-table";
pub const RATE_CHART: &str = "line-chart-4";
pub const RATE_STATISTICS: &str = "rate-statistics";
pub const PROPERTIES_TABLE: &str = "properties-table";
pub const ARCHIVE_TABLE: &str = "archive-files";
pub const SUT_NODE_TABLE: &str = "sut-node-table";
pub const REPORT_LIST: &str = "report-list";

pub const SERVICE_TIME: &str = "Service";
pub const RESPONSE_TIME: &str = "Response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    LatencyDistribution,
    LatencyStatistics,
    /// Rate panels of an aggregated test carry the side they belong to.
    RateDistribution(Option<Role>),
    RateStatistics(Option<Role>),
    Properties,
    Archives,
    SutNodes,
}

impl Panel {
    pub fn is_latency(&self) -> bool {
        matches!(self, Panel::LatencyDistribution | Panel::LatencyStatistics)
    }

    pub fn is_rate(&self) -> bool {
        matches!(self, Panel::RateDistribution(_) | Panel::RateStatistics(_))
    }

    /// Regions this panel writes to.
    pub fn regions(&self) -> Vec<String> {
        match self {
            Panel::LatencyDistribution => vec![LATENCY_CHART.to_string()],
            Panel::LatencyStatistics => vec![
                percentile_region(SERVICE_TIME),
                percentile_region(RESPONSE_TIME),
            ],
            Panel::RateDistribution(side) => vec![sided(RATE_CHART, side.as_ref())],
            Panel::RateStatistics(side) => vec![sided(RATE_STATISTICS, side.as_ref())],
            Panel::Properties => vec![PROPERTIES_TABLE.to_string()],
            Panel::Archives => vec![ARCHIVE_TABLE.to_string()],
            Panel::SutNodes => vec![SUT_NODE_TABLE.to_string()],
        }
    }
}

pub fn percentile_region(variant: &str) -> String {
    format!("{PERCENTILE_TABLE}-{variant}")
}

/// Region id for a panel that may belong to one side of an aggregated test.
pub fn sided(base: &str, side: Option<&Role>) -> String {
    match side {
        Some(role) => format!("{base}-{role}"),
        None => base.to_string(),
    }
}

/// Fill the percentile table of one latency variant (`Service` or
/// `Response`). Nothing is written when the statistics are absent.
/// Percentile cells go through [`percentile_render`], so statistics
/// recorded by a sender read `N/A`; `host_role` stands in when the record
/// does not carry its own role.
pub fn set_percentile_table(
    statistics: Option<&LatencyStatistics>,
    variant: &str,
    host_role: Option<&Role>,
) -> PanelOutcome {
    let Some(stats) = statistics else {
        return PanelOutcome::Empty;
    };

    let mut row = match serde_json::to_value(stats) {
        Ok(Value::Object(map)) => map,
        _ => Row::new(),
    };
    if let (None, Some(role)) = (&stats.env_resource_role, host_role) {
        row.insert("envResourceRole".to_string(), Value::from(role.as_str()));
    }

    let mut cells = vec![Cell {
        id: format!("perTotalCount{variant}"),
        label: "Total count".to_string(),
        value: stats.latency_total_count.map(js_number).unwrap_or_default(),
    }];
    let percentiles = [
        ("maxLatency", "Max latency", "latencyMaxValue"),
        ("99999percentile", "99.999th", "latency99999th"),
        ("9999percentile", "99.99th", "latency9999th"),
        ("999percentile", "99.9th", "latency999th"),
        ("99percentile", "99th", "latency99th"),
        ("95percentile", "95th", "latency95th"),
        ("90percentile", "90th", "latency90th"),
        ("50percentile", "50th", "latency50th"),
    ];
    for (col, (id, label, field)) in percentiles.into_iter().enumerate() {
        let value = match row.get(field) {
            Some(v) if !v.is_null() => {
                let meta = CellMeta { row: 0, col: col + 1 };
                percentile_render(v, RenderKind::Display, &row, &meta)
            }
            _ => String::new(),
        };
        cells.push(Cell {
            id: format!("{id}{variant}"),
            label: label.to_string(),
            value,
        });
    }

    PanelOutcome::Populated(Content::Cells(cells))
}

/// Fill the rate statistics panel. `skip_count_field` names the field the
/// skip count is read from; `side` suffixes the cell ids of aggregated
/// tests.
pub fn set_rate_statistics_table(
    statistics: Option<&RateStatistics>,
    side: Option<&Role>,
    skip_count_field: &str,
) -> PanelOutcome {
    let Some(stats) = statistics else {
        return PanelOutcome::Empty;
    };

    let suffix = side.map(|r| capitalize(r.as_str())).unwrap_or_default();
    let row = Row::new();
    let rate = |col: usize, v: Option<f64>| match v {
        Some(v) => render_rounded_rate(
            &Value::from(v),
            RenderKind::Display,
            &row,
            &CellMeta { row: 0, col },
        ),
        None => String::new(),
    };

    let cells = vec![
        ("maxRate", "Max rate", rate(0, stats.max)),
        ("minRate", "Min rate", rate(1, stats.min)),
        ("mean", "Mean", rate(2, stats.mean)),
        ("geometricMean", "Geometric mean", rate(3, stats.geometric_mean)),
        ("stdDeviation", "Standard deviation", rate(4, stats.standard_deviation)),
        (
            "skipCount",
            "Skip count",
            stats
                .field(skip_count_field)
                .map(|v| escape_html(&display_value(&v)))
                .unwrap_or_default(),
        ),
    ]
    .into_iter()
    .map(|(id, label, value)| Cell {
        id: format!("{id}{suffix}"),
        label: label.to_string(),
        value,
    })
    .collect();

    PanelOutcome::Populated(Content::Cells(cells))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
