//! Cell formatters used as grid column renderers.
//!
//! Every formatter has the same shape: the raw cell value, the render
//! purpose, the whole row record and the cell position. They are pure and
//! total: malformed input renders something, it never fails.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};

/// A row record as handed to the grid.
pub type Row = Map<String, Value>;

/// Why a cell is being rendered. Only `Display` produces markup; sort
/// and filter keys are the plain text of the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Display,
    Sort,
    Filter,
}

/// Position of the cell being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMeta {
    pub row: usize,
    pub col: usize,
}

pub type Formatter = fn(&Value, RenderKind, &Row, &CellMeta) -> String;

const NOT_APPLICABLE: &str = "N/A";

pub const REPORT_PAGE: &str = "/report";
pub const TEST_PAGE: &str = "/test";
pub const INDEX_PAGE: &str = "/";

/// Senders never receive, so any latency-shaped column is meaningless on
/// their rows.
pub fn is_sender_row(row: &Row) -> bool {
    row.get("envResourceRole")
        .or_else(|| row.get("role"))
        .and_then(Value::as_str)
        == Some("sender")
}

/// Apply the sender rule to a latency-shaped column.
pub fn latency_cell(row: &Row, render: impl FnOnce() -> String) -> String {
    if is_sender_row(row) {
        NOT_APPLICABLE.to_string()
    } else {
        render()
    }
}

/// Sort and filter key of a cell.
fn key(kind: RenderKind, value: &Value) -> Option<String> {
    match kind {
        RenderKind::Display => None,
        RenderKind::Sort | RenderKind::Filter => Some(display_value(value)),
    }
}

pub fn percentile_render(value: &Value, kind: RenderKind, row: &Row, _meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    latency_cell(row, || {
        // Rounded before scaling, so digits past the second decimal of
        // the raw value are already gone.
        let rounded: f64 = to_fixed(numeric(value), 2).parse().unwrap_or(f64::NAN);
        format!("<span>{} ms</span>", js_number(rounded / 1000.0))
    })
}

pub fn fcl_render(value: &Value, kind: RenderKind, row: &Row, _meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    latency_cell(row, || escape_html(&display_value(value)))
}

pub fn rate_render(value: &Value, kind: RenderKind, _row: &Row, _meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    format!("<span>{} msg/sec</span>", escape_html(&display_value(value)))
}

pub fn render_rounded(value: &Value, kind: RenderKind, _row: &Row, _meta: &CellMeta) -> String {
    key(kind, value).unwrap_or_else(|| to_fixed(numeric(value), 2))
}

pub fn render_rounded_rate(value: &Value, kind: RenderKind, row: &Row, meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    format!("<span>{} msg/sec</span>", render_rounded(value, kind, row, meta))
}

pub fn result_render(value: &Value, kind: RenderKind, _row: &Row, _meta: &CellMeta) -> String {
    let text = display_value(value);
    if kind != RenderKind::Display {
        return text;
    }
    let icon = if text == "success" {
        "pficon pficon-ok"
    } else {
        "pficon pficon-error-circle-o"
    };
    format!("<span class=\"{icon}\"></span> {}", escape_html(&text))
}

pub fn simple_date_render(
    value: &Value,
    kind: RenderKind,
    _row: &Row,
    _meta: &CellMeta,
) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    match local_time(value) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => escape_html(&display_value(value)),
    }
}

/// Link to the report index narrowed to the row's test.
pub fn render_test_id(value: &Value, kind: RenderKind, row: &Row, _meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    anchor(&page_href(INDEX_PAGE, &[("test-id", row_field(row, "testId"))]), value)
}

/// Link to the row's test execution.
pub fn render_test_full(value: &Value, kind: RenderKind, row: &Row, _meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    let href = page_href(
        TEST_PAGE,
        &[
            ("test-id", row_field(row, "testId")),
            ("test-number", row_field(row, "testNumber")),
        ],
    );
    anchor(&href, value)
}

/// Link to the row's report, carrying the test identifiers along.
pub fn render_report_id_full(
    value: &Value,
    kind: RenderKind,
    row: &Row,
    _meta: &CellMeta,
) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    let href = page_href(
        REPORT_PAGE,
        &[
            ("report-id", row_field(row, "reportId")),
            ("test-id", row_field(row, "testId")),
            ("test-number", row_field(row, "testNumber")),
        ],
    );
    anchor(&href, value)
}

/// Anchor to the row's own `link` field.
pub fn link_render(value: &Value, kind: RenderKind, row: &Row, _meta: &CellMeta) -> String {
    if let Some(key) = key(kind, value) {
        return key;
    }
    anchor(&row_field(row, "link"), value)
}

pub fn page_href(page: &str, params: &[(&str, String)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{page}?{query}")
}

fn anchor(href: &str, label: &Value) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape_html(href),
        escape_html(&display_value(label))
    )
}

fn row_field(row: &Row, name: &str) -> String {
    row.get(name).map(display_value).unwrap_or_default()
}

fn local_time(value: &Value) -> Option<DateTime<Local>> {
    match value {
        Value::Number(n) => Local.timestamp_millis_opt(n.as_f64()? as i64).single(),
        Value::String(s) => {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return Some(parsed.with_timezone(&Local));
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        }
        _ => None,
    }
}

/// Plain-text rendering of a JSON value, the way a browser would print it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => js_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric coercion with the browser's `Number()` rules: null and blank
/// strings are zero, anything unparsable is NaN.
pub fn numeric(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

/// Fixed-point text with `digits` decimals, as the browser's `toFixed`
/// prints it: exact ties round away from zero.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number(value);
    }

    // Every finite f64 has at most 1074 fractional digits, so this
    // expansion is exact.
    let exact = format!("{:.1100}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    if fraction.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        round_up(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|&b| char::from(b)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|&b| char::from(b)));
    }
    out
}

/// Add one unit in the last place of a run of ASCII digits.
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Shortest round-trip form, with the browser's spelling of the special
/// values.
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
