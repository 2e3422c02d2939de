//! Chart configuration builders.
//!
//! The output serializes to the configuration object the browser-side
//! chart library expects (`c3.generate`). Tick formats are d3 format
//! specifiers; the page script turns `format` strings into formatter
//! functions for numeric axes.

use serde::Serialize;

use crate::model::ChartPayload;

pub const PERCENTILES_FIELD: &str = "Percentiles";
pub const PERIODS_FIELD: &str = "Periods";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartConfig {
    pub bindto: String,
    pub data: ChartData,
    pub axis: Axes,
    pub point: PointConfig,
    pub zoom: ZoomConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub x: String,
    pub json: ChartPayload,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axes {
    pub x: XAxis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<YAxis>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct XAxis {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<AxisLabel>,
    pub tick: Tick,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YAxis {
    pub label: AxisLabel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AxisLabel {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tick {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culling: Option<Culling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<bool>,
    pub rotate: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Culling {
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PointConfig {
    pub show: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ZoomConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub zoom_type: String,
}

impl ZoomConfig {
    fn drag() -> Self {
        ZoomConfig {
            enabled: true,
            zoom_type: "drag".to_string(),
        }
    }
}

/// Latency per percentile bucket.
pub fn graph_latency_distribution(payload: ChartPayload, element: &str) -> ChartConfig {
    ChartConfig {
        bindto: element.to_string(),
        data: ChartData {
            x: PERCENTILES_FIELD.to_string(),
            json: payload,
            chart_type: None,
        },
        axis: Axes {
            x: XAxis {
                axis_type: None,
                label: Some(AxisLabel {
                    text: PERCENTILES_FIELD.to_string(),
                }),
                tick: Tick {
                    culling: None,
                    count: None,
                    fit: None,
                    rotate: 90,
                    multiline: Some(false),
                    format: ".4f".to_string(),
                },
            },
            y: Some(YAxis {
                label: AxisLabel {
                    text: "Milliseconds".to_string(),
                },
            }),
        },
        point: PointConfig { show: false },
        zoom: ZoomConfig::drag(),
    }
}

/// Rate over time.
pub fn rate_distribution_graph(payload: ChartPayload, element: &str) -> ChartConfig {
    ChartConfig {
        bindto: element.to_string(),
        data: ChartData {
            x: PERIODS_FIELD.to_string(),
            json: payload,
            chart_type: Some("spline".to_string()),
        },
        axis: Axes {
            x: XAxis {
                axis_type: Some("timeseries".to_string()),
                label: None,
                tick: Tick {
                    culling: Some(Culling { max: 100 }),
                    count: Some(20),
                    fit: Some(true),
                    rotate: 90,
                    multiline: None,
                    format: "%Y-%m-%d %H:%M:%S".to_string(),
                },
            },
            y: None,
        },
        point: PointConfig { show: false },
        zoom: ZoomConfig::drag(),
    }
}

/// Check that a payload can be drawn: it needs the x-axis series and at
/// least one other series.
pub fn check_payload(payload: &ChartPayload, x_field: &str) -> Result<(), String> {
    match payload.get(x_field) {
        None => Err(format!("missing '{x_field}' series")),
        Some(v) if !v.is_array() => Err(format!("'{x_field}' is not a sequence")),
        Some(_) if payload.len() < 2 => Err("no data series".to_string()),
        Some(_) => Ok(()),
    }
}
