//! Column definitions for every grid the dashboard renders.

use crate::formatters::{self, Formatter};

#[derive(Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub field: &'static str,
    pub render: Option<Formatter>,
}

impl Column {
    pub const fn plain(title: &'static str, field: &'static str) -> Self {
        Column {
            title,
            field,
            render: None,
        }
    }

    pub const fn rendered(title: &'static str, field: &'static str, render: Formatter) -> Self {
        Column {
            title,
            field,
            render: Some(render),
        }
    }
}

/// Report/test properties.
pub const REPORT_COLUMNS: &[Column] = &[
    Column::plain("Role", "role"),
    Column::plain("Protocol", "protocol"),
    Column::plain("Duration", "duration"),
    Column::rendered("FCL", "fcl", formatters::fcl_render),
    Column::plain("API Name", "apiName"),
    Column::plain("API Version", "apiVersion"),
    Column::plain("Parallel Count", "parallelCount"),
    Column::plain("Message Size", "messageSize"),
    Column::plain("Variable Size", "variableSize"),
    Column::rendered("Rate", "rate", formatters::rate_render),
    Column::plain("Limit Destinations", "limitDestinations"),
    Column::plain("Broker URI", "brokerUri"),
];

/// Report index.
pub const REPORT_LIST_COLUMNS: &[Column] = &[
    Column::rendered("Report", "reportId", formatters::render_report_id_full),
    Column::rendered("Test", "testId", formatters::render_test_id),
    Column::rendered("Number", "testNumber", formatters::render_test_full),
    Column::plain("Name", "testName"),
    Column::plain("Host", "testHost"),
    Column::plain("Role", "testHostRole"),
    Column::rendered("Result", "testResult", formatters::result_render),
    Column::rendered("Date", "testDate", formatters::simple_date_render),
];

pub const ARCHIVE_COLUMNS: &[Column] = &[Column::rendered("File", "name", formatters::link_render)];

pub const SUT_NODE_COLUMNS: &[Column] = &[
    Column::plain("Node", "sutNodeName"),
    Column::plain("OS", "sutNodeOsName"),
    Column::plain("Arch", "sutNodeOsArch"),
    Column::plain("OS Version", "sutNodeOsVersion"),
    Column::plain("Hardware", "sutNodeHwName"),
    Column::plain("Model", "sutNodeHwModel"),
    Column::plain("CPU", "sutNodeHwCpu"),
    Column::plain("CPU Count", "sutNodeHwCpuCount"),
    Column::plain("RAM", "sutNodeHwRam"),
    Column::plain("Disk", "sutNodeHwDiskType"),
];
