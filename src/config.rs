use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::error::DashboardError;
use crate::settings::{load_settings, PersistentSettings};

/// Maestro Dashboard: renders performance-test reports from the reporting API.
#[derive(Parser, Debug, Clone)]
#[command(name = "maestro-dashboard")]
pub struct CliArgs {
    /// Base URL of the reporting API (e.g. http://localhost:6500/api)
    #[arg(short = 'a', long = "api-base", env = "MAESTRO_API_BASE")]
    pub api_base: Option<String>,

    /// Dashboard HTTP port
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_DASHBOARD_PORT)]
    pub port: u16,

    /// Timeout applied to every reporting API request
    #[arg(long = "request-timeout-secs", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Rows per grid page
    #[arg(long = "page-length")]
    pub page_length: Option<usize>,

    /// Rate statistics field shown as the skip count
    #[arg(long = "skip-count-field")]
    pub skip_count_field: Option<String>,

    /// Optional JSON settings file
    #[arg(short = 's', long = "settings")]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_base: url::Url,
    pub port: u16,
    pub request_timeout: Duration,
    pub page_length: usize,
    pub skip_count_field: String,
}

pub const DEFAULT_DASHBOARD_PORT: u16 = 6600;
pub const DEFAULT_API_BASE: &str = "http://localhost:6500/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// Grid constants
pub const DEFAULT_SORT_COLUMN: usize = 1;
pub const DEFAULT_PAGE_LENGTH: usize = 10;

// Rate statistics field shown as the skip count.
// TODO: confirm the intended rate statistics source with the reports API owners.
pub const DEFAULT_SKIP_COUNT_FIELD: &str = "latency99th";

impl DashboardConfig {
    /// Resolve the configuration: built-in defaults, then the settings
    /// file, then command-line values.
    pub fn from_args(args: CliArgs) -> Result<Self, DashboardError> {
        let settings = match &args.settings {
            Some(path) => load_settings(path),
            None => PersistentSettings::default(),
        };

        let api_base = args
            .api_base
            .or(settings.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let page_length = args
            .page_length
            .or(settings.page_length)
            .unwrap_or(DEFAULT_PAGE_LENGTH);
        let page_length = if page_length == 0 {
            warn!("Page length 0 is not usable, showing 1 row per page");
            1
        } else {
            page_length
        };

        Ok(DashboardConfig {
            port: args.port,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            page_length,
            skip_count_field: args
                .skip_count_field
                .or(settings.skip_count_field)
                .unwrap_or_else(|| DEFAULT_SKIP_COUNT_FIELD.to_string()),
            ..DashboardConfig::with_api_base(parse_api_base(&api_base)?)
        })
    }

    /// Defaults for everything except the API base. `api_base` should
    /// come from [`parse_api_base`].
    pub fn with_api_base(api_base: url::Url) -> Self {
        DashboardConfig {
            api_base,
            port: DEFAULT_DASHBOARD_PORT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_length: DEFAULT_PAGE_LENGTH,
            skip_count_field: DEFAULT_SKIP_COUNT_FIELD.to_string(),
        }
    }
}

/// Parse the API base and normalize it to end with a slash so that
/// relative endpoint paths join under it instead of replacing its last
/// segment.
pub fn parse_api_base(raw: &str) -> Result<url::Url, DashboardError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = url::Url::parse(&normalized)
        .map_err(|e| DashboardError::InvalidApiBase(format!("{trimmed}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DashboardError::InvalidApiBase(format!(
            "{trimmed}: unsupported scheme '{other}'"
        ))),
    }
}
