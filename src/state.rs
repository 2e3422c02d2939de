use std::sync::Arc;

use crate::api::HttpReportApi;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::view::ViewOptions;

pub type SharedState = Arc<DashboardState>;

pub struct DashboardState {
    pub config: DashboardConfig,
    pub api: HttpReportApi,
}

impl DashboardState {
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let api = HttpReportApi::new(config.api_base.clone(), config.request_timeout)?;
        Ok(Self { config, api })
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions::from(&self.config)
    }
}
