use serde::Serialize;
use tracing::debug;

use crate::charts::ChartConfig;
use crate::model::Role;
use crate::table::Grid;

/// Lifecycle of a page. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    Loading,
    RoleDetermined,
    FullView,
    RoleMinimalView,
    HiddenView,
    Populated,
}

impl PageState {
    fn rank(self) -> u8 {
        match self {
            PageState::Loading => 0,
            PageState::RoleDetermined => 1,
            PageState::FullView | PageState::RoleMinimalView | PageState::HiddenView => 2,
            PageState::Populated => 3,
        }
    }
}

/// Which sections a role gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Receivers: latency, rate, properties and node information.
    Full,
    /// Senders: everything but latency.
    RoleMinimal,
    /// Any other role: no latency, no rate, no properties.
    Hidden,
}

impl ViewMode {
    pub fn for_role(role: &Role) -> Self {
        match role {
            Role::Receiver => ViewMode::Full,
            Role::Sender => ViewMode::RoleMinimal,
            Role::Other(_) => ViewMode::Hidden,
        }
    }

    pub fn state(self) -> PageState {
        match self {
            ViewMode::Full => PageState::FullView,
            ViewMode::RoleMinimal => PageState::RoleMinimalView,
            ViewMode::Hidden => PageState::HiddenView,
        }
    }
}

/// A labelled value written into a statistics table cell.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Cell {
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Content {
    Grid(Grid),
    Chart(ChartConfig),
    Cells(Vec<Cell>),
}

/// Result of populating one panel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "content", rename_all = "snake_case")]
pub enum PanelOutcome {
    Populated(Content),
    Empty,
    Failed(String),
}

impl PanelOutcome {
    pub fn is_populated(&self) -> bool {
        matches!(self, PanelOutcome::Populated(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "visibility", content = "panel", rename_all = "snake_case")]
pub enum Region {
    Hidden,
    Visible(PanelOutcome),
}

/// Content destined for one region of the page.
#[derive(Debug, Clone)]
pub struct RegionUpdate {
    pub target: String,
    pub outcome: PanelOutcome,
}

impl RegionUpdate {
    pub fn new(target: impl Into<String>, outcome: PanelOutcome) -> Self {
        RegionUpdate {
            target: target.into(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionEntry {
    pub id: String,
    pub region: Region,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// The rendered state of one dashboard page: an ordered set of named
/// regions, each either hidden or carrying a panel outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub role: Option<Role>,
    pub mode: Option<ViewMode>,
    pub links: Vec<NavLink>,
    history: Vec<PageState>,
    regions: Vec<RegionEntry>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Page {
            title: title.into(),
            role: None,
            mode: None,
            links: Vec::new(),
            history: vec![PageState::Loading],
            regions: Vec::new(),
        }
    }

    pub fn state(&self) -> PageState {
        self.history.last().copied().unwrap_or(PageState::Loading)
    }

    pub fn history(&self) -> &[PageState] {
        &self.history
    }

    /// Move to `next`; backward or sideways moves are ignored.
    pub fn advance(&mut self, next: PageState) {
        if next.rank() > self.state().rank() {
            self.history.push(next);
        } else {
            debug!("Ignoring page transition {:?} -> {:?}", self.state(), next);
        }
    }

    pub fn link(&mut self, label: impl Into<String>, href: impl Into<String>) {
        self.links.push(NavLink {
            label: label.into(),
            href: href.into(),
        });
    }

    pub fn hide(&mut self, id: &str) {
        self.put(id, Region::Hidden);
    }

    pub fn apply(&mut self, update: RegionUpdate) {
        self.put(&update.target, Region::Visible(update.outcome));
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|e| e.id == id).map(|e| &e.region)
    }

    pub fn outcome(&self, id: &str) -> Option<&PanelOutcome> {
        match self.region(id)? {
            Region::Visible(outcome) => Some(outcome),
            Region::Hidden => None,
        }
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        matches!(self.region(id), Some(Region::Hidden))
    }

    pub fn regions(&self) -> &[RegionEntry] {
        &self.regions
    }

    fn put(&mut self, id: &str, region: Region) {
        match self.regions.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.region = region,
            None => self.regions.push(RegionEntry {
                id: id.to_string(),
                region,
            }),
        }
    }
}
