// Renderable view state handed to the presentation layer
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::business::{BusinessInstance, BusinessSummary, DataPoint};
use super::cluster::{BusinessTypeRow, ClusterInfo, ClusterNode, MetadataInfo};
use super::config_form::{self, ConfigForm};
use super::config_record::{ConfigKey, ConsoleConfig};
use super::dashboard::Dashboard;
use super::filter::DataFilter;
use super::notification::Notification;
use super::pagination::{Page, PaginationState};
use super::section::{BusinessTab, ConfigTab, Section};

/// Unsaved form input, keyed by the scope it was submitted for.
pub type Drafts = BTreeMap<ConfigKey, Vec<(String, String)>>;

/// Independently loaded parts of the console. Each has its own load sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ViewSlot {
    Dashboard,
    Config,
    Metadata,
    Cluster,
    Business,
    /// Whichever paginated business tab is active.
    Page,
}

/// Monotonic load tickets per view slot.
///
/// Every load takes a ticket before its first fetch; when it finishes, its
/// result is only applied if no newer ticket was issued for the same slot.
#[derive(Debug, Clone, Default)]
pub struct LoadTickets {
    issued: BTreeMap<ViewSlot, u64>,
}

impl LoadTickets {
    pub fn issue(&mut self, slot: ViewSlot) -> u64 {
        let latest = self.issued.entry(slot).or_default();
        *latest += 1;
        *latest
    }

    /// 0 until the first ticket for `slot` is issued.
    pub fn latest(&self, slot: ViewSlot) -> u64 {
        self.issued.get(&slot).copied().unwrap_or_default()
    }

    pub fn is_current(&self, slot: ViewSlot, ticket: u64) -> bool {
        self.latest(slot) == ticket
    }
}

/// Last successfully loaded data for each view. A failed load leaves its slot untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedViews {
    pub dashboard: Option<Dashboard>,
    pub config: Option<ConsoleConfig>,
    pub metadata: Option<MetadataInfo>,
    pub cluster: Option<ClusterInfo>,
    pub business: Option<BusinessSummary>,
    pub instances: Option<Page<BusinessInstance>>,
    pub data_points: Option<Page<DataPoint>>,
    pub plugins: Option<Page<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigForms {
    pub business: Vec<ConfigForm>,
    pub system: Option<ConfigForm>,
    pub instances: Vec<ConfigForm>,
}

impl ConfigForms {
    pub fn build(config: &ConsoleConfig, drafts: &Drafts) -> Self {
        let apply_draft = |form: ConfigForm| match drafts.get(&form.key) {
            Some(draft) => form.with_draft(draft),
            None => form,
        };

        Self {
            business: config_form::business_forms(config)
                .into_iter()
                .map(apply_draft)
                .collect(),
            system: config_form::system_form(config).map(apply_draft),
            instances: config_form::instance_forms(config)
                .into_iter()
                .map(apply_draft)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataView {
    pub info: MetadataInfo,
    pub business_types: Vec<BusinessTypeRow>,
}

impl MetadataView {
    pub fn new(info: &MetadataInfo) -> Self {
        Self {
            business_types: info.business_type_rows(),
            info: info.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterNodeView {
    pub id: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub online: bool,
    pub last_active: Option<DateTime<Utc>>,
}

impl ClusterNodeView {
    pub fn new(node: &ClusterNode) -> Self {
        Self {
            id: node.id.clone(),
            address: node.address.clone(),
            status: node.status.clone(),
            online: node.is_online(),
            last_active: node.last_active.as_ref().and_then(|t| t.to_datetime()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterView {
    pub status: Option<String>,
    pub online: bool,
    pub leader: Option<String>,
    pub nodes: Vec<ClusterNodeView>,
}

impl ClusterView {
    pub fn new(info: &ClusterInfo) -> Self {
        Self {
            status: info.status.clone(),
            online: info.is_online(),
            leader: info.leader.clone(),
            nodes: info.nodes.iter().map(ClusterNodeView::new).collect(),
        }
    }
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleView {
    pub section: Section,
    pub business_tab: BusinessTab,
    pub config_tab: ConfigTab,
    pub pagination: PaginationState,
    pub page_sizes: Vec<usize>,
    pub filter: DataFilter,
    pub dashboard: Option<Dashboard>,
    pub config: Option<ConfigForms>,
    pub metadata: Option<MetadataView>,
    pub cluster: Option<ClusterView>,
    pub business: Option<BusinessSummary>,
    pub instances: Option<Page<BusinessInstance>>,
    pub data_points: Option<Page<DataPoint>>,
    pub plugins: Option<Page<String>>,
    pub notification: Option<Notification>,
}
