// View-state controller - navigation state machine and data loaders
use crate::application::api_service::{ApiService, InstanceAction};
use crate::application::console_api::ApiFault;
use crate::application::notification_service::NotificationChannel;
use crate::domain::business::{BusinessInstance, DataPoint};
use crate::domain::config_record::{ConfigKey, ConfigUpdate, flatten_form_to_config};
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::DataFilter;
use crate::domain::pagination::{Page, PaginationState, paginate_with};
use crate::domain::section::{BusinessTab, ConfigTab, Section};
use crate::domain::view::{
    ClusterView, ConfigForms, ConsoleView, Drafts, LoadTickets, LoadedViews, MetadataView, ViewSlot,
};
use crate::infrastructure::config::PaginationSettings;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything that changes as the user works with the console.
struct ConsoleState {
    section: Section,
    business_tab: BusinessTab,
    config_tab: ConfigTab,
    cursor: PaginationState,
    filter: DataFilter,
    views: LoadedViews,
    drafts: Drafts,
    tickets: LoadTickets,
}

impl ConsoleState {
    /// Tickets a load of the active business tab with a candidate cursor and filter.
    fn begin_page_load(&mut self, cursor: PaginationState, filter: DataFilter) -> PageLoad {
        PageLoad {
            ticket: self.tickets.issue(ViewSlot::Page),
            tab: self.business_tab,
            cursor,
            filter,
        }
    }
}

struct PageLoad {
    ticket: u64,
    tab: BusinessTab,
    cursor: PaginationState,
    filter: DataFilter,
}

enum PageData {
    Instances(Page<BusinessInstance>),
    DataPoints(Page<DataPoint>),
    Plugins(Page<String>),
}

/// Owns everything the console shows.
///
/// Actions take `&self` and may overlap. The state lock is only held for short
/// synchronous sections, never across a fetch, so a hung call stalls only the
/// view that issued it. Within one action fetches are awaited strictly in order.
/// Each load takes a ticket for its view and its result is dropped if a newer
/// load of the same view was issued meanwhile. A failed fetch aborts the action
/// and leaves the last successfully loaded data in place.
pub struct ConsoleController {
    api: ApiService,
    notifier: NotificationChannel,
    page_sizes: Vec<usize>,
    state: Mutex<ConsoleState>,
}

impl ConsoleController {
    pub fn new(api: ApiService, notifier: NotificationChannel, pagination: &PaginationSettings) -> Self {
        Self {
            api,
            notifier,
            page_sizes: pagination.page_sizes.clone(),
            state: Mutex::new(ConsoleState {
                section: Section::Dashboard,
                business_tab: BusinessTab::Overview,
                config_tab: ConfigTab::Business,
                cursor: PaginationState::new(pagination.page_size),
                filter: DataFilter::default(),
                views: LoadedViews::default(),
                drafts: Drafts::new(),
                tickets: LoadTickets::default(),
            }),
        }
    }

    // Never hold the guard across an await.
    fn state(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `apply` only if `ticket` is still the latest load issued for `slot`.
    fn commit(&self, slot: ViewSlot, ticket: u64, apply: impl FnOnce(&mut ConsoleState)) -> bool {
        let mut state = self.state();
        if !state.tickets.is_current(slot, ticket) {
            tracing::debug!("Discarding stale {:?} result", slot);
            return false;
        }
        apply(&mut *state);
        true
    }

    pub async fn init(&self) {
        self.load_dashboard().await;
        self.notifier.success("System initialized");
    }

    // ---- navigation ----

    /// Unknown section names are ignored.
    pub async fn switch_section(&self, name: &str) {
        match name.parse::<Section>() {
            Ok(section) => self.activate(section).await,
            Err(e) => tracing::debug!("Ignoring navigation: {}", e),
        }
    }

    /// Activates `section` and runs its loader, even if it is already active.
    pub async fn activate(&self, section: Section) {
        tracing::debug!("Switching to section {}", section);
        self.state().section = section;
        match section {
            Section::Dashboard => self.load_dashboard().await,
            Section::Config => self.load_config().await,
            Section::Metadata => self.load_metadata().await,
            Section::Cluster => self.load_cluster().await,
            Section::Business => self.load_business().await,
        }
    }

    /// Unknown tab names are ignored.
    pub async fn switch_business_tab(&self, name: &str) {
        match name.parse::<BusinessTab>() {
            Ok(tab) => self.select_business_tab(tab).await,
            Err(e) => tracing::debug!("Ignoring business tab switch: {}", e),
        }
    }

    pub async fn select_business_tab(&self, tab: BusinessTab) {
        tracing::debug!("Switching to business tab {}", tab.as_str());
        let load = {
            let mut state = self.state();
            state.business_tab = tab;
            state.cursor.reset();
            let (cursor, filter) = (state.cursor, state.filter.clone());
            state.begin_page_load(cursor, filter)
        };
        self.run_page_load(load).await;
    }

    /// Config tabs only change which form group is shown.
    pub fn switch_config_tab(&self, name: &str) {
        match name.parse::<ConfigTab>() {
            Ok(tab) => self.state().config_tab = tab,
            Err(e) => tracing::debug!("Ignoring config tab switch: {}", e),
        }
    }

    // ---- section loaders ----

    async fn load_dashboard(&self) {
        if let Err(fault) = self.try_load_dashboard().await {
            tracing::error!("Failed to load dashboard: {}", fault);
        }
    }

    async fn try_load_dashboard(&self) -> Result<(), ApiFault> {
        let ticket = self.state().tickets.issue(ViewSlot::Dashboard);
        let stats = self.api.stats().await?;
        let metadata = self.api.metadata().await?;
        let dashboard = Dashboard::new(&stats, &metadata);
        self.commit(ViewSlot::Dashboard, ticket, |state| {
            state.views.dashboard = Some(dashboard.clone())
        });

        let cluster = self.api.cluster().await?;
        self.commit(ViewSlot::Dashboard, ticket, |state| {
            state.views.dashboard = Some(dashboard.with_cluster(&cluster))
        });
        Ok(())
    }

    async fn load_config(&self) {
        let ticket = self.state().tickets.issue(ViewSlot::Config);
        match self.api.config().await {
            Ok(config) => {
                self.commit(ViewSlot::Config, ticket, |state| {
                    state.views.config = Some(config);
                    state.config_tab = ConfigTab::Business;
                });
            }
            Err(fault) => tracing::error!("Failed to load configuration: {}", fault),
        }
    }

    async fn load_metadata(&self) {
        let ticket = self.state().tickets.issue(ViewSlot::Metadata);
        match self.api.metadata().await {
            Ok(metadata) => {
                self.commit(ViewSlot::Metadata, ticket, |state| state.views.metadata = Some(metadata));
            }
            Err(fault) => tracing::error!("Failed to load metadata: {}", fault),
        }
    }

    async fn load_cluster(&self) {
        let ticket = self.state().tickets.issue(ViewSlot::Cluster);
        match self.api.cluster().await {
            Ok(cluster) => {
                self.commit(ViewSlot::Cluster, ticket, |state| state.views.cluster = Some(cluster));
            }
            Err(fault) => tracing::error!("Failed to load cluster status: {}", fault),
        }
    }

    async fn load_business(&self) {
        let (ticket, page_ticket) = {
            let mut state = self.state();
            (state.tickets.issue(ViewSlot::Business), state.tickets.latest(ViewSlot::Page))
        };
        match self.api.business().await {
            Ok(overview) => {
                let summary = overview.summary();
                self.commit(ViewSlot::Business, ticket, |state| {
                    state.views.business = Some(summary);
                    // A tab opened while this load was in flight keeps its place
                    if state.tickets.is_current(ViewSlot::Page, page_ticket) {
                        state.business_tab = BusinessTab::Overview;
                        state.cursor.reset();
                        state.tickets.issue(ViewSlot::Page);
                    }
                });
            }
            Err(fault) => tracing::error!("Failed to load business overview: {}", fault),
        }
    }

    // ---- paginated business tabs ----

    /// Runs a ticketed page load, adopting its cursor and filter only if it
    /// succeeds and is still the latest page load.
    async fn run_page_load(&self, mut load: PageLoad) -> bool {
        let fetched = self.fetch_page(load.tab, &mut load.cursor, &load.filter).await;
        match fetched {
            Ok(page) => {
                let committed = self.commit(ViewSlot::Page, load.ticket, |state| {
                    state.cursor = load.cursor;
                    state.filter = load.filter;
                    match page {
                        Some(PageData::Instances(page)) => state.views.instances = Some(page),
                        Some(PageData::DataPoints(page)) => state.views.data_points = Some(page),
                        Some(PageData::Plugins(page)) => state.views.plugins = Some(page),
                        None => {}
                    }
                });
                if committed && load.tab.is_paginated() {
                    tracing::debug!(
                        "Loaded {} page {}/{} ({} items)",
                        load.tab.as_str(),
                        load.cursor.current_page(),
                        load.cursor.total_pages(),
                        load.cursor.total_items()
                    );
                }
                committed
            }
            Err(fault) => {
                tracing::error!("Failed to load {} page: {}", load.tab.as_str(), fault);
                false
            }
        }
    }

    async fn fetch_page(
        &self,
        tab: BusinessTab,
        cursor: &mut PaginationState,
        filter: &DataFilter,
    ) -> Result<Option<PageData>, ApiFault> {
        let page = match tab {
            BusinessTab::Overview => return Ok(None),
            BusinessTab::Instances => {
                let instances = self.api.business().await?.instances();
                PageData::Instances(paginate_with(&instances, cursor))
            }
            BusinessTab::DataViewer => {
                let items = filter.apply(self.api.business_data().await?.items);
                PageData::DataPoints(paginate_with(&items, cursor))
            }
            BusinessTab::Plugins => {
                let plugins = self.api.business().await?.plugins;
                PageData::Plugins(paginate_with(&plugins, cursor))
            }
        };
        Ok(Some(page))
    }

    pub async fn load_page_data(&self) -> bool {
        let load = {
            let mut state = self.state();
            let (cursor, filter) = (state.cursor, state.filter.clone());
            state.begin_page_load(cursor, filter)
        };
        self.run_page_load(load).await
    }

    pub async fn previous_page(&self) {
        let load = {
            let mut state = self.state();
            let mut cursor = state.cursor;
            if !cursor.previous() {
                return;
            }
            let filter = state.filter.clone();
            state.begin_page_load(cursor, filter)
        };
        self.run_page_load(load).await;
    }

    pub async fn next_page(&self) {
        let load = {
            let mut state = self.state();
            let mut cursor = state.cursor;
            if !cursor.next() {
                return;
            }
            let filter = state.filter.clone();
            state.begin_page_load(cursor, filter)
        };
        self.run_page_load(load).await;
    }

    /// Zero is ignored; any other size keeps the cursor on a valid page.
    pub async fn change_page_size(&self, page_size: usize) {
        if page_size == 0 {
            tracing::warn!("Ignoring page size of zero");
            return;
        }
        let load = {
            let mut state = self.state();
            let mut cursor = state.cursor;
            cursor.set_page_size(page_size);
            let filter = state.filter.clone();
            state.begin_page_load(cursor, filter)
        };
        self.run_page_load(load).await;
    }

    pub async fn apply_filter(&self, search: Option<String>, tag_type: Option<String>) {
        self.reload_first_page(Some(DataFilter::new(search, tag_type))).await;
    }

    pub async fn reset_filter(&self) {
        self.reload_first_page(Some(DataFilter::default())).await;
    }

    pub async fn refresh_instances(&self) {
        self.reload_first_page(None).await;
    }

    /// Reloads page 1, with `filter` replacing the current filter when given.
    async fn reload_first_page(&self, filter: Option<DataFilter>) {
        let load = {
            let mut state = self.state();
            let mut cursor = state.cursor;
            cursor.reset();
            let filter = filter.unwrap_or_else(|| state.filter.clone());
            state.begin_page_load(cursor, filter)
        };
        self.run_page_load(load).await;
    }

    // ---- instance lifecycle ----

    /// Blank ids or types are ignored.
    pub async fn create_instance(&self, instance_id: &str, business_type: &str) {
        let (instance_id, business_type) = (instance_id.trim(), business_type.trim());
        if instance_id.is_empty() || business_type.is_empty() {
            tracing::debug!("Ignoring instance creation without id or type");
            return;
        }

        if let Err(fault) = self.api.create_instance(instance_id, business_type).await {
            tracing::error!("Failed to create instance {}: {}", instance_id, fault);
            return;
        }
        self.notifier.success(format!("Instance {} created", instance_id));
        self.reload_first_page(None).await;
    }

    pub async fn start_instance(&self, instance_id: &str) {
        self.run_instance_action(instance_id, InstanceAction::Start).await;
    }

    pub async fn stop_instance(&self, instance_id: &str) {
        self.run_instance_action(instance_id, InstanceAction::Stop).await;
    }

    pub async fn delete_instance(&self, instance_id: &str) {
        self.run_instance_action(instance_id, InstanceAction::Delete).await;
    }

    /// Stops a running instance or starts any other, judged by the last loaded page.
    pub async fn toggle_instance(&self, instance_id: &str) {
        let running = self
            .state()
            .views
            .instances
            .as_ref()
            .and_then(|page| page.items.iter().find(|i| i.id == instance_id))
            .is_some_and(|instance| instance.status.is_running());
        let action = if running {
            InstanceAction::Stop
        } else {
            InstanceAction::Start
        };
        self.run_instance_action(instance_id, action).await;
    }

    async fn run_instance_action(&self, instance_id: &str, action: InstanceAction) {
        if let Err(fault) = self.api.instance_action(instance_id, action).await {
            tracing::error!("Instance {} {:?} failed: {}", instance_id, action, fault);
            return;
        }

        let verb = match action {
            InstanceAction::Start => "started",
            InstanceAction::Stop => "stopped",
            InstanceAction::Delete => "deleted",
        };
        self.notifier.success(format!("Instance {} {}", instance_id, verb));
        self.load_page_data().await;
    }

    // ---- configuration editing ----

    /// Merges the submitted form into a nested object and stores it under `key`.
    /// On failure the entries are kept as a draft so nothing typed is lost.
    pub async fn save_config(&self, key: &str, entries: Vec<(String, String)>) {
        let key = match key.parse::<ConfigKey>() {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Refusing to save configuration: {}", e);
                return;
            }
        };

        let update = ConfigUpdate::set(key.clone(), flatten_form_to_config(&entries));
        match self.api.update_config(&update).await {
            Ok(()) => {
                tracing::info!("Saved configuration {}", key);
                self.state().drafts.remove(&key);
                self.notifier.success("Configuration saved");
                self.load_config().await;
            }
            Err(fault) => {
                tracing::error!("Failed to save configuration {}: {}", key, fault);
                self.state().drafts.insert(key, entries);
            }
        }
    }

    /// Removes the configuration record of an instance.
    pub async fn delete_instance_config(&self, instance_id: &str) {
        let key = ConfigKey::Instance(instance_id.to_string());
        match self.api.update_config(&ConfigUpdate::delete(key.clone())).await {
            Ok(()) => {
                tracing::info!("Deleted configuration {}", key);
                self.state().drafts.remove(&key);
                self.notifier.success(format!("Instance {} deleted", instance_id));
                self.load_config().await;
            }
            Err(fault) => tracing::error!("Failed to delete configuration {}: {}", key, fault),
        }
    }

    pub fn snapshot(&self) -> ConsoleView {
        let state = self.state();
        ConsoleView {
            section: state.section,
            business_tab: state.business_tab,
            config_tab: state.config_tab,
            pagination: state.cursor,
            page_sizes: self.page_sizes.clone(),
            filter: state.filter.clone(),
            dashboard: state.views.dashboard.clone(),
            config: state
                .views
                .config
                .as_ref()
                .map(|config| ConfigForms::build(config, &state.drafts)),
            metadata: state.views.metadata.as_ref().map(MetadataView::new),
            cluster: state.views.cluster.as_ref().map(ClusterView::new),
            business: state.views.business,
            instances: state.views.instances.clone(),
            data_points: state.views.data_points.clone(),
            plugins: state.views.plugins.clone(),
            notification: self.notifier.current(),
        }
    }
}
