// Dashboard engine - Owns layout, filters and metrics, and merges push updates into them
use crate::application::filter_manager::FilterManager;
use crate::application::metrics_store::MetricsStore;
use crate::application::persistence::{from_persistable, to_persistable, PersistedSnapshot, Persistence, RestoredState};
use crate::application::quick_actions::QuickActionDispatcher;
use crate::application::scheduler::{Clock, FlushScheduler};
use crate::application::update_buffer::{FlushOutcome, UpdateBuffer};
use crate::application::update_classifier::{classify, Classification};
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::filters::{Filters, FiltersPatch};
use crate::domain::metrics::{ChartData, KpiRecord};
use crate::domain::quick_action::{default_quick_actions, ActionCommand, QuickAction};
use crate::domain::update::MetricUpdateMessage;
use crate::domain::widget::{Position, Size, Widget, WidgetPatch};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub flush_delay: Duration,
    pub default_window_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            flush_delay: DEFAULT_FLUSH_DELAY,
            default_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Collaborators the engine talks to. All of them are fire-and-forget.
#[derive(Clone)]
pub struct EngineDeps {
    pub persistence: Persistence,
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn FlushScheduler>,
    pub dispatcher: QuickActionDispatcher,
}

/// Everything the view layer may read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub widgets: Vec<Widget>,
    pub kpi_data: Vec<KpiRecord>,
    pub chart_data: ChartData,
    pub filters: Filters,
    pub is_edit_mode: bool,
    pub dragged_widget: Option<String>,
    pub widget_loading_states: BTreeMap<String, bool>,
    pub last_update: Option<DateTime<Utc>>,
    pub last_realtime_update: Option<DateTime<Utc>>,
    pub quick_actions: Vec<QuickAction>,
    pub real_time_enabled: bool,
    pub error: Option<String>,
    pub revision: u64,
}

/// The dashboard state container.
///
/// Mutations come from three places: view-layer edits, push messages and
/// scheduled flushes. None of them can fail; input that cannot be applied is
/// dropped. `revision` increases by one for every mutation that changed what
/// the view layer can see.
pub struct DashboardEngine {
    settings: EngineSettings,
    deps: EngineDeps,
    registry: WidgetRegistry,
    filters: FilterManager,
    buffer: UpdateBuffer,
    metrics: MetricsStore,
    quick_actions: Vec<QuickAction>,
    real_time_enabled: bool,
    widget_loading: BTreeMap<String, bool>,
    error: Option<String>,
    revision: u64,
}

impl DashboardEngine {
    /// Hydrates from durable storage, falling back to defaults.
    pub fn new(settings: EngineSettings, deps: EngineDeps) -> Self {
        let restored = deps.persistence.restore();
        Self::hydrate(settings, deps, restored)
    }

    /// Starts from the given snapshot instead of reading storage.
    pub fn from_snapshot(settings: EngineSettings, deps: EngineDeps, snapshot: Option<PersistedSnapshot>) -> Self {
        let restored = snapshot.map(from_persistable);
        Self::hydrate(settings, deps, restored)
    }

    fn hydrate(settings: EngineSettings, deps: EngineDeps, restored: Option<RestoredState>) -> Self {
        let default_filters = Filters::trailing(deps.clock.today(), settings.default_window_days);
        let mut engine = Self {
            settings,
            deps,
            registry: WidgetRegistry::default(),
            filters: FilterManager::new(default_filters.clone()),
            buffer: UpdateBuffer::new(),
            metrics: MetricsStore::new(),
            quick_actions: default_quick_actions(),
            real_time_enabled: true,
            widget_loading: BTreeMap::new(),
            error: None,
            revision: 0,
        };

        if let Some(restored) = restored {
            tracing::info!(
                "Restored dashboard snapshot (widgets: {}, filters: {}, realtime flag: {}, quick actions: {})",
                restored.widgets.is_some(),
                restored.filters.is_some(),
                restored.real_time_enabled.is_some(),
                restored.quick_actions.is_some()
            );
            if let Some(widgets) = restored.widgets {
                engine.registry = WidgetRegistry::new(widgets);
            }
            if let Some(filters) = restored.filters {
                engine.filters = FilterManager::with_current(default_filters, filters);
            }
            if let Some(enabled) = restored.real_time_enabled {
                engine.real_time_enabled = enabled;
            }
            if let Some(actions) = restored.quick_actions {
                engine.quick_actions = actions;
            }
        }
        engine
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_updates(&self) -> usize {
        self.buffer.len()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            widgets: self.registry.widgets().to_vec(),
            kpi_data: self.metrics.kpis().to_vec(),
            chart_data: self.metrics.charts().clone(),
            filters: self.filters.current().clone(),
            is_edit_mode: self.registry.is_edit_mode(),
            dragged_widget: self.registry.dragged_widget().map(str::to_string),
            widget_loading_states: self.widget_loading.clone(),
            last_update: self.metrics.last_update(),
            last_realtime_update: self.metrics.last_realtime_update(),
            quick_actions: self.quick_actions.clone(),
            real_time_enabled: self.real_time_enabled,
            error: self.error.clone(),
            revision: self.revision,
        }
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        to_persistable(
            self.registry.widgets(),
            self.filters.current(),
            self.real_time_enabled,
            &self.quick_actions,
        )
    }

    // ---- widgets -------------------------------------------------------

    pub fn add_widget(&mut self, widget: Widget) {
        if self.registry.add(widget) {
            self.persisted_change();
        }
    }

    pub fn remove_widget(&mut self, id: &str) {
        if self.registry.remove(id) {
            self.widget_loading.remove(id);
            self.persisted_change();
        }
    }

    pub fn update_widget(&mut self, id: &str, patch: WidgetPatch) {
        if self.registry.update(id, patch) {
            self.persisted_change();
        }
    }

    pub fn move_widget(&mut self, id: &str, position: Position) {
        if self.registry.move_widget(id, position) {
            self.persisted_change();
        }
    }

    pub fn resize_widget(&mut self, id: &str, size: Size) {
        if self.registry.resize(id, size) {
            self.persisted_change();
        }
    }

    pub fn toggle_widget_visibility(&mut self, id: &str) {
        if self.registry.toggle_visibility(id) {
            self.persisted_change();
        }
    }

    pub fn set_widget_loading(&mut self, id: &str, loading: bool) {
        if self.registry.get(id).is_none() {
            tracing::debug!("Ignoring loading state for unknown widget {}", id);
            return;
        }
        if self.widget_loading.insert(id.to_string(), loading) != Some(loading) {
            self.changed();
        }
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.registry.set_edit_mode(enabled) {
            self.changed();
        }
    }

    pub fn set_dragged_widget(&mut self, id: Option<&str>) {
        if self.registry.set_dragged_widget(id) {
            self.changed();
        }
    }

    pub fn reset_layout(&mut self) {
        self.registry.reset_layout();
        let registry = &self.registry;
        self.widget_loading.retain(|id, _| registry.get(id).is_some());
        self.persisted_change();
    }

    pub fn save_layout(&mut self) {
        if self.registry.save_layout() {
            self.changed();
        }
    }

    // ---- filters -------------------------------------------------------

    pub fn set_filters(&mut self, patch: FiltersPatch) {
        if self.filters.set_filters(patch) {
            self.persisted_change();
        }
    }

    pub fn reset_filters(&mut self) {
        if self.filters.reset_filters() {
            self.persisted_change();
        }
    }

    // ---- realtime gate -------------------------------------------------

    pub fn set_real_time_enabled(&mut self, enabled: bool) {
        if self.real_time_enabled != enabled {
            self.real_time_enabled = enabled;
            self.persisted_change();
        }
    }

    pub fn toggle_real_time(&mut self) {
        self.set_real_time_enabled(!self.real_time_enabled);
    }

    // ---- quick actions -------------------------------------------------

    pub fn set_quick_actions(&mut self, actions: Vec<QuickAction>) {
        let mut deduped: Vec<QuickAction> = Vec::with_capacity(actions.len());
        for action in actions {
            if !deduped.iter().any(|a| a.id == action.id) {
                deduped.push(action);
            }
        }
        if deduped != self.quick_actions {
            self.quick_actions = deduped;
            self.persisted_change();
        }
    }

    pub fn add_quick_action(&mut self, action: QuickAction) {
        if self.quick_actions.iter().any(|a| a.id == action.id) {
            tracing::debug!("Ignoring quick action with duplicate id {}", action.id);
            return;
        }
        self.quick_actions.push(action);
        self.persisted_change();
    }

    pub fn remove_quick_action(&mut self, id: &str) {
        let before = self.quick_actions.len();
        self.quick_actions.retain(|a| a.id != id);
        if self.quick_actions.len() != before {
            self.persisted_change();
        }
    }

    pub fn execute_quick_action(&self, id: &str) -> Option<ActionCommand> {
        self.deps
            .dispatcher
            .execute(&self.quick_actions, id, self.filters.current())
    }

    // ---- collaborator-owned surfaces -----------------------------------

    /// Seeds the KPI list from the initial fetch.
    pub fn set_kpi_data(&mut self, records: Vec<KpiRecord>) {
        self.metrics.set_kpis(records);
        self.changed();
    }

    pub fn set_chart_data(&mut self, chart_id: &str, series: serde_json::Value) {
        self.metrics.set_chart(chart_id, series);
        self.changed();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        if self.error != error {
            self.error = error;
            self.changed();
        }
    }

    // ---- push channel --------------------------------------------------

    pub fn handle_push_message(&mut self, message: &serde_json::Value) {
        match classify(message) {
            Classification::Ignored => {}
            Classification::Batch(update) => self.apply_batch(update),
            Classification::Realtime(update) => self.buffer_realtime(update),
        }
    }

    fn apply_batch(&mut self, update: MetricUpdateMessage) {
        if !self.real_time_enabled {
            tracing::debug!("Real-time updates disabled, dropping batch update {}", update.id);
            return;
        }
        let patches = self.metrics.apply_kpi_patches(update.payload.kpi_updates());
        let charts = update
            .payload
            .metrics
            .as_ref()
            .map_or(0, |metrics| self.metrics.apply_metrics(metrics));
        self.metrics.mark_updated(self.deps.clock.now());
        tracing::debug!("Applied batch update {} ({} KPI patches, {} charts)", update.id, patches, charts);
        self.changed();
    }

    fn buffer_realtime(&mut self, update: MetricUpdateMessage) {
        if !self.real_time_enabled {
            tracing::debug!("Real-time updates disabled, dropping realtime update {}", update.id);
            return;
        }
        self.buffer.insert(update.id, update.payload);
        self.deps.scheduler.schedule_flush(self.settings.flush_delay);
        self.metrics.mark_realtime_arrival(self.deps.clock.now());
        self.changed();
    }

    /// Applies everything buffered in one state change. Flushing an empty
    /// buffer does nothing, so stale scheduled flushes are harmless.
    pub fn flush_updates(&mut self) -> FlushOutcome {
        if self.buffer.is_empty() {
            return FlushOutcome::default();
        }
        if !self.real_time_enabled {
            let dropped = self.buffer.clear();
            tracing::debug!("Real-time updates disabled, discarded {} buffered updates", dropped);
            return FlushOutcome::default();
        }
        let outcome = self.buffer.flush(&mut self.metrics);
        tracing::debug!(
            "Flushed {} buffered updates ({} KPI patches)",
            outcome.messages,
            outcome.kpi_patches
        );
        self.changed();
        outcome
    }

    /// Returns every field to its default, drops pending updates and stores
    /// the default snapshot.
    pub fn reset(&mut self) {
        let default_filters = Filters::trailing(self.deps.clock.today(), self.settings.default_window_days);
        self.registry = WidgetRegistry::default();
        self.filters = FilterManager::new(default_filters);
        self.buffer.clear();
        self.metrics = MetricsStore::new();
        self.quick_actions = default_quick_actions();
        self.real_time_enabled = true;
        self.widget_loading.clear();
        self.error = None;
        self.persisted_change();
    }

    fn changed(&mut self) {
        self.revision += 1;
    }

    fn persisted_change(&mut self) {
        self.changed();
        self.deps.persistence.save(&self.snapshot());
    }
}
