// Engine actor - Serializes every mutation onto one task that owns the engine
use crate::application::dashboard_engine::{DashboardEngine, DashboardView};
use crate::domain::filters::FiltersPatch;
use crate::domain::metrics::KpiRecord;
use crate::domain::quick_action::QuickAction;
use crate::domain::widget::{Position, Size, Widget, WidgetPatch};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
pub enum EngineCommand {
    Push(serde_json::Value),
    Flush,
    AddWidget(Widget),
    RemoveWidget(String),
    UpdateWidget(String, WidgetPatch),
    MoveWidget(String, Position),
    ResizeWidget(String, Size),
    ToggleWidgetVisibility(String),
    SetWidgetLoading(String, bool),
    SetEditMode(bool),
    SetDraggedWidget(Option<String>),
    ResetLayout,
    SaveLayout,
    SetFilters(FiltersPatch),
    ResetFilters,
    SetRealTimeEnabled(bool),
    ToggleRealTime,
    SetQuickActions(Vec<QuickAction>),
    AddQuickAction(QuickAction),
    RemoveQuickAction(String),
    ExecuteQuickAction(String),
    SetKpiData(Vec<KpiRecord>),
    SetChartData(String, serde_json::Value),
    SetError(Option<String>),
    Reset,
    View(oneshot::Sender<DashboardView>),
    Shutdown,
}

/// Published to every subscriber of the event stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum DashboardEvent {
    State(DashboardView),
    Navigate(String),
}

#[derive(Debug, Error)]
#[error("dashboard engine is not running")]
pub struct EngineStopped;

#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<EngineCommand>,
    events: broadcast::Sender<DashboardEvent>,
}

pub struct EngineMailbox {
    commands: mpsc::UnboundedReceiver<EngineCommand>,
    events: broadcast::Sender<DashboardEvent>,
}

/// Create the handle/mailbox pair. The handle exists before the engine so
/// collaborators (scheduler, navigator) can be wired to it.
pub fn engine_channel() -> (EngineHandle, EngineMailbox) {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
    let handle = EngineHandle {
        commands: commands_tx,
        events: events_tx.clone(),
    };
    let mailbox = EngineMailbox {
        commands: commands_rx,
        events: events_tx,
    };
    (handle, mailbox)
}

impl EngineHandle {
    pub fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        self.commands.send(command).map_err(|_| EngineStopped)
    }

    pub async fn view(&self) -> Result<DashboardView, EngineStopped> {
        let (tx, rx) = oneshot::channel();
        self.send(EngineCommand::View(tx))?;
        rx.await.map_err(|_| EngineStopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Publish an event that did not originate from a state change.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        self.events.send(event).unwrap_or(0)
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(EngineCommand::Shutdown);
    }
}

/// Owns the engine until `Shutdown` arrives. The scheduler and navigator
/// hold handles of their own, so dropping the outside handles is not enough.
pub async fn run_engine(mut engine: DashboardEngine, mut mailbox: EngineMailbox) {
    tracing::info!("Dashboard engine started");
    while let Some(command) = mailbox.commands.recv().await {
        match command {
            EngineCommand::Shutdown => break,
            EngineCommand::View(reply) => {
                let _ = reply.send(engine.view());
            }
            command => {
                let before = engine.revision();
                apply(&mut engine, command);
                if engine.revision() != before {
                    let _ = mailbox.events.send(DashboardEvent::State(engine.view()));
                }
            }
        }
    }
    tracing::info!("Dashboard engine stopped");
}

fn apply(engine: &mut DashboardEngine, command: EngineCommand) {
    match command {
        EngineCommand::Push(message) => engine.handle_push_message(&message),
        EngineCommand::Flush => {
            engine.flush_updates();
        }
        EngineCommand::AddWidget(widget) => engine.add_widget(widget),
        EngineCommand::RemoveWidget(id) => engine.remove_widget(&id),
        EngineCommand::UpdateWidget(id, patch) => engine.update_widget(&id, patch),
        EngineCommand::MoveWidget(id, position) => engine.move_widget(&id, position),
        EngineCommand::ResizeWidget(id, size) => engine.resize_widget(&id, size),
        EngineCommand::ToggleWidgetVisibility(id) => engine.toggle_widget_visibility(&id),
        EngineCommand::SetWidgetLoading(id, loading) => engine.set_widget_loading(&id, loading),
        EngineCommand::SetEditMode(enabled) => engine.set_edit_mode(enabled),
        EngineCommand::SetDraggedWidget(id) => engine.set_dragged_widget(id.as_deref()),
        EngineCommand::ResetLayout => engine.reset_layout(),
        EngineCommand::SaveLayout => engine.save_layout(),
        EngineCommand::SetFilters(patch) => engine.set_filters(patch),
        EngineCommand::ResetFilters => engine.reset_filters(),
        EngineCommand::SetRealTimeEnabled(enabled) => engine.set_real_time_enabled(enabled),
        EngineCommand::ToggleRealTime => engine.toggle_real_time(),
        EngineCommand::SetQuickActions(actions) => engine.set_quick_actions(actions),
        EngineCommand::AddQuickAction(action) => engine.add_quick_action(action),
        EngineCommand::RemoveQuickAction(id) => engine.remove_quick_action(&id),
        EngineCommand::ExecuteQuickAction(id) => {
            engine.execute_quick_action(&id);
        }
        EngineCommand::SetKpiData(records) => engine.set_kpi_data(records),
        EngineCommand::SetChartData(id, series) => engine.set_chart_data(&id, series),
        EngineCommand::SetError(error) => engine.set_error(error),
        EngineCommand::Reset => engine.reset(),
        EngineCommand::View(_) | EngineCommand::Shutdown => {}
    }
}
