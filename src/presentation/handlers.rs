// HTTP request handlers
use crate::application::engine_actor::EngineCommand;
use crate::domain::filters::FiltersPatch;
use crate::domain::metrics::KpiRecord;
use crate::domain::quick_action::QuickAction;
use crate::domain::widget::{Position, Size, Widget, WidgetConfig, WidgetPatch, WidgetType};
use crate::infrastructure::event_stream::stream_from_subscription;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

type Accepted = Result<StatusCode, ApiError>;

fn dispatch(state: &AppState, command: EngineCommand) -> Accepted {
    state.engine.send(command)?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWidgetRequest {
    pub title: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    #[serde(rename = "type")]
    pub widget_type: Option<WidgetType>,
    pub config: Option<serde_json::Value>,
    pub is_visible: Option<bool>,
}

impl TryFrom<UpdateWidgetRequest> for WidgetPatch {
    type Error = ApiError;

    fn try_from(request: UpdateWidgetRequest) -> Result<Self, Self::Error> {
        let config = match (request.widget_type, request.config) {
            (Some(widget_type), Some(config)) => Some(
                WidgetConfig::from_value(widget_type, config)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?,
            ),
            (None, None) => None,
            _ => {
                return Err(ApiError::InvalidRequest(
                    "type and config must be updated together".to_string(),
                ))
            }
        };
        Ok(WidgetPatch {
            title: request.title,
            position: request.position,
            size: request.size,
            config,
            is_visible: request.is_visible,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoadingRequest {
    pub loading: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggedRequest {
    pub widget_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorRequest {
    pub error: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard state
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let view = state.engine.view().await?;
    Ok(match json_response(&view, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}

/// Stream state changes and navigation requests
pub async fn stream_events(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_subscription(state.engine.subscribe(), accepts_brotli(&headers))
}

/// Raw push-channel message. Anything that is not JSON is dropped like any
/// other unrecognized message.
pub async fn push_message(State(state): State<Arc<AppState>>, body: Bytes) -> Accepted {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(message) => dispatch(&state, EngineCommand::Push(message)),
        Err(e) => {
            tracing::debug!("Ignoring push message that is not JSON: {}", e);
            Ok(StatusCode::ACCEPTED)
        }
    }
}

pub async fn add_widget(State(state): State<Arc<AppState>>, Json(widget): Json<Widget>) -> Accepted {
    dispatch(&state, EngineCommand::AddWidget(widget))
}

pub async fn remove_widget(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::RemoveWidget(id))
}

pub async fn update_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateWidgetRequest>,
) -> Accepted {
    let patch = WidgetPatch::try_from(request)?;
    dispatch(&state, EngineCommand::UpdateWidget(id, patch))
}

pub async fn move_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(position): Json<Position>,
) -> Accepted {
    dispatch(&state, EngineCommand::MoveWidget(id, position))
}

pub async fn resize_widget(Path(id): Path<String>, State(state): State<Arc<AppState>>, Json(size): Json<Size>) -> Accepted {
    dispatch(&state, EngineCommand::ResizeWidget(id, size))
}

pub async fn toggle_widget(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::ToggleWidgetVisibility(id))
}

pub async fn set_widget_loading(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoadingRequest>,
) -> Accepted {
    dispatch(&state, EngineCommand::SetWidgetLoading(id, request.loading))
}

pub async fn set_edit_mode(State(state): State<Arc<AppState>>, Json(request): Json<EnabledRequest>) -> Accepted {
    dispatch(&state, EngineCommand::SetEditMode(request.enabled))
}

pub async fn set_dragged_widget(State(state): State<Arc<AppState>>, Json(request): Json<DraggedRequest>) -> Accepted {
    dispatch(&state, EngineCommand::SetDraggedWidget(request.widget_id))
}

pub async fn reset_layout(State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::ResetLayout)
}

pub async fn save_layout(State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::SaveLayout)
}

pub async fn set_filters(State(state): State<Arc<AppState>>, Json(patch): Json<FiltersPatch>) -> Accepted {
    dispatch(&state, EngineCommand::SetFilters(patch))
}

pub async fn reset_filters(State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::ResetFilters)
}

pub async fn set_real_time(State(state): State<Arc<AppState>>, Json(request): Json<EnabledRequest>) -> Accepted {
    dispatch(&state, EngineCommand::SetRealTimeEnabled(request.enabled))
}

pub async fn toggle_real_time(State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::ToggleRealTime)
}

pub async fn set_quick_actions(State(state): State<Arc<AppState>>, Json(actions): Json<Vec<QuickAction>>) -> Accepted {
    dispatch(&state, EngineCommand::SetQuickActions(actions))
}

pub async fn add_quick_action(State(state): State<Arc<AppState>>, Json(action): Json<QuickAction>) -> Accepted {
    dispatch(&state, EngineCommand::AddQuickAction(action))
}

pub async fn remove_quick_action(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::RemoveQuickAction(id))
}

pub async fn execute_quick_action(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::ExecuteQuickAction(id))
}

/// Initial KPI values from the view layer's own fetch
pub async fn seed_kpis(State(state): State<Arc<AppState>>, Json(records): Json<Vec<KpiRecord>>) -> Accepted {
    dispatch(&state, EngineCommand::SetKpiData(records))
}

pub async fn seed_chart(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(series): Json<serde_json::Value>,
) -> Accepted {
    dispatch(&state, EngineCommand::SetChartData(id, series))
}

pub async fn set_error(State(state): State<Arc<AppState>>, Json(request): Json<ErrorRequest>) -> Accepted {
    dispatch(&state, EngineCommand::SetError(request.error))
}

pub async fn reset_dashboard(State(state): State<Arc<AppState>>) -> Accepted {
    dispatch(&state, EngineCommand::Reset)
}
