// Router - Maps HTTP paths onto handlers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Compression is applied per response by the handlers, so there is no
// CompressionLayer here.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/events", get(stream_events))
        .route("/push", post(push_message))
        .route("/widgets", post(add_widget))
        .route("/widgets/:id", delete(remove_widget).patch(update_widget))
        .route("/widgets/:id/position", put(move_widget))
        .route("/widgets/:id/size", put(resize_widget))
        .route("/widgets/:id/toggle", post(toggle_widget))
        .route("/widgets/:id/loading", put(set_widget_loading))
        .route("/layout/edit-mode", put(set_edit_mode))
        .route("/layout/dragged", put(set_dragged_widget))
        .route("/layout/reset", post(reset_layout))
        .route("/layout/save", post(save_layout))
        .route("/filters", axum::routing::patch(set_filters))
        .route("/filters/reset", post(reset_filters))
        .route("/realtime", put(set_real_time))
        .route("/realtime/toggle", post(toggle_real_time))
        .route("/quick-actions", post(add_quick_action).put(set_quick_actions))
        .route("/quick-actions/:id", delete(remove_quick_action))
        .route("/quick-actions/:id/execute", post(execute_quick_action))
        .route("/seed/kpis", post(seed_kpis))
        .route("/seed/charts/:id", put(seed_chart))
        .route("/error", put(set_error))
        .route("/reset", post(reset_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_engine::{DashboardEngine, EngineDeps, EngineSettings};
    use crate::application::engine_actor::{engine_channel, run_engine, EngineHandle};
    use crate::application::persistence::Persistence;
    use crate::application::quick_actions::testing::RecordingExporter;
    use crate::application::quick_actions::QuickActionDispatcher;
    use crate::application::scheduler::SystemClock;
    use crate::infrastructure::event_navigator::EventNavigator;
    use crate::infrastructure::memory_storage::MemorySnapshotStorage;
    use crate::infrastructure::tokio_scheduler::TokioFlushScheduler;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::task::JoinHandle;
    use tower::ServiceExt;

    fn app() -> (Router, EngineHandle, JoinHandle<()>) {
        let (handle, mailbox) = engine_channel();
        let deps = EngineDeps {
            persistence: Persistence::new(Arc::new(MemorySnapshotStorage::new())),
            clock: Arc::new(SystemClock),
            scheduler: Arc::new(TokioFlushScheduler::new(handle.clone())),
            dispatcher: QuickActionDispatcher::new(
                Arc::new(EventNavigator::new(handle.clone())),
                Arc::new(RecordingExporter::default()),
            ),
        };
        let engine = DashboardEngine::new(EngineSettings::default(), deps);
        let task = tokio::spawn(run_engine(engine, mailbox));
        let state = Arc::new(AppState { engine: handle.clone() });
        (router(state), handle, task)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn dashboard(app: &Router) -> Value {
        let response = app
            .clone()
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _handle, _task) = app();
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_starts_with_default_layout() {
        let (app, _handle, _task) = app();
        let view = dashboard(&app).await;

        assert_eq!(view["widgets"].as_array().unwrap().len(), 9);
        assert_eq!(view["realTimeEnabled"], true);
        assert_eq!(view["isEditMode"], false);
    }

    #[tokio::test]
    async fn test_toggle_widget_then_read_back() {
        let (app, _handle, _task) = app();
        let response = app
            .clone()
            .oneshot(Request::post("/widgets/kpi-revenue/toggle").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let view = dashboard(&app).await;
        let widget = view["widgets"]
            .as_array()
            .unwrap()
            .iter()
            .find(|w| w["id"] == "kpi-revenue")
            .unwrap()
            .clone();
        assert_eq!(widget["isVisible"], false);
    }

    #[tokio::test]
    async fn test_batch_push_is_applied() {
        let (app, _handle, _task) = app();
        let message = json!({
            "id": "m-1",
            "type": "metrics:update",
            "payload": {"type": "batch", "kpiUpdates": [{"id": "revenue", "value": 1250.0}]}
        });
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/push", message))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let view = dashboard(&app).await;
        assert_eq!(view["kpiData"][0]["id"], "revenue");
        assert_eq!(view["kpiData"][0]["value"], 1250.0);
    }

    #[tokio::test]
    async fn test_non_json_push_is_accepted_and_ignored() {
        let (app, _handle, _task) = app();
        let before = dashboard(&app).await;
        let response = app
            .clone()
            .oneshot(Request::post("/push").body(Body::from("ping")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        assert_eq!(dashboard(&app).await["revision"], before["revision"]);
    }

    #[tokio::test]
    async fn test_update_widget_rejects_config_without_type() {
        let (app, _handle, _task) = app();
        let response = app
            .oneshot(json_request(
                Method::PATCH,
                "/widgets/kpi-revenue",
                json!({"config": {"kpiId": "members"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_filters_patch_keeps_unspecified_fields() {
        let (app, _handle, _task) = app();
        let before = dashboard(&app).await;
        let response = app
            .clone()
            .oneshot(json_request(Method::PATCH, "/filters", json!({"clubs": ["north"]})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let view = dashboard(&app).await;
        assert_eq!(view["filters"]["clubs"], json!(["north"]));
        assert_eq!(view["filters"]["dateRange"], before["filters"]["dateRange"]);
    }

    #[tokio::test]
    async fn test_engine_unavailable_after_shutdown() {
        let (app, handle, task) = app();
        handle.shutdown();
        task.await.unwrap();

        let response = app
            .oneshot(Request::post("/layout/save").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
