// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_engine::{DashboardEngine, EngineDeps};
use crate::application::engine_actor::{engine_channel, run_engine};
use crate::application::persistence::Persistence;
use crate::application::quick_actions::QuickActionDispatcher;
use crate::application::scheduler::SystemClock;
use crate::application::snapshot_storage::SnapshotStorage;
use crate::infrastructure::background_storage::BackgroundSnapshotStorage;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::event_navigator::EventNavigator;
use crate::infrastructure::file_storage::FileSnapshotStorage;
use crate::infrastructure::http_exporter::{HttpExporter, ReqwestTransport};
use crate::infrastructure::memory_storage::MemorySnapshotStorage;
use crate::infrastructure::tokio_scheduler::TokioFlushScheduler;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Snapshot storage (infrastructure layer)
    let storage: Arc<dyn SnapshotStorage> = match &config.storage.snapshot_path {
        Some(path) => {
            tracing::info!("Persisting dashboard snapshot to {}", path);
            let (storage, _writer) = BackgroundSnapshotStorage::spawn(Arc::new(FileSnapshotStorage::new(path)));
            Arc::new(storage)
        }
        None => {
            tracing::info!("No snapshot path configured, layout will not survive restarts");
            Arc::new(MemorySnapshotStorage::new())
        }
    };

    // Engine and its collaborators (application layer)
    let (handle, mailbox) = engine_channel();
    let exporter = HttpExporter::new(config.export.url_template.clone(), Arc::new(ReqwestTransport::new()));
    let deps = EngineDeps {
        persistence: Persistence::new(storage),
        clock: Arc::new(SystemClock),
        scheduler: Arc::new(TokioFlushScheduler::new(handle.clone())),
        dispatcher: QuickActionDispatcher::new(Arc::new(EventNavigator::new(handle.clone())), Arc::new(exporter)),
    };
    let engine = DashboardEngine::new(config.engine.settings(), deps);
    tokio::spawn(run_engine(engine, mailbox));

    // Create application state
    let state = Arc::new(AppState { engine: handle });

    // Build router (presentation layer)
    let router = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Starting facility-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
