// Application state for HTTP handlers
use crate::application::engine_actor::EngineHandle;

#[derive(Clone)]
pub struct AppState {
    pub engine: EngineHandle,
}
