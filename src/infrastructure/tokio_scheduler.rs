// Tokio-backed flush scheduler - Posts a Flush command back to the engine after a delay
use crate::application::engine_actor::{EngineCommand, EngineHandle};
use crate::application::scheduler::FlushScheduler;
use std::time::Duration;

#[derive(Clone)]
pub struct TokioFlushScheduler {
    engine: EngineHandle,
}

impl TokioFlushScheduler {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }
}

impl FlushScheduler for TokioFlushScheduler {
    /// Must be called from within a tokio runtime.
    fn schedule_flush(&self, delay: Duration) {
        let engine = self.engine.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The engine may have shut down in the meantime; nothing to flush then.
            let _ = engine.send(EngineCommand::Flush);
        });
    }
}
