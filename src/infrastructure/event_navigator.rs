// Navigator that forwards navigation requests to event-stream subscribers
use crate::application::engine_actor::{DashboardEvent, EngineHandle};
use crate::application::quick_actions::Navigator;

/// The view layer does the actual routing; we only tell it where to go.
#[derive(Clone)]
pub struct EventNavigator {
    engine: EngineHandle,
}

impl EventNavigator {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }
}

impl Navigator for EventNavigator {
    fn navigate(&self, target: &str) {
        let receivers = self.engine.publish(DashboardEvent::Navigate(target.to_string()));
        if receivers == 0 {
            tracing::debug!("No subscribers for navigation to {}", target);
        }
    }
}
