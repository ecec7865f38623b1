// Quick action dispatcher - Routes declarative actions to their collaborators
use crate::domain::filters::Filters;
use crate::domain::quick_action::{ActionCommand, QuickAction};
use std::sync::Arc;

/// Routing collaborator. Fire-and-forget.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Export collaborator. Fire-and-forget; `filters` is the reporting window
/// the dashboard is showing when the export is requested.
pub trait Exporter: Send + Sync {
    fn export(&self, report: &str, filters: &Filters);
}

#[derive(Clone)]
pub struct QuickActionDispatcher {
    navigator: Arc<dyn Navigator>,
    exporter: Arc<dyn Exporter>,
}

impl QuickActionDispatcher {
    pub fn new(navigator: Arc<dyn Navigator>, exporter: Arc<dyn Exporter>) -> Self {
        Self { navigator, exporter }
    }

    /// Returns the command that was dispatched, if any. Unknown ids and
    /// unknown verbs are silently skipped.
    pub fn execute(&self, actions: &[QuickAction], id: &str, filters: &Filters) -> Option<ActionCommand> {
        let Some(action) = actions.iter().find(|a| a.id == id) else {
            tracing::debug!("Ignoring unknown quick action {}", id);
            return None;
        };
        let Some(command) = action.command() else {
            tracing::debug!("Ignoring quick action {} with unsupported action {}", id, action.action);
            return None;
        };

        match &command {
            ActionCommand::Navigate(target) => self.navigator.navigate(target),
            ActionCommand::Export(report) => self.exporter.export(report, filters),
        }
        Some(command)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNavigator {
        pub targets: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.targets.lock().unwrap().push(target.to_string());
        }
    }

    #[derive(Default)]
    pub struct RecordingExporter {
        pub exports: Mutex<Vec<(String, Filters)>>,
    }

    impl Exporter for RecordingExporter {
        fn export(&self, report: &str, filters: &Filters) {
            self.exports.lock().unwrap().push((report.to_string(), filters.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{RecordingExporter, RecordingNavigator};
    use super::*;
    use crate::domain::quick_action::default_quick_actions;
    use chrono::NaiveDate;

    fn setup() -> (QuickActionDispatcher, Arc<RecordingNavigator>, Arc<RecordingExporter>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let exporter = Arc::new(RecordingExporter::default());
        let dispatcher = QuickActionDispatcher::new(navigator.clone(), exporter.clone());
        (dispatcher, navigator, exporter)
    }

    fn filters() -> Filters {
        Filters::trailing(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), 30)
    }

    #[test]
    fn test_navigate() {
        let (dispatcher, navigator, exporter) = setup();
        let command = dispatcher.execute(&default_quick_actions(), "new-reservation", &filters());

        assert_eq!(command, Some(ActionCommand::Navigate("/reservations/new".to_string())));
        assert_eq!(*navigator.targets.lock().unwrap(), vec!["/reservations/new".to_string()]);
        assert!(exporter.exports.lock().unwrap().is_empty());
    }

    #[test]
    fn test_export_receives_filters() {
        let (dispatcher, navigator, exporter) = setup();
        dispatcher.execute(&default_quick_actions(), "export-report", &filters());

        let exports = exporter.exports.lock().unwrap();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].0, "reservations");
        assert_eq!(exports[0].1, filters());
        assert!(navigator.targets.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_id_and_verb_are_noops() {
        let (dispatcher, navigator, exporter) = setup();
        let mut actions = default_quick_actions();
        actions.push(QuickAction::new("print", "Print", "printer", "print:daily", None));

        assert!(dispatcher.execute(&actions, "missing", &filters()).is_none());
        assert!(dispatcher.execute(&actions, "print", &filters()).is_none());
        assert!(navigator.targets.lock().unwrap().is_empty());
        assert!(exporter.exports.lock().unwrap().is_empty());
    }
}
