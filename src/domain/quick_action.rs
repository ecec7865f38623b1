// Quick action domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub label: String,
    pub icon: String,
    /// Declarative action of the form `<verb>:<argument>`.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// What a quick action resolves to once its verb is recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCommand {
    Navigate(String),
    Export(String),
}

impl QuickAction {
    pub fn new(id: &str, label: &str, icon: &str, action: &str, color: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
            action: action.to_string(),
            color: color.map(str::to_string),
        }
    }

    /// Returns `None` for unknown verbs so newer actions stay harmless on
    /// older builds.
    pub fn command(&self) -> Option<ActionCommand> {
        let (verb, argument) = self.action.split_once(':')?;
        match verb {
            "navigate" => Some(ActionCommand::Navigate(argument.to_string())),
            "export" => Some(ActionCommand::Export(argument.to_string())),
            _ => None,
        }
    }
}

pub fn default_quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction::new("new-reservation", "New Reservation", "calendar-plus", "navigate:/reservations/new", Some("blue")),
        QuickAction::new("schedule-class", "Schedule Class", "users", "navigate:/classes/new", Some("green")),
        QuickAction::new("add-member", "Add Member", "user-plus", "navigate:/members/new", Some("purple")),
        QuickAction::new("export-report", "Export Report", "download", "export:reservations", None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("navigate:/reservations/new", Some(ActionCommand::Navigate("/reservations/new".into())) ; "navigate")]
    #[test_case("export:revenue", Some(ActionCommand::Export("revenue".into())) ; "export")]
    #[test_case("export:", Some(ActionCommand::Export(String::new())) ; "export with empty argument")]
    #[test_case("navigate:/a:b", Some(ActionCommand::Navigate("/a:b".into())) ; "argument keeps later colons")]
    #[test_case("print:invoice", None ; "unknown verb")]
    #[test_case("navigate", None ; "missing separator")]
    fn test_command(action: &str, expected: Option<ActionCommand>) {
        let qa = QuickAction::new("qa", "QA", "icon", action, None);
        assert_eq!(qa.command(), expected);
    }

    #[test]
    fn test_default_actions_are_dispatchable() {
        for action in default_quick_actions() {
            assert!(action.command().is_some(), "{} has no command", action.id);
        }
    }
}
