// Domain layer - Dashboard entities and value types
pub mod filters;
pub mod metrics;
pub mod quick_action;
pub mod update;
pub mod widget;
