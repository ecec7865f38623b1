// Application layer - Dashboard state engine and its collaborator seams
pub mod dashboard_engine;
pub mod engine_actor;
pub mod filter_manager;
pub mod metrics_store;
pub mod persistence;
pub mod quick_actions;
pub mod scheduler;
pub mod snapshot_storage;
pub mod update_buffer;
pub mod update_classifier;
pub mod widget_registry;
