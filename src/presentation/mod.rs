// Presentation layer - HTTP surface over the engine handle
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod routes;
