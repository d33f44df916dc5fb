// Presentation layer - JSON view snapshots and actions over HTTP
pub mod app_state;
pub mod handlers;
