// Application layer - Use cases over the console API
pub mod api_service;
pub mod console_api;
#[cfg(test)]
pub mod fake_api;
pub mod notification_service;
pub mod view_controller;
