// Application state for HTTP handlers
use crate::application::notification_service::NotificationChannel;
use crate::application::view_controller::ConsoleController;
use std::sync::Arc;

/// Shared by every request. Actions on the controller may overlap.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConsoleController>,
    pub notifications: NotificationChannel,
}

impl AppState {
    pub fn new(controller: ConsoleController, notifications: NotificationChannel) -> Self {
        Self {
            controller: Arc::new(controller),
            notifications,
        }
    }
}
