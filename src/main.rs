// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::{delete, get, post, put}, Router};
use tower_http::trace::TraceLayer;

use crate::application::api_service::ApiService;
use crate::application::notification_service::NotificationChannel;
use crate::application::view_controller::ConsoleController;
use crate::infrastructure::config::load_console_settings;
use crate::infrastructure::http_console_api::HttpConsoleApi;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    apply_filter, change_page_size, create_instance, delete_instance, delete_instance_config,
    get_view, health_check, next_page, notification_stream, previous_page, refresh_instances,
    reset_filter, save_config, start_instance, stop_instance, switch_business_tab,
    switch_config_tab, switch_section, toggle_instance,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let settings = load_console_settings()?;

    // Remote API client (infrastructure layer)
    let api = Arc::new(HttpConsoleApi::new(
        settings.api.base_url.clone(),
        settings.api.base_path.clone(),
    ));

    // Notification channel and controller (application layer)
    let notifications = NotificationChannel::new(settings.notifications.dismiss_after());
    let api_service = ApiService::new(api, notifications.clone());
    let controller = ConsoleController::new(api_service, notifications.clone(), &settings.pagination);
    controller.init().await;

    let state = Arc::new(AppState::new(controller, notifications));

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/ui/view", get(get_view))
        .route("/ui/sections/:section", post(switch_section))
        .route("/ui/business/tabs/:tab", post(switch_business_tab))
        .route("/ui/config/tabs/:tab", post(switch_config_tab))
        .route("/ui/pages/next", post(next_page))
        .route("/ui/pages/previous", post(previous_page))
        .route("/ui/pages/size", put(change_page_size))
        .route("/ui/filter", post(apply_filter).delete(reset_filter))
        .route("/ui/instances", post(create_instance))
        .route("/ui/instances/refresh", post(refresh_instances))
        .route("/ui/instances/:id/start", post(start_instance))
        .route("/ui/instances/:id/stop", post(stop_instance))
        .route("/ui/instances/:id/toggle", post(toggle_instance))
        .route("/ui/instances/:id", delete(delete_instance))
        .route("/ui/config", post(save_config))
        .route("/ui/config/instances/:id", delete(delete_instance_config))
        .route("/ui/notifications", get(notification_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = settings.server.bind.parse()?;
    tracing::info!(
        "Starting tsdb-console on {} (API {}{})",
        addr,
        settings.api.base_url,
        settings.api.base_path
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
