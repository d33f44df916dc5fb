// HTTP request handlers
use crate::application::view_controller::ConsoleController;
use crate::domain::view::ConsoleView;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PageSizeRequest {
    pub page_size: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(rename = "type", default)]
    pub tag_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInstanceRequest {
    pub instance_id: String,
    pub business_type: String,
}

#[derive(Debug, Deserialize)]
pub struct FormEntry {
    pub name: String,
    pub value: String,
}

/// A submitted config form: its scope key and fields in document order.
#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    pub key: String,
    pub fields: Vec<FormEntry>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Runs one controller action and answers with the view it left behind.
async fn act<'a, F, Fut>(state: &'a AppState, action: F) -> Json<ConsoleView>
where
    F: FnOnce(&'a ConsoleController) -> Fut,
    Fut: Future<Output = ()>,
{
    action(state.controller.as_ref()).await;
    Json(state.controller.snapshot())
}

pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<ConsoleView> {
    Json(state.controller.snapshot())
}

pub async fn switch_section(
    Path(section): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.switch_section(&section)).await
}

pub async fn switch_business_tab(
    Path(tab): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.switch_business_tab(&tab)).await
}

pub async fn switch_config_tab(
    Path(tab): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    state.controller.switch_config_tab(&tab);
    Json(state.controller.snapshot())
}

pub async fn next_page(State(state): State<Arc<AppState>>) -> Json<ConsoleView> {
    act(&state, |controller| controller.next_page()).await
}

pub async fn previous_page(State(state): State<Arc<AppState>>) -> Json<ConsoleView> {
    act(&state, |controller| controller.previous_page()).await
}

pub async fn change_page_size(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PageSizeRequest>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.change_page_size(request.page_size)).await
}

pub async fn apply_filter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FilterRequest>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.apply_filter(request.search, request.tag_type)).await
}

pub async fn reset_filter(State(state): State<Arc<AppState>>) -> Json<ConsoleView> {
    act(&state, |controller| controller.reset_filter()).await
}

pub async fn create_instance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateInstanceRequest>,
) -> Json<ConsoleView> {
    act(&state, |controller| {
        controller.create_instance(&request.instance_id, &request.business_type)
    })
    .await
}

pub async fn refresh_instances(State(state): State<Arc<AppState>>) -> Json<ConsoleView> {
    act(&state, |controller| controller.refresh_instances()).await
}

pub async fn start_instance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.start_instance(&id)).await
}

pub async fn stop_instance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.stop_instance(&id)).await
}

pub async fn toggle_instance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.toggle_instance(&id)).await
}

pub async fn delete_instance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.delete_instance(&id)).await
}

pub async fn save_config(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveConfigRequest>,
) -> Json<ConsoleView> {
    let entries = request
        .fields
        .into_iter()
        .map(|entry| (entry.name, entry.value))
        .collect();

    act(&state, |controller| controller.save_config(&request.key, entries)).await
}

pub async fn delete_instance_config(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ConsoleView> {
    act(&state, |controller| controller.delete_instance_config(&id)).await
}

/// Streams the visible notification: a `notification` event whenever one is shown
/// and a `dismissed` event when it goes away.
pub async fn notification_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.notifications.subscribe();

    let stream = async_stream::stream! {
        loop {
            let current = rx.borrow_and_update().clone();
            let event = match current {
                Some(notification) => Event::default().event("notification").json_data(&notification),
                None => Ok(Event::default().event("dismissed").data("")),
            };
            match event {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::warn!("Could not encode notification event: {}", e),
            }

            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
