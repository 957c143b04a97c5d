//! HTTP surface: task CRUD, calendar events and scheduling queries.

pub mod calendar;
pub mod error;
pub mod tasks;

use crate::components::scheduler::Scheduler;
use crate::components::{EventStoreHandle, TaskStore};
use crate::config::Config;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Largest request body accepted
pub const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    /// Calendar events, serialized through the store actor
    pub events: EventStoreHandle,
    /// Task list
    pub tasks: Arc<TaskStore>,
    /// Business hours and timestamp policy for slot queries
    pub scheduler: Scheduler,
    /// Slot length used when a query does not name one
    pub default_slot_minutes: i64,
}

impl AppState {
    pub fn new(
        events: EventStoreHandle,
        tasks: Arc<TaskStore>,
        scheduler: Scheduler,
        config: &Config,
    ) -> Self {
        Self {
            events,
            tasks,
            scheduler,
            default_slot_minutes: config.default_slot_minutes,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let calendar_routes = Router::new()
        .route(
            "/events",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route(
            "/events/{id}",
            get(calendar::get_event)
                .put(calendar::update_event)
                .delete(calendar::delete_event),
        )
        .route("/available-slots", get(calendar::available_slots))
        .route(
            "/suggest-alternatives",
            post(calendar::suggest_alternatives),
        );

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/hello", get(hello_handler))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .nest("/routes/calendar", calendar_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for the index route
async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Tempo Task API",
        "tagline": "Master Tasks with AI",
    }))
}

async fn hello_handler() -> Json<Value> {
    Json(json!({ "message": "Hello from Tempo Task!" }))
}

/// Health check handler
async fn health_handler() -> &'static str {
    "OK"
}
