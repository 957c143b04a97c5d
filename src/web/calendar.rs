use super::error::ApiResult;
use super::AppState;
use crate::components::scheduler::{CalendarEvent, ScheduleRequest, TimeSlot};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Query string of the available-slots route
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: String,
    pub duration_minutes: Option<i64>,
}

pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<CalendarEvent>>> {
    Ok(Json(state.events.list_events().await?))
}

pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<CalendarEvent>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CalendarEvent>)> {
    let Json(event) = body?;
    let created = state.events.create_event(event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CalendarEvent>> {
    Ok(Json(state.events.get_event(id).await?))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CalendarEvent>, JsonRejection>,
) -> ApiResult<Json<CalendarEvent>> {
    let Json(event) = body?;
    Ok(Json(state.events.update_event(id, event).await?))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.events.delete_event(id).await?;
    Ok(Json(json!({ "success": true, "message": "Event deleted" })))
}

/// Free slots of the requested length within business hours on a date
pub async fn available_slots(
    State(state): State<AppState>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TimeSlot>>> {
    let Query(query) = query?;
    let duration = query.duration_minutes.unwrap_or(state.default_slot_minutes);
    debug!("Finding {} minute slots on {}", duration, query.date);

    let events = state.events.list_events().await?;
    let slots = state
        .scheduler
        .available_slots(&query.date, duration, &events)?;
    Ok(Json(slots))
}

/// The earliest few free slots, offered when a requested time is taken
pub async fn suggest_alternatives(
    State(state): State<AppState>,
    body: Result<Json<ScheduleRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TimeSlot>>> {
    let Json(request) = body?;

    let events = state.events.list_events().await?;
    let slots = state.scheduler.suggest_alternatives(
        &request.date,
        request.duration_minutes,
        &events,
    )?;
    Ok(Json(slots))
}
