use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::components::tasks::{NewTask, Task, TaskQuery, TaskUpdate};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// Handler for listing tasks with optional filters and sorting
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    Ok(Json(state.tasks.list(&query).await))
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(new_task) = body?;
    let task = state.tasks.create(new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;
    Ok(Json(state.tasks.get(id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TaskUpdate>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;
    let Json(update) = body?;
    Ok(Json(state.tasks.update(id, update).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_task_id(&id)?;
    state.tasks.delete(id).await?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

fn parse_task_id(raw: &str) -> ApiResult<u64> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid task ID"))
}
