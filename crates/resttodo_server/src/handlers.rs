//! Request handlers for `/api/todos`.
//!
//! Handlers stay thin: decode input, run one service call through
//! `Storage`, encode the result.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use resttodo_core::{Todo, TodoId, TodoListQuery};
use serde::Serialize;

use crate::error::ApiError;
use crate::payload::{parse_json_object, CreateTodoBody, ListParams, UpdateTodoBody};
use crate::server::AppState;

/// Response body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: TodoId,
}

/// `GET /api/todos?done=&q=`
///
/// Query pairs are taken raw so repeated keys never reject the request.
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let params = ListParams::from_pairs(pairs);
    let query = TodoListQuery {
        done: params.done_filter(),
        search: params.q,
    };

    let todos = state
        .storage
        .with_service(move |service| service.list(&query))
        .await?;
    Ok(Json(todos))
}

/// `GET /api/todos/{id}`
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&raw_id)?;

    state
        .storage
        .with_service(move |service| service.get(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// `POST /api/todos`
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input = parse_json_object::<CreateTodoBody>(&body)?.into_new_todo()?;

    let todo = state
        .storage
        .with_service(move |service| service.create(&input))
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PUT /api/todos/{id}` and `PATCH /api/todos/{id}`
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&raw_id)?;
    let patch = parse_json_object::<UpdateTodoBody>(&body)?.into_patch()?;

    let todo = state
        .storage
        .with_service(move |service| service.update(id, &patch))
        .await?;
    Ok(Json(todo))
}

/// `DELETE /api/todos/{id}`
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_todo_id(&raw_id)?;

    state
        .storage
        .with_service(move |service| service.delete(id))
        .await?;
    Ok(Json(DeletedResponse { deleted: id }))
}

// Non-numeric ids cannot name a stored todo.
fn parse_todo_id(raw: &str) -> Result<TodoId, ApiError> {
    raw.parse::<TodoId>().map_err(|_| ApiError::NotFound)
}
