// Task endpoints, mounted under /api/v1/tasks behind the admission pipeline

use crate::api::dto::{
    json_body, parse_task_id, task_list, BulkDeleteRequest, BulkStatusRequest, PriorityRequest,
    SearchQuery, StatusRequest, TagRequest, TaskRequest, TaskResponse,
};
use crate::api::routes::AppState;
use crate::auth::AuthenticatedUser;
use crate::domain::TaskStats;
use crate::errors::Result;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

type JsonPayload<T> = std::result::Result<Json<T>, JsonRejection>;

/// POST /
pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: JsonPayload<TaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let req = json_body(payload)?;
    let task = state.tasks.create(user.owner_id()?, req.into()).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /
pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.list(user.owner_id()?).await?;
    Ok(Json(task_list(tasks)))
}

/// GET /:id
pub async fn get(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>> {
    let task = state.tasks.get(user.owner_id()?, parse_task_id(&id)?).await?;
    Ok(Json(task.into()))
}

/// PUT /:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: JsonPayload<TaskRequest>,
) -> Result<Json<TaskResponse>> {
    let req = json_body(payload)?;
    let task = state
        .tasks
        .update(user.owner_id()?, parse_task_id(&id)?, req.into())
        .await?;
    Ok(Json(task.into()))
}

/// DELETE /:id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.tasks.delete(user.owner_id()?, parse_task_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /:id/status
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: JsonPayload<StatusRequest>,
) -> Result<Json<TaskResponse>> {
    let req = json_body(payload)?;
    let task = state
        .tasks
        .change_status(user.owner_id()?, parse_task_id(&id)?, &req.status)
        .await?;
    Ok(Json(task.into()))
}

/// PATCH /:id/priority
pub async fn change_priority(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: JsonPayload<PriorityRequest>,
) -> Result<Json<TaskResponse>> {
    let req = json_body(payload)?;
    let task = state
        .tasks
        .change_priority(user.owner_id()?, parse_task_id(&id)?, &req.priority)
        .await?;
    Ok(Json(task.into()))
}

/// PATCH /:id/archive
pub async fn archive(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>> {
    let task = state.tasks.archive(user.owner_id()?, parse_task_id(&id)?).await?;
    Ok(Json(task.into()))
}

/// PATCH /:id/unarchive
pub async fn unarchive(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>> {
    let task = state.tasks.unarchive(user.owner_id()?, parse_task_id(&id)?).await?;
    Ok(Json(task.into()))
}

/// GET /status/:status
pub async fn by_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(status): Path<String>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.find_by_status(user.owner_id()?, &status).await?;
    Ok(Json(task_list(tasks)))
}

/// GET /priority/:priority
pub async fn by_priority(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(priority): Path<String>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.find_by_priority(user.owner_id()?, &priority).await?;
    Ok(Json(task_list(tasks)))
}

/// GET /tag/:tag
pub async fn by_tag(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(tag): Path<String>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.find_by_tag(user.owner_id()?, &tag).await?;
    Ok(Json(task_list(tasks)))
}

/// GET /search?q=
pub async fn search(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Option<Query<SearchQuery>>,
) -> Result<Json<Vec<TaskResponse>>> {
    let q = query.map(|Query(query)| query.q).unwrap_or_default();
    let tasks = state.tasks.search(user.owner_id()?, &q).await?;
    Ok(Json(task_list(tasks)))
}

/// GET /today
pub async fn today(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.due_today(user.owner_id()?).await?;
    Ok(Json(task_list(tasks)))
}

/// GET /overdue
pub async fn overdue(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.overdue(user.owner_id()?).await?;
    Ok(Json(task_list(tasks)))
}

/// POST /:id/tags
pub async fn add_tag(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: JsonPayload<TagRequest>,
) -> Result<Json<TaskResponse>> {
    let req = json_body(payload)?;
    let task = state
        .tasks
        .add_tag(user.owner_id()?, parse_task_id(&id)?, &req.tag)
        .await?;
    Ok(Json(task.into()))
}

/// DELETE /:id/tags/:tag
pub async fn remove_tag(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, tag)): Path<(String, String)>,
) -> Result<Json<TaskResponse>> {
    let task = state
        .tasks
        .remove_tag(user.owner_id()?, parse_task_id(&id)?, &tag)
        .await?;
    Ok(Json(task.into()))
}

/// POST /bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: JsonPayload<BulkDeleteRequest>,
) -> Result<StatusCode> {
    let req = json_body(payload)?;
    state.tasks.bulk_delete(user.owner_id()?, &req.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /bulk-status
pub async fn bulk_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: JsonPayload<BulkStatusRequest>,
) -> Result<StatusCode> {
    let req = json_body(payload)?;
    state
        .tasks
        .bulk_update_status(user.owner_id()?, &req.ids, &req.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TaskStats>> {
    Ok(Json(state.tasks.stats(user.owner_id()?).await?))
}
