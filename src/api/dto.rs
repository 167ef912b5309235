// Request and response bodies

use crate::domain::{service::TaskInput, Task, TaskPriority, TaskStatus};
use crate::errors::{AppError, Result};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Turn a body rejection into our `{"error": ...}` shape
pub fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::ValidationError("invalid input".to_string())
    })
}

/// Task ids come from the path as text; anything unparseable cannot exist
pub fn parse_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::TaskNotFound)
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// RFC 3339
    pub due_date: Option<DateTime<Utc>>,
}

impl From<TaskRequest> for TaskInput {
    fn from(req: TaskRequest) -> Self {
        TaskInput {
            title: req.title,
            content: req.content,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PriorityRequest {
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            content: task.content,
            status: task.status,
            priority: task.priority,
            tags: task.tags,
            due_date: task.due_date,
            archived: task.archived,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

pub fn task_list(tasks: Vec<Task>) -> Vec<TaskResponse> {
    tasks.into_iter().map(TaskResponse::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(tags: Vec<String>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Model Title".to_string(),
            content: "Content".to_string(),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            tags,
            due_date: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_response_omits_empty_optionals() {
        let value = serde_json::to_value(TaskResponse::from(task(Vec::new()))).unwrap();
        assert!(value.get("tags").is_none());
        assert!(value.get("due_date").is_none());
        assert!(value.get("owner_id").is_none());
        assert_eq!(value["priority"], "high");
        assert_eq!(value["archived"], false);
    }

    #[test]
    fn test_response_carries_tags() {
        let tags = vec!["backend".to_string(), "go".to_string()];
        let value = serde_json::to_value(TaskResponse::from(task(tags))).unwrap();
        assert_eq!(value["tags"], json!(["backend", "go"]));
    }

    #[test]
    fn test_task_request_accepts_partial_body() {
        let req: TaskRequest = serde_json::from_value(json!({
            "title": "Test Title",
            "due_date": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.title, "Test Title");
        assert!(req.content.is_empty());
        assert!(req.status.is_none());
        assert!(req.due_date.is_some());
    }

    #[test]
    fn test_unparseable_id_is_not_found() {
        assert!(matches!(parse_task_id("42"), Err(AppError::TaskNotFound)));
        assert!(parse_task_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
