// Task domain model and persistence seam

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const MAX_TITLE_LENGTH: usize = 255;

// ============================================================================
// Status / Priority
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(AppError::ValidationError(format!("invalid status: {}", other))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(AppError::ValidationError(format!(
                "invalid priority: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Task
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Tag names, sorted
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new task
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub content: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Full replacement of a task's editable fields
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChanges {
    pub title: String,
    pub content: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskChanges {
    /// Start from the task's current values
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            content: task.content.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
        }
    }
}

/// Per-owner task counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
    pub blocked: i64,
    pub total: i64,
}

impl TaskStats {
    pub fn add(&mut self, status: TaskStatus, count: i64) {
        match status {
            TaskStatus::Todo => self.todo += count,
            TaskStatus::InProgress => self.in_progress += count,
            TaskStatus::Done => self.done += count,
            TaskStatus::Blocked => self.blocked += count,
        }
        self.total += count;
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Task storage. Every call is scoped to `owner`; tasks owned by someone
/// else are reported as [`AppError::TaskNotFound`].
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, owner: Uuid, task: NewTask) -> Result<Task>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task>;

    async fn list(&self, owner: Uuid) -> Result<Vec<Task>>;

    async fn update(&self, owner: Uuid, id: Uuid, changes: TaskChanges) -> Result<Task>;

    /// Soft delete
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()>;

    async fn find_by_status(&self, owner: Uuid, status: TaskStatus) -> Result<Vec<Task>>;

    async fn find_by_priority(&self, owner: Uuid, priority: TaskPriority) -> Result<Vec<Task>>;

    async fn find_by_tag(&self, owner: Uuid, tag: &str) -> Result<Vec<Task>>;

    /// Case-insensitive substring match on title or content
    async fn search(&self, owner: Uuid, query: &str) -> Result<Vec<Task>>;

    /// Tasks due within the current UTC day
    async fn due_today(&self, owner: Uuid) -> Result<Vec<Task>>;

    /// Tasks past their due date that are not done
    async fn overdue(&self, owner: Uuid) -> Result<Vec<Task>>;

    /// Create the tag if needed and link it; linking twice is a no-op
    async fn add_tag(&self, owner: Uuid, id: Uuid, tag: &str) -> Result<Task>;

    async fn remove_tag(&self, owner: Uuid, id: Uuid, tag: &str) -> Result<Task>;

    /// Returns the number of tasks deleted
    async fn bulk_delete(&self, owner: Uuid, ids: &[Uuid]) -> Result<u64>;

    /// Returns the number of tasks updated
    async fn bulk_update_status(&self, owner: Uuid, ids: &[Uuid], status: TaskStatus)
        -> Result<u64>;

    async fn set_archived(&self, owner: Uuid, id: Uuid, archived: bool) -> Result<Task>;

    async fn stats(&self, owner: Uuid) -> Result<TaskStats>;
}
