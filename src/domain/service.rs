// Task business rules on top of a TaskRepository

use crate::domain::task::{
    NewTask, Task, TaskChanges, TaskPriority, TaskRepository, TaskStats, TaskStatus,
    MAX_TITLE_LENGTH,
};
use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Unvalidated task fields as received from a client
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub content: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

fn validate_text(title: &str, content: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::ValidationError("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::ValidationError(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    if content.trim().is_empty() {
        return Err(AppError::ValidationError("content is required".to_string()));
    }
    Ok(())
}

/// Blank values count as absent
fn parse_optional<T: std::str::FromStr<Err = AppError>>(value: Option<&str>) -> Result<Option<T>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

fn parse_required<T: std::str::FromStr<Err = AppError>>(value: &str, field: &str) -> Result<T> {
    parse_optional(Some(value))?
        .ok_or_else(|| AppError::ValidationError(format!("{} is required", field)))
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, owner: Uuid, input: TaskInput) -> Result<Task> {
        validate_text(&input.title, &input.content)?;

        let task = NewTask {
            status: parse_optional(input.status.as_deref())?.unwrap_or_default(),
            priority: parse_optional(input.priority.as_deref())?.unwrap_or_default(),
            title: input.title,
            content: input.content,
            due_date: input.due_date,
        };

        let task = self.repository.create(owner, task).await?;
        tracing::info!(task_id = %task.id, owner_id = %owner, "Task created");
        Ok(task)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.repository.get(owner, id).await
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Task>> {
        self.repository.list(owner).await
    }

    /// Title and content are replaced, status and priority only when given,
    /// and the due date always (absent clears it).
    pub async fn update(&self, owner: Uuid, id: Uuid, input: TaskInput) -> Result<Task> {
        validate_text(&input.title, &input.content)?;
        let status = parse_optional::<TaskStatus>(input.status.as_deref())?;
        let priority = parse_optional::<TaskPriority>(input.priority.as_deref())?;

        let current = self.repository.get(owner, id).await?;
        let mut changes = TaskChanges::from_task(&current);
        changes.title = input.title;
        changes.content = input.content;
        changes.due_date = input.due_date;
        if let Some(status) = status {
            changes.status = status;
        }
        if let Some(priority) = priority {
            changes.priority = priority;
        }

        self.repository.update(owner, id, changes).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        self.repository.delete(owner, id).await?;
        tracing::info!(task_id = %id, owner_id = %owner, "Task deleted");
        Ok(())
    }

    pub async fn change_status(&self, owner: Uuid, id: Uuid, status: &str) -> Result<Task> {
        let status = parse_required::<TaskStatus>(status, "status")?;
        let current = self.repository.get(owner, id).await?;
        let mut changes = TaskChanges::from_task(&current);
        changes.status = status;
        self.repository.update(owner, id, changes).await
    }

    pub async fn change_priority(&self, owner: Uuid, id: Uuid, priority: &str) -> Result<Task> {
        let priority = parse_required::<TaskPriority>(priority, "priority")?;
        let current = self.repository.get(owner, id).await?;
        let mut changes = TaskChanges::from_task(&current);
        changes.priority = priority;
        self.repository.update(owner, id, changes).await
    }

    pub async fn find_by_status(&self, owner: Uuid, status: &str) -> Result<Vec<Task>> {
        let status = parse_required(status, "status")?;
        self.repository.find_by_status(owner, status).await
    }

    pub async fn find_by_priority(&self, owner: Uuid, priority: &str) -> Result<Vec<Task>> {
        let priority = parse_required(priority, "priority")?;
        self.repository.find_by_priority(owner, priority).await
    }

    pub async fn find_by_tag(&self, owner: Uuid, tag: &str) -> Result<Vec<Task>> {
        self.repository.find_by_tag(owner, tag.trim()).await
    }

    pub async fn search(&self, owner: Uuid, query: &str) -> Result<Vec<Task>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.search(owner, query).await
    }

    pub async fn due_today(&self, owner: Uuid) -> Result<Vec<Task>> {
        self.repository.due_today(owner).await
    }

    pub async fn overdue(&self, owner: Uuid) -> Result<Vec<Task>> {
        self.repository.overdue(owner).await
    }

    pub async fn archive(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.repository.set_archived(owner, id, true).await
    }

    pub async fn unarchive(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.repository.set_archived(owner, id, false).await
    }

    pub async fn add_tag(&self, owner: Uuid, id: Uuid, tag: &str) -> Result<Task> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(AppError::ValidationError("tag is required".to_string()));
        }
        self.repository.add_tag(owner, id, tag).await
    }

    pub async fn remove_tag(&self, owner: Uuid, id: Uuid, tag: &str) -> Result<Task> {
        self.repository.remove_tag(owner, id, tag.trim()).await
    }

    pub async fn bulk_delete(&self, owner: Uuid, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let deleted = self.repository.bulk_delete(owner, ids).await?;
        tracing::info!(owner_id = %owner, requested = ids.len(), deleted, "Bulk delete");
        Ok(deleted)
    }

    pub async fn bulk_update_status(&self, owner: Uuid, ids: &[Uuid], status: &str) -> Result<u64> {
        let status = parse_required(status, "status")?;
        if ids.is_empty() {
            return Ok(0);
        }
        self.repository.bulk_update_status(owner, ids, status).await
    }

    pub async fn stats(&self, owner: Uuid) -> Result<TaskStats> {
        self.repository.stats(owner).await
    }
}
