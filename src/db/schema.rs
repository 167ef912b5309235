// Row types mapped from query results

use crate::domain::{Task, User};
use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================================================
// Task
// ============================================================================

/// Column list shared by every task query; `tags` is aggregated from the join table
pub const TASK_COLUMNS: &str = r#"
    t.id, t.owner_id, t.title, t.content, t.status, t.priority,
    t.due_date, t.archived, t.created_at, t.updated_at,
    ARRAY(
        SELECT tg.name
        FROM task_tags tt
        JOIN tags tg ON tg.id = tt.tag_id
        WHERE tt.task_id = t.id
        ORDER BY tg.name
    ) AS tags
"#;

#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self> {
        // The CHECK constraints keep these parseable; anything else is corruption
        let status = row
            .status
            .parse()
            .map_err(|_| AppError::Internal(format!("unknown status in row {}", row.id)))?;
        let priority = row
            .priority
            .parse()
            .map_err(|_| AppError::Internal(format!("unknown priority in row {}", row.id)))?;

        Ok(Task {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            content: row.content,
            status,
            priority,
            tags: row.tags,
            due_date: row.due_date,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StatusCountRow {
    pub status: String,
    pub count: i64,
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}
