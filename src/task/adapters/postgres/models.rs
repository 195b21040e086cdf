//! Diesel row models for task persistence.

use super::schema::{comments, task_logs, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Current assignee.
    pub assigned_to: uuid::Uuid,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Status value.
    pub status: String,
    /// Priority value.
    pub priority: String,
    /// Derived completion flag.
    pub completed: bool,
    /// Optional category reference.
    pub category_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Current assignee.
    pub assigned_to: uuid::Uuid,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Status value.
    pub status: String,
    /// Priority value.
    pub priority: String,
    /// Derived completion flag.
    pub completed: bool,
    /// Optional category reference.
    pub category_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Changeset overwriting every mutable task column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRowChanges {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Current assignee.
    pub assigned_to: uuid::Uuid,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Status value.
    pub status: String,
    /// Priority value.
    pub priority: String,
    /// Derived completion flag.
    pub completed: bool,
    /// Optional category reference; `None` clears the column.
    pub category_id: Option<uuid::Uuid>,
}

/// Query result row for audit entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskLogRow {
    /// Log entry identifier.
    pub id: uuid::Uuid,
    /// Task the entry belongs to.
    pub task_id: uuid::Uuid,
    /// Which tracked field changed.
    pub change_type: String,
    /// Value before the change.
    pub old_value: String,
    /// Value after the change.
    pub new_value: String,
    /// Acting user, if still present.
    pub acting_user: Option<uuid::Uuid>,
    /// Entry creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for audit entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_logs)]
pub struct NewTaskLogRow {
    /// Log entry identifier.
    pub id: uuid::Uuid,
    /// Task the entry belongs to.
    pub task_id: uuid::Uuid,
    /// Which tracked field changed.
    pub change_type: String,
    /// Value before the change.
    pub old_value: String,
    /// Value after the change.
    pub new_value: String,
    /// Acting user.
    pub acting_user: Option<uuid::Uuid>,
    /// Entry creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Task the comment belongs to.
    pub task_id: uuid::Uuid,
    /// Comment author.
    pub author_id: uuid::Uuid,
    /// Comment body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for comments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Task the comment belongs to.
    pub task_id: uuid::Uuid,
    /// Comment author.
    pub author_id: uuid::Uuid,
    /// Comment body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
