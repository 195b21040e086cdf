//! Repository port for transactional task persistence.

use crate::directory::domain::Actor;
use crate::task::domain::{
    Comment, Task, TaskChanges, TaskDomainError, TaskId, TaskLogEntry, TaskScope, UpdatePlan,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations must make [`apply_update`](Self::apply_update)
/// atomic: the row read feeding the update plan, the task write, and
/// the audit-entry writes happen in one transaction, so a failure
/// mid-way leaves neither a dangling audit entry nor an unaudited
/// task change.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Atomically plans and applies an update.
    ///
    /// Reads the current row inside the transaction, runs
    /// [`Task::plan_update`] against it, persists the updated task and
    /// the derived audit entries, and returns the plan (including the
    /// pre-update snapshot the caller derives events from).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist and [`TaskRepositoryError::Domain`] when validation
    /// rejects the change set; nothing is written in either case.
    async fn apply_update(
        &self,
        id: TaskId,
        changes: TaskChanges,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<UpdatePlan>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists the tasks falling inside a visibility scope.
    async fn list(&self, scope: TaskScope) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task together with its comments and audit entries.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Stores a comment on an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn insert_comment(&self, comment: &Comment) -> TaskRepositoryResult<()>;

    /// Returns a task's comments, oldest first.
    async fn comments_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<Comment>>;

    /// Returns a task's audit entries, oldest first.
    async fn logs_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<TaskLogEntry>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Domain validation rejected the mutation; nothing was written.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
