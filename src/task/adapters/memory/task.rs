//! In-memory task repository for tests and embedders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::Actor;
use crate::task::domain::{
    Comment, Task, TaskChanges, TaskId, TaskLogEntry, TaskScope, UpdatePlan,
};
use crate::task::ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};

/// Thread-safe in-memory task repository.
///
/// Tasks, comments, and audit entries live under one lock, so
/// [`apply_update`](TaskRepository::apply_update) is atomic the same
/// way the database adapter's transaction is.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<TaskId, Vec<Comment>>,
    logs: HashMap<TaskId, Vec<TaskLogEntry>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn apply_update(
        &self,
        id: TaskId,
        changes: TaskChanges,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<UpdatePlan> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let current = state
            .tasks
            .get(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let plan = current.plan_update(&changes, &actor, now)?;

        state
            .logs
            .entry(id)
            .or_default()
            .extend(plan.log_entries().iter().cloned());
        state.tasks.insert(id, plan.task().clone());
        Ok(plan)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, scope: TaskScope) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| scope.includes(task))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| std::cmp::Reverse(task.created_at()));
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        // Cascade: the task owns its comments and audit entries.
        state.comments.remove(&id);
        state.logs.remove(&id);
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.tasks.contains_key(&comment.task_id()) {
            return Err(TaskRepositoryError::NotFound(comment.task_id()));
        }
        state
            .comments
            .entry(comment.task_id())
            .or_default()
            .push(comment.clone());
        Ok(())
    }

    async fn comments_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<Comment>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.comments.get(&task).cloned().unwrap_or_default())
    }

    async fn logs_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<TaskLogEntry>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.logs.get(&task).cloned().unwrap_or_default())
    }
}
