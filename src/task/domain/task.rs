//! Task aggregate root, mutation requests, and update planning.

use super::{
    CategoryId, PriorityValue, StatusValue, TaskDomainError, TaskId, TaskLogEntry, TrackedField,
};
use crate::directory::domain::{Actor, TeamId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// `completed` is derived: it is `true` exactly when `status` is the
/// reserved completion value. Callers never set it directly; creation
/// and update planning coerce it on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    assigned_to: UserId,
    team: TeamId,
    due_date: DateTime<Utc>,
    status: StatusValue,
    priority: PriorityValue,
    completed: bool,
    category: Option<CategoryId>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee.
    pub assigned_to: UserId,
    /// Persisted owning team.
    pub team: TeamId,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted status value.
    pub status: StatusValue,
    /// Persisted priority value.
    pub priority: PriorityValue,
    /// Persisted derived completion flag.
    pub completed: bool,
    /// Persisted category reference, if any.
    pub category: Option<CategoryId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    assigned_to: UserId,
    team: TeamId,
    due_date: DateTime<Utc>,
    status: Option<StatusValue>,
    priority: Option<PriorityValue>,
    category: Option<CategoryId>,
}

impl TaskDraft {
    /// Creates a draft with required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        assigned_to: UserId,
        team: TeamId,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assigned_to,
            team,
            due_date,
            status: None,
            priority: None,
            category: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status instead of the default `todo`.
    #[must_use]
    pub fn with_status(mut self, status: StatusValue) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority instead of the default `medium`.
    #[must_use]
    pub fn with_priority(mut self, priority: PriorityValue) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the optional category reference.
    #[must_use]
    pub const fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }
}

/// Incoming change set for a task update.
///
/// Absent fields leave the stored value untouched. `category` is
/// two-level so an update can distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    title: Option<String>,
    description: Option<String>,
    status: Option<StatusValue>,
    priority: Option<PriorityValue>,
    assigned_to: Option<UserId>,
    team: Option<TeamId>,
    due_date: Option<DateTime<Utc>>,
    category: Option<Option<CategoryId>>,
}

impl TaskChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the change set carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new status.
    #[must_use]
    pub fn with_status(mut self, status: StatusValue) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub fn with_priority(mut self, priority: PriorityValue) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Reassigns the task.
    #[must_use]
    pub const fn with_assigned_to(mut self, assigned_to: UserId) -> Self {
        self.assigned_to = Some(assigned_to);
        self
    }

    /// Moves the task to another team.
    #[must_use]
    pub const fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the category reference.
    #[must_use]
    pub const fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(Some(category));
        self
    }

    /// Clears the category reference.
    #[must_use]
    pub const fn without_category(mut self) -> Self {
        self.category = Some(None);
        self
    }
}

/// Pre-update snapshot of the fields whose deltas drive notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    assigned_to: UserId,
    status: StatusValue,
}

impl TaskSnapshot {
    /// Returns the assignee before the update.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the status before the update.
    #[must_use]
    pub const fn status(&self) -> &StatusValue {
        &self.status
    }
}

/// Planned outcome of a task update: the new aggregate state, the
/// pre-update snapshot, and the audit entries the change produced.
///
/// The plan is computed inside the repository's transaction so the
/// snapshot, the audit entries, and the task write are consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    task: Task,
    previous: TaskSnapshot,
    log_entries: Vec<TaskLogEntry>,
}

impl UpdatePlan {
    /// Returns the task state after the update.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the pre-update snapshot.
    #[must_use]
    pub const fn previous(&self) -> &TaskSnapshot {
        &self.previous
    }

    /// Returns the audit entries derived from the change set.
    #[must_use]
    pub fn log_entries(&self) -> &[TaskLogEntry] {
        &self.log_entries
    }

    /// Consumes the plan, returning the updated task.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }
}

impl Task {
    /// Creates a new task from a draft.
    ///
    /// The `completed` flag is coerced from the status and the
    /// creation timestamp is stamped once from the clock. No audit
    /// entries are produced: the audit log records changes, not
    /// genesis.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank
    /// and [`TaskDomainError::CompletionNotPermitted`] when a
    /// non-privileged actor drafts the task directly into the
    /// completion status.
    pub fn create(draft: TaskDraft, actor: &Actor, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = normalized_title(&draft.title)?;
        let status = draft.status.unwrap_or_default();
        if status.is_done() && !actor.may_complete_tasks() {
            return Err(TaskDomainError::CompletionNotPermitted { actor: actor.id() });
        }

        let completed = status.is_done();
        Ok(Self {
            id: TaskId::new(),
            title,
            description: draft.description,
            assigned_to: draft.assigned_to,
            team: draft.team,
            due_date: draft.due_date,
            status,
            priority: draft.priority.unwrap_or_default(),
            completed,
            category: draft.category,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assigned_to: data.assigned_to,
            team: data.team,
            due_date: data.due_date,
            status: data.status,
            priority: data.priority,
            completed: data.completed,
            category: data.category,
            created_at: data.created_at,
        }
    }

    /// Plans an update against the current stored state.
    ///
    /// Produces the post-update aggregate, the pre-update snapshot of
    /// `assigned_to`/`status`, and one audit entry per tracked field
    /// whose value actually changed (value equality; untouched and
    /// unchanged fields produce none). The `completed` flag is
    /// re-coerced from the resulting status. The update timestamp is
    /// supplied by the caller because planning runs inside the
    /// repository's transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletionNotPermitted`] when a
    /// non-privileged actor transitions the status to the completion
    /// value, and [`TaskDomainError::EmptyTitle`] on a blank title.
    /// Either way the whole update is rejected: no field applies and
    /// no audit entry is produced.
    pub fn plan_update(
        &self,
        changes: &TaskChanges,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<UpdatePlan, TaskDomainError> {
        if let Some(status) = &changes.status
            && status.is_done()
            && !status.eq(&self.status)
            && !actor.may_complete_tasks()
        {
            return Err(TaskDomainError::CompletionNotPermitted { actor: actor.id() });
        }

        let previous = TaskSnapshot {
            assigned_to: self.assigned_to,
            status: self.status.clone(),
        };

        let mut updated = self.clone();
        let mut log_entries = Vec::new();

        if let Some(title) = &changes.title {
            let normalized = normalized_title(title)?;
            if normalized != updated.title {
                log_entries.push(TaskLogEntry::record(
                    self.id,
                    TrackedField::Title,
                    updated.title.clone(),
                    normalized.clone(),
                    actor.id(),
                    now,
                ));
                updated.title = normalized;
            }
        }

        if let Some(description) = &changes.description
            && description != &updated.description
        {
            log_entries.push(TaskLogEntry::record(
                self.id,
                TrackedField::Description,
                updated.description.clone(),
                description.clone(),
                actor.id(),
                now,
            ));
            updated.description.clone_from(description);
        }

        if let Some(status) = &changes.status
            && status != &updated.status
        {
            log_entries.push(TaskLogEntry::record(
                self.id,
                TrackedField::Status,
                updated.status.as_str().to_owned(),
                status.as_str().to_owned(),
                actor.id(),
                now,
            ));
            updated.status = status.clone();
        }

        if let Some(priority) = &changes.priority {
            updated.priority = priority.clone();
        }
        if let Some(assigned_to) = changes.assigned_to {
            updated.assigned_to = assigned_to;
        }
        if let Some(team) = changes.team {
            updated.team = team;
        }
        if let Some(due_date) = changes.due_date {
            updated.due_date = due_date;
        }
        if let Some(category) = changes.category {
            updated.category = category;
        }

        updated.completed = updated.status.is_done();

        Ok(UpdatePlan {
            task: updated,
            previous,
            log_entries,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the status value.
    #[must_use]
    pub const fn status(&self) -> &StatusValue {
        &self.status
    }

    /// Returns the priority value.
    #[must_use]
    pub const fn priority(&self) -> &PriorityValue {
        &self.priority
    }

    /// Returns the derived completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the category reference, if any.
    #[must_use]
    pub const fn category(&self) -> Option<CategoryId> {
        self.category
    }

    /// Returns the immutable creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Trims a title, rejecting blank values.
fn normalized_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
