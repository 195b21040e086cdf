//! Append-only audit log of tracked task field changes.

use super::{ParseTrackedFieldError, TaskId};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskLogId(Uuid);

impl TaskLogId {
    /// Creates a new random log entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a log entry identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskLogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task attribute whose changes are recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    /// The task title.
    Title,
    /// The task description.
    Description,
    /// The task status value.
    Status,
}

impl TrackedField {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
        }
    }
}

impl TryFrom<&str> for TrackedField {
    type Error = ParseTrackedFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "status" => Ok(Self::Status),
            _ => Err(ParseTrackedFieldError(value.to_owned())),
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded field-level change.
///
/// Entries are append-only: nothing edits or deletes them while their
/// task exists, and removing the acting user later nulls `acting_user`
/// rather than cascading into the trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLogEntry {
    id: TaskLogId,
    task_id: TaskId,
    change_type: TrackedField,
    old_value: String,
    new_value: String,
    acting_user: Option<UserId>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskLogData {
    /// Persisted log entry identifier.
    pub id: TaskLogId,
    /// Task the entry belongs to.
    pub task_id: TaskId,
    /// Which tracked field changed.
    pub change_type: TrackedField,
    /// Value before the change.
    pub old_value: String,
    /// Value after the change.
    pub new_value: String,
    /// Acting user, if still present in the directory.
    pub acting_user: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskLogEntry {
    /// Records a field change performed by `acting_user` at `now`.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        change_type: TrackedField,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
        acting_user: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskLogId::new(),
            task_id,
            change_type,
            old_value: old_value.into(),
            new_value: new_value.into(),
            acting_user: Some(acting_user),
            created_at: now,
        }
    }

    /// Reconstructs an audit entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskLogData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            change_type: data.change_type,
            old_value: data.old_value,
            new_value: data.new_value,
            acting_user: data.acting_user,
            created_at: data.created_at,
        }
    }

    /// Returns the log entry identifier.
    #[must_use]
    pub const fn id(&self) -> TaskLogId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns which tracked field changed.
    #[must_use]
    pub const fn change_type(&self) -> TrackedField {
        self.change_type
    }

    /// Returns the value before the change.
    #[must_use]
    pub fn old_value(&self) -> &str {
        &self.old_value
    }

    /// Returns the value after the change.
    #[must_use]
    pub fn new_value(&self) -> &str {
        &self.new_value
    }

    /// Returns the acting user, if still known.
    #[must_use]
    pub const fn acting_user(&self) -> Option<UserId> {
        self.acting_user
    }

    /// Returns the entry creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
