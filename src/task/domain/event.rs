//! Domain events derived from task state deltas.
//!
//! Events are pure data computed from the difference between a task's
//! state immediately before and after a mutation. The mutation
//! pipeline emits them; the notification dispatcher consumes them.
//! This replaces implicit save-hook dispatch with an explicit,
//! testable event list.

use super::{Comment, StatusValue, Task, TaskId, TaskSnapshot};
use crate::directory::domain::UserId;
use serde::{Deserialize, Serialize};

/// Maximum number of characters of a comment body carried in a
/// [`TaskEvent::CommentAdded`] excerpt.
const COMMENT_EXCERPT_CHARS: usize = 80;

/// A meaningful task state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task was created with an assignee.
    Created {
        /// The created task.
        task_id: TaskId,
        /// Task title at creation time.
        title: String,
        /// The initial assignee.
        assignee: UserId,
    },
    /// The assignee changed.
    Reassigned {
        /// The reassigned task.
        task_id: TaskId,
        /// Task title at update time.
        title: String,
        /// Assignee before the update.
        previous: UserId,
        /// Assignee after the update.
        current: UserId,
    },
    /// The status value changed on an existing task.
    StatusChanged {
        /// The updated task.
        task_id: TaskId,
        /// Task title at update time.
        title: String,
        /// The current assignee.
        assignee: UserId,
        /// Status before the update.
        previous: StatusValue,
        /// Status after the update.
        current: StatusValue,
    },
    /// A comment was added by someone other than the assignee.
    CommentAdded {
        /// The commented task.
        task_id: TaskId,
        /// Task title at comment time.
        title: String,
        /// The current assignee.
        assignee: UserId,
        /// The comment author.
        author: UserId,
        /// The author's display name, resolved at emission time.
        author_name: String,
        /// First characters of the comment body.
        excerpt: String,
    },
}

/// Derives the events emitted when a task is created.
#[must_use]
pub fn events_for_create(task: &Task) -> Vec<TaskEvent> {
    vec![TaskEvent::Created {
        task_id: task.id(),
        title: task.title().to_owned(),
        assignee: task.assigned_to(),
    }]
}

/// Derives the events emitted by a task update.
///
/// Reassignment fires only when the assignee actually changed:
/// re-stating the current assignee is not a reassignment. A status
/// event fires only when the stored status value differs from the
/// pre-update snapshot. Both may fire for the same update.
#[must_use]
pub fn events_for_update(previous: &TaskSnapshot, task: &Task) -> Vec<TaskEvent> {
    let mut events = Vec::new();

    if previous.assigned_to() != task.assigned_to() {
        events.push(TaskEvent::Reassigned {
            task_id: task.id(),
            title: task.title().to_owned(),
            previous: previous.assigned_to(),
            current: task.assigned_to(),
        });
    }

    if previous.status() != task.status() {
        events.push(TaskEvent::StatusChanged {
            task_id: task.id(),
            title: task.title().to_owned(),
            assignee: task.assigned_to(),
            previous: previous.status().clone(),
            current: task.status().clone(),
        });
    }

    events
}

/// Derives the event emitted when a comment is added.
///
/// Returns `None` when the author is the task's current assignee:
/// self-authored comments never notify. `author_name` is the display
/// name the notification message carries; the caller resolves it from
/// the directory.
#[must_use]
pub fn event_for_comment(task: &Task, comment: &Comment, author_name: &str) -> Option<TaskEvent> {
    if comment.author() == task.assigned_to() {
        return None;
    }
    Some(TaskEvent::CommentAdded {
        task_id: task.id(),
        title: task.title().to_owned(),
        assignee: task.assigned_to(),
        author: comment.author(),
        author_name: author_name.to_owned(),
        excerpt: comment
            .content()
            .chars()
            .take(COMMENT_EXCERPT_CHARS)
            .collect(),
    })
}
