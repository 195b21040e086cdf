//! Domain model for task management.
//!
//! The task domain models task creation and update planning, the
//! access policy deciding who sees and mutates which tasks, audit-log
//! derivation for tracked fields, comments, and the domain events that
//! drive notifications, while keeping all infrastructure concerns
//! outside of the domain boundary.

mod audit;
mod comment;
mod error;
mod event;
mod ids;
mod policy;
mod task;
mod vocabulary;

pub use audit::{PersistedTaskLogData, TaskLogEntry, TaskLogId, TrackedField};
pub use comment::{Comment, CommentId, PersistedCommentData};
pub use error::{ParseTrackedFieldError, TaskDomainError};
pub use event::{TaskEvent, event_for_comment, events_for_create, events_for_update};
pub use ids::{CategoryId, TaskId};
pub use policy::{TaskScope, permits_object, visible_scope};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft, TaskSnapshot, UpdatePlan};
pub use vocabulary::{PriorityValue, StatusValue, VocabularyOption};
