//! Error types for task domain validation and parsing.

use crate::directory::domain::UserId;
use thiserror::Error;

/// Errors returned while validating task mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The status value is empty after trimming.
    #[error("status value must not be empty")]
    EmptyStatus,

    /// The priority value is empty after trimming.
    #[error("priority value must not be empty")]
    EmptyPriority,

    /// A non-privileged actor attempted to move a task into the
    /// completion status. Only staff and superusers may do this; the
    /// whole mutation is rejected with nothing written.
    #[error("actor {actor} is not permitted to mark tasks as done")]
    CompletionNotPermitted {
        /// The acting user lacking the privilege.
        actor: UserId,
    },
}

/// Error returned while parsing tracked field names from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tracked field: {0}")]
pub struct ParseTrackedFieldError(pub String);
