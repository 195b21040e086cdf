//! Open status and priority vocabularies.
//!
//! Status and priority are runtime-configurable string vocabularies,
//! not closed enums: administrators may add values without a code
//! change. Values are normalized (trimmed, lower-cased) and must be
//! non-empty; the only value the domain attaches policy meaning to is
//! the reserved completion status [`StatusValue::DONE`].

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated task status value from the open vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusValue(String);

impl StatusValue {
    /// The reserved completion status.
    pub const DONE: &'static str = "done";

    /// Default status for new tasks.
    pub const TODO: &'static str = "todo";

    /// Creates a normalized status value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStatus`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyStatus);
        }
        Ok(Self(normalized))
    }

    /// Returns the default `todo` status.
    #[must_use]
    pub fn todo() -> Self {
        Self(Self::TODO.to_owned())
    }

    /// Returns the reserved `done` status.
    #[must_use]
    pub fn done() -> Self {
        Self(Self::DONE.to_owned())
    }

    /// Returns whether this is the reserved completion status.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.0 == Self::DONE
    }

    /// Returns the status value as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StatusValue {
    fn default() -> Self {
        Self::todo()
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated task priority value from the open vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityValue(String);

impl PriorityValue {
    /// Default priority for new tasks.
    pub const MEDIUM: &'static str = "medium";

    /// Creates a normalized priority value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyPriority`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyPriority);
        }
        Ok(Self(normalized))
    }

    /// Returns the default `medium` priority.
    #[must_use]
    pub fn medium() -> Self {
        Self(Self::MEDIUM.to_owned())
    }

    /// Returns the priority value as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PriorityValue {
    fn default() -> Self {
        Self::medium()
    }
}

impl fmt::Display for PriorityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One labeled, ordered vocabulary entry served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyOption {
    value: String,
    label: String,
    sort_order: i32,
}

impl VocabularyOption {
    /// Creates a vocabulary option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>, sort_order: i32) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            sort_order,
        }
    }

    /// Returns the canonical stored value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the sort position within the vocabulary.
    #[must_use]
    pub const fn sort_order(&self) -> i32 {
        self.sort_order
    }
}
