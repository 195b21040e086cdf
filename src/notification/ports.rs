//! Port contract for notification persistence.

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification store operations.
pub type NotificationStoreResult<T> = Result<T, NotificationStoreError>;

/// Notification persistence contract.
///
/// Every query is scoped to one user; no operation exposes another
/// user's rows regardless of the caller's role.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Stores a new notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationStoreError::Duplicate`] when the
    /// identifier already exists.
    async fn insert(&self, notification: &Notification) -> NotificationStoreResult<()>;

    /// Returns a user's notifications, newest first.
    async fn list_for(&self, user: UserId) -> NotificationStoreResult<Vec<Notification>>;

    /// Marks one of the user's notifications read.
    ///
    /// Idempotent: marking an already-read notification succeeds and
    /// changes nothing observable.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationStoreError::NotFound`] when no such
    /// notification belongs to the user.
    async fn mark_read(&self, user: UserId, id: NotificationId) -> NotificationStoreResult<()>;

    /// Marks all of the user's unread notifications read, returning
    /// how many were affected.
    async fn mark_all_read(&self, user: UserId) -> NotificationStoreResult<usize>;

    /// Counts the user's unread notifications.
    async fn unread_count(&self, user: UserId) -> NotificationStoreResult<usize>;
}

/// Errors returned by notification store implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationStoreError {
    /// A notification with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    Duplicate(NotificationId),

    /// No such notification belongs to the user.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
