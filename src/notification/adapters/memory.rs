//! In-memory notification store for tests and embedders.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use crate::notification::ports::{
    NotificationStore, NotificationStoreError, NotificationStoreResult,
};

/// Thread-safe in-memory notification store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationStore {
    state: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> NotificationStoreError {
    NotificationStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, notification: &Notification) -> NotificationStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.iter().any(|n| n.id() == notification.id()) {
            return Err(NotificationStoreError::Duplicate(notification.id()));
        }
        state.push(notification.clone());
        Ok(())
    }

    async fn list_for(&self, user: UserId) -> NotificationStoreResult<Vec<Notification>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        // Newest first; insertion order breaks timestamp ties.
        let mut rows: Vec<Notification> = state
            .iter()
            .rev()
            .filter(|n| n.user() == user)
            .cloned()
            .collect();
        rows.sort_by_key(|n| std::cmp::Reverse(n.created_at()));
        Ok(rows)
    }

    async fn mark_read(&self, user: UserId, id: NotificationId) -> NotificationStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let row = state
            .iter_mut()
            .find(|n| n.id() == id && n.user() == user)
            .ok_or(NotificationStoreError::NotFound(id))?;
        row.mark_read();
        Ok(())
    }

    async fn mark_all_read(&self, user: UserId) -> NotificationStoreResult<usize> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let mut affected = 0;
        for row in state.iter_mut().filter(|n| n.user() == user) {
            if !row.is_read() {
                row.mark_read();
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn unread_count(&self, user: UserId) -> NotificationStoreResult<usize> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .iter()
            .filter(|n| n.user() == user && !n.is_read())
            .count())
    }
}
