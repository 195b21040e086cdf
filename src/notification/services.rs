//! Notification dispatcher: event consumption and read-state queries.

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use crate::notification::ports::{NotificationStore, NotificationStoreResult};
use crate::task::domain::{TaskEvent, TaskId};
use crate::task::ports::EventConsumer;
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

/// Consumes domain events and maintains per-user notifications.
#[derive(Clone)]
pub struct NotificationDispatcher<S, C>
where
    S: NotificationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> NotificationDispatcher<S, C>
where
    S: NotificationStore,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher over a notification store.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Persists the notifications a batch of events gives rise to,
    /// returning the created rows.
    ///
    /// Each event maps to zero, one, or two rows (a reassignment
    /// notifies both the new and the previous assignee); every row
    /// starts unread.
    ///
    /// # Errors
    ///
    /// Returns the store error of the first failed insert. Callers on
    /// the mutation path use [`EventConsumer::consume`] instead, which
    /// logs and swallows the failure.
    pub async fn dispatch(&self, events: &[TaskEvent]) -> NotificationStoreResult<Vec<Notification>> {
        let mut created = Vec::new();
        for event in events {
            for (recipient, message) in notices_for(event) {
                let notification =
                    Notification::new(recipient, message, Some(task_of(event)), self.clock.utc());
                self.store.insert(&notification).await?;
                created.push(notification);
            }
        }
        Ok(created)
    }

    /// Returns the user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store error when the query fails.
    pub async fn list_for(&self, user: UserId) -> NotificationStoreResult<Vec<Notification>> {
        self.store.list_for(user).await
    }

    /// Marks one of the user's notifications read. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationStoreError::NotFound`] when no such
    /// notification belongs to the user.
    ///
    /// [`NotificationStoreError::NotFound`]:
    /// crate::notification::ports::NotificationStoreError::NotFound
    pub async fn mark_read(&self, user: UserId, id: NotificationId) -> NotificationStoreResult<()> {
        self.store.mark_read(user, id).await
    }

    /// Marks all of the user's unread notifications read, returning
    /// how many were affected.
    ///
    /// # Errors
    ///
    /// Returns the store error when the bulk update fails.
    pub async fn mark_all_read(&self, user: UserId) -> NotificationStoreResult<usize> {
        self.store.mark_all_read(user).await
    }

    /// Counts the user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns the store error when the query fails.
    pub async fn unread_count(&self, user: UserId) -> NotificationStoreResult<usize> {
        self.store.unread_count(user).await
    }
}

#[async_trait]
impl<S, C> EventConsumer for NotificationDispatcher<S, C>
where
    S: NotificationStore,
    C: Clock + Send + Sync,
{
    async fn consume(&self, events: &[TaskEvent]) {
        // Notifications are a best-effort side channel: the task state
        // and the audit trail stay the source of truth, so a failed
        // insert is logged rather than failing the mutation.
        if let Err(err) = self.dispatch(events).await {
            warn!(error = %err, "notification dispatch failed");
        }
    }
}

/// Returns the task the event concerns.
const fn task_of(event: &TaskEvent) -> TaskId {
    match event {
        TaskEvent::Created { task_id, .. }
        | TaskEvent::Reassigned { task_id, .. }
        | TaskEvent::StatusChanged { task_id, .. }
        | TaskEvent::CommentAdded { task_id, .. } => *task_id,
    }
}

/// Maps one event to its `(recipient, message)` pairs.
fn notices_for(event: &TaskEvent) -> Vec<(UserId, String)> {
    match event {
        TaskEvent::Created {
            title, assignee, ..
        } => vec![(
            *assignee,
            format!("You have been assigned a new task: \u{201c}{title}\u{201d}."),
        )],
        TaskEvent::Reassigned {
            title,
            previous,
            current,
            ..
        } => vec![
            (
                *current,
                format!("You have been given the task: \u{201c}{title}\u{201d}."),
            ),
            (
                *previous,
                format!("The task \u{201c}{title}\u{201d} is no longer assigned to you."),
            ),
        ],
        TaskEvent::StatusChanged {
            title,
            assignee,
            previous,
            current,
            ..
        } => vec![(
            *assignee,
            format!(
                "Status of task \u{201c}{title}\u{201d} changed: {previous} \u{2192} {current}."
            ),
        )],
        TaskEvent::CommentAdded {
            title,
            assignee,
            author_name,
            excerpt,
            ..
        } => vec![(
            *assignee,
            format!("New comment on task \u{201c}{title}\u{201d}: {author_name}: {excerpt}"),
        )],
    }
}
