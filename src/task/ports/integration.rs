//! Best-effort side-channel ports.
//!
//! Everything here is fire-and-forget relative to the task mutation:
//! the pipeline invokes these after the core transaction commits and
//! logs failures instead of surfacing them.

use crate::directory::domain::UserId;
use crate::task::domain::{Task, TaskEvent};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure of an external side channel (mail, calendar).
///
/// Never propagated as a failure of the triggering mutation; recorded
/// via logging only.
#[derive(Debug, Clone, Error)]
#[error("integration failure: {0}")]
pub struct IntegrationError(Arc<dyn std::error::Error + Send + Sync>);

impl IntegrationError {
    /// Wraps an integration error source.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }

    /// Wraps a plain message.
    #[must_use]
    pub fn message(msg: impl Into<String>) -> Self {
        Self(Arc::new(std::io::Error::other(msg.into())))
    }
}

/// Outbound mail contract for assignment notices.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Sends an assignment notice for `task` to `recipient_email`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when delivery fails; callers log
    /// and continue.
    async fn notify_assignment(
        &self,
        task: &Task,
        recipient_email: &str,
    ) -> Result<(), IntegrationError>;
}

/// External calendar synchronization contract.
#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Creates or updates the calendar entry for `task` in `user`'s
    /// calendar. Credential handling is the adapter's concern.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when the sync fails; callers log
    /// and continue.
    async fn sync_task(&self, task: &Task, user: UserId) -> Result<(), IntegrationError>;
}

/// Hand-off of emitted domain events to their consumer.
///
/// Consumption is best-effort: implementations handle and log their
/// own failures so event delivery never fails the mutation that
/// produced the events.
#[async_trait]
pub trait EventConsumer: Send + Sync {
    /// Consumes the events emitted by one mutation.
    async fn consume(&self, events: &[TaskEvent]);
}
