//! Inert side-channel adapters.
//!
//! Default implementations for embedders that wire no mail, calendar,
//! or notification consumer. Every call succeeds and does nothing.

use crate::directory::domain::UserId;
use crate::task::domain::{Task, TaskEvent};
use crate::task::ports::{CalendarSync, EmailNotifier, EventConsumer, IntegrationError};
use async_trait::async_trait;

/// Mail adapter that drops every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertEmailNotifier;

#[async_trait]
impl EmailNotifier for InertEmailNotifier {
    async fn notify_assignment(
        &self,
        _task: &Task,
        _recipient_email: &str,
    ) -> Result<(), IntegrationError> {
        Ok(())
    }
}

/// Calendar adapter that skips every sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertCalendarSync;

#[async_trait]
impl CalendarSync for InertCalendarSync {
    async fn sync_task(&self, _task: &Task, _user: UserId) -> Result<(), IntegrationError> {
        Ok(())
    }
}

/// Event consumer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardingEventConsumer;

#[async_trait]
impl EventConsumer for DiscardingEventConsumer {
    async fn consume(&self, _events: &[TaskEvent]) {}
}
