//! Port contracts for the task engine.
//!
//! Ports define infrastructure-agnostic interfaces used by task
//! services: transactional persistence, vocabulary lookup, and the
//! best-effort side channels (mail, calendar, event hand-off).

pub mod integration;
pub mod repository;
pub mod vocabulary;

pub use integration::{CalendarSync, EmailNotifier, EventConsumer, IntegrationError};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use vocabulary::VocabularyProvider;
