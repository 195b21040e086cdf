//! Adapter implementations of the notification store port.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryNotificationStore;
pub use postgres::{NotificationPgPool, PostgresNotificationStore};
