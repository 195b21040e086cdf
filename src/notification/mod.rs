//! Notification dispatch and read-state tracking.
//!
//! The dispatcher consumes the domain events the mutation pipeline
//! emits and persists one notification row per fired rule. Read-state
//! operations (mark read, mark all read, unread count) are strictly
//! scoped to the requesting user.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
