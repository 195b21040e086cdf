//! Taskhive: team task-management core.
//!
//! This crate provides the state-and-visibility engine for a team task
//! manager: role- and team-scoped task visibility, a validated mutation
//! pipeline with an append-only audit trail, and event-driven
//! notification dispatch.
//!
//! # Architecture
//!
//! Taskhive follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, side channels)
//!
//! # Modules
//!
//! - [`directory`]: Users, teams, roles, and the acting identity
//! - [`task`]: Task store, access policy, mutation pipeline, audit log
//! - [`notification`]: Notification dispatch and read/unread state

pub mod directory;
pub mod notification;
pub mod task;
