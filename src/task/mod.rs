//! Task state-and-visibility engine for Taskhive.
//!
//! This module implements the core of the task manager: role- and
//! team-scoped visibility, validated task creation and update with the
//! `completed ⇔ done` invariant, an append-only audit trail of tracked
//! field changes, and the domain events consumed by the notification
//! dispatcher. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
