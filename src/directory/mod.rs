//! User, team, and role directory for Taskhive.
//!
//! The directory owns pure lookup data: users, their one-to-one
//! profiles (role plus optional team), and team membership. The access
//! policy and the mutation pipeline consume this data through the
//! [`Actor`](domain::Actor) value and the
//! [`DirectoryReader`](ports::DirectoryReader) port; no task logic
//! lives here.

pub mod adapters;
pub mod domain;
pub mod ports;
