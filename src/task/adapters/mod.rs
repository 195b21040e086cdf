//! Adapter implementations of the task engine ports.

pub mod inert;
pub mod memory;
pub mod postgres;
pub mod vocabulary;
