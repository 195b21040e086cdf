//! In-memory adapters for the task engine.

mod task;

pub use task::InMemoryTaskRepository;
