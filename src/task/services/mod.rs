//! Application services orchestrating the task engine.

mod pipeline;

pub use pipeline::{
    CommentOutcome, MutationOutcome, TaskPipelineError, TaskPipelineResult, TaskPipelineService,
};
