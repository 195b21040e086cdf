//! Unit tests for the task engine.

mod pipeline_tests;
