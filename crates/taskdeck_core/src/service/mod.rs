//! Core use-case services.
//!
//! # Responsibility
//! - Expose the only entry points presentation layers may use.
//! - Keep callers away from the task file and from heap internals.

pub mod task_service;
