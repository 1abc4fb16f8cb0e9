//! Task domain model and its total order.
//!
//! # Responsibility
//! - Define the canonical task record held by the priority store.
//! - Define the comparison rule that decides "most important task first".
//!
//! # Invariants
//! - Every live task is identified by a `TaskId` unique within the store.
//! - `completed_date` is present if and only if `status == Completed`, as long
//!   as status changes go through `TaskRecord::set_status`.

pub mod ordering;
pub mod task;
