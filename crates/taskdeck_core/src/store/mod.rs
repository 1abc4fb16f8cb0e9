//! In-memory task storage.
//!
//! # Responsibility
//! - Hold the live task set for a session under the task total order.
//!
//! # Invariants
//! - The store exclusively owns its records; callers get shared references or
//!   clones, never mutable aliases.
//! - Key-affecting changes go through remove, mutate, re-insert.

pub mod priority_store;
