//! Persistence layer for the task collection.
//!
//! # Responsibility
//! - Load a flat text file into a `PriorityStore`.
//! - Rewrite the whole file from a `PriorityStore`, always in sorted order.
//!
//! # Invariants
//! - A missing file loads as an empty store.
//! - A malformed line is skipped and logged; it never aborts a load.
//! - Saves are all-or-nothing from the caller's point of view.

pub mod file_store;
