//! Total order used by the priority store and by sorted exports.
//!
//! Rules, first non-tie wins:
//! 1. Completed tasks sink below every non-completed task.
//! 2. Priority rank ascending (`URGENT` first).
//! 3. Due date ascending, absent due dates last.
//!
//! Records that compare `Equal` are not necessarily identical; their relative
//! order is unspecified.

use crate::model::task::{Priority, TaskRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Explicit rank table; lower rank is more urgent.
///
/// Kept separate from enum declaration order so reordering variants never
/// changes sort results.
pub fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::Urgent => 0,
        Priority::High => 1,
        Priority::Normal => 2,
        Priority::Low => 3,
    }
}

/// Compares two tasks; `Less` means `left` is more important.
pub fn compare(left: &TaskRecord, right: &TaskRecord) -> Ordering {
    left.is_completed()
        .cmp(&right.is_completed())
        .then_with(|| priority_rank(left.priority()).cmp(&priority_rank(right.priority())))
        .then_with(|| compare_due_dates(left.due_date(), right.due_date()))
}

/// Present dates ascending, absent dates after all present ones.
pub fn compare_due_dates(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns whether `left` must come strictly before `right`.
pub fn precedes(left: &TaskRecord, right: &TaskRecord) -> bool {
    compare(left, right) == Ordering::Less
}
