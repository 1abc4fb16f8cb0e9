//! Binary min-heap of tasks keyed by `ordering::compare`.
//!
//! # Responsibility
//! - Insert, remove-by-id, and update tasks while keeping the heap property.
//! - Export contents in sorted order or in raw array (native) order.
//!
//! # Invariants
//! - For every index `i > 0`, `entries[(i - 1) / 2]` never compares greater
//!   than `entries[i]`.
//! - Records are only mutated after being taken out of the array, then
//!   re-inserted (`update`).
//! - Missing ids and empty stores are reported as `None`/`false`, never panics.

use crate::model::ordering::precedes;
use crate::model::task::{TaskId, TaskRecord};
use std::iter::FusedIterator;

/// Heap-backed task collection.
#[derive(Debug, Clone, Default)]
pub struct PriorityStore {
    entries: Vec<TaskRecord>,
}

impl PriorityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Inserts a record, O(log n). Always succeeds.
    pub fn insert(&mut self, record: TaskRecord) {
        self.entries.push(record);
        let last = self.entries.len() - 1;
        self.sift_up(last);
    }

    /// Returns whether a record with `id` is present.
    pub fn contains(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Looks up a record by id, O(n).
    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.entries.iter().find(|record| record.id() == id)
    }

    /// Removes the record with `id`: O(n) to locate, O(log n) to restore.
    ///
    /// Returns `None` when no such record exists.
    pub fn remove(&mut self, id: TaskId) -> Option<TaskRecord> {
        let index = self.position(id)?;
        Some(self.remove_at(index))
    }

    /// Changes a stored record via remove, mutate, re-insert.
    ///
    /// Returns `false` and leaves the store untouched when `id` is missing.
    pub fn update<F>(&mut self, id: TaskId, mutate: F) -> bool
    where
        F: FnOnce(&mut TaskRecord),
    {
        let Some(mut record) = self.remove(id) else {
            return false;
        };
        mutate(&mut record);
        self.insert(record);
        true
    }

    /// Returns the most important record without removing it.
    pub fn peek_min(&self) -> Option<&TaskRecord> {
        self.entries.first()
    }

    /// Removes and returns the most important record.
    pub fn pop_min(&mut self) -> Option<TaskRecord> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.remove_at(0))
    }

    /// Largest id currently stored.
    pub fn max_id(&self) -> Option<TaskId> {
        self.entries.iter().map(TaskRecord::id).max()
    }

    /// Iterates records in native heap (array) order.
    pub fn iter(&self) -> std::slice::Iter<'_, TaskRecord> {
        self.entries.iter()
    }

    /// Clones records in native heap order; intentionally not sorted.
    pub fn snapshot_native_order(&self) -> Vec<TaskRecord> {
        self.entries.clone()
    }

    /// Lazily yields every record in strict order by extracting from a copy.
    ///
    /// The store itself is left unchanged.
    pub fn drain_in_order(&self) -> DrainInOrder {
        DrainInOrder { heap: self.clone() }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.entries.iter().position(|record| record.id() == id)
    }

    fn remove_at(&mut self, index: usize) -> TaskRecord {
        let removed = self.entries.swap_remove(index);
        if index < self.entries.len() {
            // The moved tail element may belong above or below `index`.
            self.sift_down(index);
            self.sift_up(index);
        }
        removed
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !precedes(&self.entries[index], &self.entries[parent]) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && precedes(&self.entries[right], &self.entries[left]) {
                right
            } else {
                left
            };
            if !precedes(&self.entries[child], &self.entries[index]) {
                break;
            }
            self.entries.swap(index, child);
            index = child;
        }
    }
}

impl Extend<TaskRecord> for PriorityStore {
    fn extend<I: IntoIterator<Item = TaskRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<TaskRecord> for PriorityStore {
    fn from_iter<I: IntoIterator<Item = TaskRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<'a> IntoIterator for &'a PriorityStore {
    type Item = &'a TaskRecord;
    type IntoIter = std::slice::Iter<'a, TaskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sorted, single-pass view produced by `PriorityStore::drain_in_order`.
#[derive(Debug)]
pub struct DrainInOrder {
    heap: PriorityStore,
}

impl Iterator for DrainInOrder {
    type Item = TaskRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop_min()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for DrainInOrder {}

impl FusedIterator for DrainInOrder {}
