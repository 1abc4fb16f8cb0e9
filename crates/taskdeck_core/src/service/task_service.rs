//! Task use-case service.
//!
//! # Responsibility
//! - Validate user input, assign ids, and route every mutation through
//!   `PriorityStore`.
//! - Persist the full sorted collection after each mutation.
//! - Provide sorted, native-order, filtered, and summary views.
//!
//! # Invariants
//! - Ids are `high-water mark + 1` and never reused within a session.
//! - Updates never change a task id.
//! - A failed save keeps the in-memory change and returns `ServiceError::Repo`;
//!   the file keeps its previous contents.
//! - After a failed load nothing is written until a `reload` succeeds, so an
//!   unreadable file is never replaced by an empty store.

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::model::task::{Priority, TaskDraft, TaskId, TaskRecord, TaskValidationError};
use crate::repo::file_store::{FileStore, RejectedLine, RepoError};
use crate::store::priority_store::PriorityStore;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before a record was built.
    Validation(TaskValidationError),
    /// Target task is not in the store.
    NotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// The last load failed; writes are refused until a successful reload.
    StoreUnavailable(String),
    /// The highest id is already in use; no further id can be assigned.
    IdSpaceExhausted,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::StoreUnavailable(reason) => {
                write!(f, "task file could not be loaded; refusing to write: {reason}")
            }
            Self::IdSpaceExhausted => write!(f, "no task ids left to assign"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
            Self::StoreUnavailable(_) | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Summary counters for a status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub count: usize,
    pub completed: usize,
    pub urgent: usize,
}

impl TaskStats {
    /// Rounded share of completed tasks; 0 when there are no tasks.
    pub fn completion_percent(&self) -> u32 {
        if self.count == 0 {
            return 0;
        }
        ((self.completed as f64 / self.count as f64) * 100.0).round() as u32
    }
}

/// Subject search plus optional hiding of completed tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring; empty matches everything.
    pub text: String,
    pub hide_completed: bool,
}

impl TaskFilter {
    pub fn matches(&self, record: &TaskRecord) -> bool {
        if self.hide_completed && record.is_completed() {
            return false;
        }
        let needle = self.text.to_lowercase();
        needle.is_empty() || record.subject().to_lowercase().contains(&needle)
    }
}

/// Use-case service over one task file.
pub struct TaskService<C: Clock = SystemClock> {
    file: FileStore,
    header: String,
    store: PriorityStore,
    rejected: Vec<RejectedLine>,
    load_error: Option<String>,
    last_assigned_id: TaskId,
    clock: C,
}

impl TaskService<SystemClock> {
    /// Opens the configured file using the local calendar.
    pub fn open(config: StoreConfig) -> Self {
        Self::open_with_clock(config, SystemClock)
    }
}

impl<C: Clock> TaskService<C> {
    /// Opens the configured file.
    ///
    /// A missing file yields an empty store. An unreadable file is logged and
    /// also yields an empty store, but that store is read-only until a
    /// `reload` succeeds; construction never aborts.
    pub fn open_with_clock(config: StoreConfig, clock: C) -> Self {
        let file = FileStore::new(config.data_file);
        let (store, rejected, load_error) = match file.load_report() {
            Ok(report) => (report.store, report.rejected, None),
            Err(err) => {
                error!(
                    "event=service_open module=service status=error fallback=read_only error={}",
                    err
                );
                (PriorityStore::new(), Vec::new(), Some(err.to_string()))
            }
        };
        let last_assigned_id = store.max_id().unwrap_or(0);

        Self {
            file,
            header: config.header,
            store,
            rejected,
            load_error,
            last_assigned_id,
            clock,
        }
    }

    /// Re-reads the file, replacing in-memory contents.
    ///
    /// On read failure the current contents are kept, writes stay refused,
    /// and the error is returned.
    pub fn reload(&mut self) -> ServiceResult<usize> {
        let report = match self.file.load_report() {
            Ok(report) => report,
            Err(err) => {
                self.load_error = Some(err.to_string());
                return Err(err.into());
            }
        };
        self.store = report.store;
        self.rejected = report.rejected;
        self.load_error = None;
        self.last_assigned_id = self
            .last_assigned_id
            .max(self.store.max_id().unwrap_or(0));
        Ok(self.store.len())
    }

    /// Whether the last load succeeded, so mutations may be saved.
    pub fn is_writable(&self) -> bool {
        self.load_error.is_none()
    }

    /// Lines skipped by the most recent load.
    pub fn rejected_lines(&self) -> &[RejectedLine] {
        &self.rejected
    }

    /// Validates `draft`, stores a new task, and saves.
    ///
    /// # Errors
    /// - `Validation` when the subject is blank or not storable.
    /// - `StoreUnavailable` when the last load failed; nothing changes.
    /// - `IdSpaceExhausted` when `TaskId::MAX` was already assigned.
    /// - `Repo` when the save fails; the task stays in memory.
    pub fn create(&mut self, draft: TaskDraft) -> ServiceResult<TaskId> {
        draft.validate()?;
        self.ensure_writable()?;

        let id = self
            .last_assigned_id
            .checked_add(1)
            .ok_or(ServiceError::IdSpaceExhausted)?;
        self.last_assigned_id = id;
        let record = TaskRecord::from_draft(id, draft, self.clock.today());
        info!(
            "event=task_create module=service status=ok id={} priority={} task_status={}",
            id,
            record.priority(),
            record.status()
        );
        self.store.insert(record);

        self.save()?;
        Ok(id)
    }

    /// Replaces every editable field of task `id` with `draft`, then saves.
    ///
    /// # Errors
    /// - `Validation` when the draft is rejected; nothing changes.
    /// - `StoreUnavailable` when the last load failed; nothing changes.
    /// - `NotFound` when `id` is not stored.
    /// - `Repo` when the save fails; the change stays in memory.
    pub fn update(&mut self, id: TaskId, draft: TaskDraft) -> ServiceResult<()> {
        draft.validate()?;
        self.ensure_writable()?;

        let today = self.clock.today();
        if !self
            .store
            .update(id, |record| record.apply_draft(draft, today))
        {
            return Err(ServiceError::NotFound(id));
        }
        info!("event=task_update module=service status=ok id={}", id);

        self.save()?;
        Ok(())
    }

    /// Removes task `id`, saves, and returns the removed record.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not stored (e.g. a stale selection).
    /// - `StoreUnavailable` when the last load failed; nothing changes.
    /// - `Repo` when the save fails; the task stays removed in memory.
    pub fn delete(&mut self, id: TaskId) -> ServiceResult<TaskRecord> {
        self.ensure_writable()?;
        let removed = self.store.remove(id).ok_or(ServiceError::NotFound(id))?;
        info!("event=task_delete module=service status=ok id={}", id);

        self.save()?;
        Ok(removed)
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.store.get(id)
    }

    /// Most important task, if any.
    pub fn top(&self) -> Option<&TaskRecord> {
        self.store.peek_min()
    }

    /// All tasks, most important first.
    pub fn list_sorted(&self) -> Vec<TaskRecord> {
        self.store.drain_in_order().collect()
    }

    /// All tasks in raw heap array order.
    pub fn list_native(&self) -> Vec<TaskRecord> {
        self.store.snapshot_native_order()
    }

    /// Sorted tasks that pass `filter`.
    pub fn search(&self, filter: &TaskFilter) -> Vec<TaskRecord> {
        self.store
            .drain_in_order()
            .filter(|record| filter.matches(record))
            .collect()
    }

    pub fn stats(&self) -> TaskStats {
        self.store.iter().fold(
            TaskStats {
                count: self.store.len(),
                ..TaskStats::default()
            },
            |mut stats, record| {
                if record.is_completed() {
                    stats.completed += 1;
                }
                if record.priority() == Priority::Urgent {
                    stats.urgent += 1;
                }
                stats
            },
        )
    }

    /// Rewrites the task file from the current contents.
    ///
    /// Refused with `StoreUnavailable` while the last load has failed.
    pub fn save(&self) -> ServiceResult<usize> {
        self.ensure_writable()?;
        Ok(self.file.save(&self.store, &self.header)?)
    }

    fn ensure_writable(&self) -> ServiceResult<()> {
        match &self.load_error {
            Some(reason) => Err(ServiceError::StoreUnavailable(reason.clone())),
            None => Ok(()),
        }
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &PriorityStore {
        &self.store
    }

    pub fn file_store(&self) -> &FileStore {
        &self.file
    }
}
