//! Task domain model.
//!
//! # Responsibility
//! - Define the task record plus its priority/status enumerations.
//! - Own the status transition rule that derives `completed_date`.
//! - Validate user-facing drafts before a record is built.
//!
//! # Invariants
//! - `id` is assigned once and never changed by update paths.
//! - `completed_date` is stamped when status becomes `Completed` and cleared
//!   when status leaves `Completed`.
//! - Absent dates are `None`; no sentinel date value exists in memory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable task identifier, unique among live records.
pub type TaskId = u32;

/// Field delimiter used by the flat-file format. Subjects must not contain it.
pub const FIELD_DELIMITER: char = ',';

/// Placeholder text shown for an absent start or due date.
pub const TBD_LABEL: &str = "TBD";

/// Task urgency, most important first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// All priorities, most important first.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Normal,
        Priority::Low,
    ];

    /// Returns the persisted enumeration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
            Self::Low => "LOW",
        }
    }

    /// Looks up a priority by its exact persisted name.
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "URGENT" => Some(Self::Urgent),
            "HIGH" => Some(Self::High),
            "NORMAL" => Some(Self::Normal),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Returns the persisted enumeration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Looks up a status by its exact persisted name.
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "NOT_STARTED" => Some(Self::NotStarted),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Human-readable label, e.g. `NOT STARTED`.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT STARTED",
            Self::InProgress => "IN PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders an optional date for display, using `TBD` when absent.
pub fn display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => TBD_LABEL.to_string(),
    }
}

/// Validation error for user-supplied task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Subject is empty or whitespace-only.
    EmptySubject,
    /// Subject contains the flat-file field delimiter.
    SubjectContainsDelimiter,
    /// Subject contains a line break.
    SubjectContainsLineBreak,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySubject => write!(f, "subject is required"),
            Self::SubjectContainsDelimiter => {
                write!(f, "subject must not contain `{FIELD_DELIMITER}`")
            }
            Self::SubjectContainsLineBreak => write!(f, "subject must not contain line breaks"),
        }
    }
}

impl Error for TaskValidationError {}

/// User input for creating or fully replacing a task.
///
/// `None` for priority/status means "use the default"; `None` for a date
/// means TBD.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub subject: String,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Checks boundary rules before a record is built from this draft.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.subject.trim().is_empty() {
            return Err(TaskValidationError::EmptySubject);
        }
        if self.subject.contains(FIELD_DELIMITER) {
            return Err(TaskValidationError::SubjectContainsDelimiter);
        }
        if self.subject.contains(['\n', '\r']) {
            return Err(TaskValidationError::SubjectContainsLineBreak);
        }
        Ok(())
    }
}

/// Canonical task record.
///
/// Fields are private so status changes cannot skip the completion-date rule.
/// Once a record is inside a `PriorityStore`, it can only be changed through
/// `PriorityStore::update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    id: TaskId,
    subject: String,
    priority: Priority,
    status: TaskStatus,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    completed_date: Option<NaiveDate>,
}

impl TaskRecord {
    /// Creates a record with default priority/status and TBD dates.
    pub fn new(id: TaskId, subject: impl Into<String>) -> Self {
        Self {
            id,
            subject: subject.into(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            start_date: None,
            due_date: None,
            completed_date: None,
        }
    }

    /// Builds a record from a draft.
    ///
    /// Status goes through `set_status`, so a draft created as `Completed`
    /// is stamped with `today`. The draft is not validated here.
    pub fn from_draft(id: TaskId, draft: TaskDraft, today: NaiveDate) -> Self {
        let mut record = Self::new(id, String::new());
        record.apply_draft(draft, today);
        record
    }

    /// Rebuilds a record exactly as persisted, without re-deriving any field.
    pub fn restore(
        id: TaskId,
        subject: impl Into<String>,
        priority: Priority,
        status: TaskStatus,
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
        completed_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            priority,
            status,
            start_date,
            due_date,
            completed_date,
        }
    }

    /// Replaces every user-editable field with the draft values.
    pub fn apply_draft(&mut self, draft: TaskDraft, today: NaiveDate) {
        self.subject = draft.subject;
        self.priority = draft.priority.unwrap_or_default();
        self.set_status(draft.status.unwrap_or_default(), today);
        self.start_date = draft.start_date;
        self.due_date = draft.due_date;
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn completed_date(&self) -> Option<NaiveDate> {
        self.completed_date
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Changes status and keeps `completed_date` in sync.
    ///
    /// # Invariants
    /// - Entering `Completed` stamps `today`.
    /// - Re-asserting `Completed` keeps an existing stamp.
    /// - Any other status clears the stamp.
    pub fn set_status(&mut self, status: TaskStatus, today: NaiveDate) {
        self.status = status;
        if status == TaskStatus::Completed {
            if self.completed_date.is_none() {
                self.completed_date = Some(today);
            }
        } else {
            self.completed_date = None;
        }
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
    }

    pub fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.due_date = date;
    }
}

impl Display for TaskRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task #{}: {} [{}]", self.id, self.subject, self.priority)
    }
}
