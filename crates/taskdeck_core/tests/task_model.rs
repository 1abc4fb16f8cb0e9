use chrono::NaiveDate;
use taskdeck_core::{
    display_date, Priority, TaskDraft, TaskRecord, TaskStatus, TaskValidationError,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn new_record_uses_defaults() {
    let record = TaskRecord::new(1, "hello");

    assert_eq!(record.id(), 1);
    assert_eq!(record.subject(), "hello");
    assert_eq!(record.priority(), Priority::Normal);
    assert_eq!(record.status(), TaskStatus::NotStarted);
    assert_eq!(record.start_date(), None);
    assert_eq!(record.due_date(), None);
    assert_eq!(record.completed_date(), None);
}

#[test]
fn completing_stamps_today_and_reopening_clears() {
    let today = day(2025, 4, 2);
    let mut record = TaskRecord::new(1, "ship");

    record.set_status(TaskStatus::Completed, today);
    assert_eq!(record.completed_date(), Some(today));

    record.set_status(TaskStatus::InProgress, day(2025, 4, 3));
    assert_eq!(record.completed_date(), None);

    record.set_status(TaskStatus::NotStarted, day(2025, 4, 4));
    assert_eq!(record.completed_date(), None);
}

#[test]
fn recompleting_keeps_original_stamp() {
    let mut record = TaskRecord::new(1, "ship");
    record.set_status(TaskStatus::Completed, day(2025, 4, 2));
    record.set_status(TaskStatus::Completed, day(2025, 4, 9));

    assert_eq!(record.completed_date(), Some(day(2025, 4, 2)));
}

#[test]
fn from_draft_routes_status_through_setter() {
    let today = day(2025, 6, 1);
    let draft = TaskDraft::new("done already")
        .with_priority(Priority::High)
        .with_status(TaskStatus::Completed)
        .with_due_date(day(2025, 6, 30));

    let record = TaskRecord::from_draft(7, draft, today);
    assert_eq!(record.id(), 7);
    assert_eq!(record.priority(), Priority::High);
    assert_eq!(record.completed_date(), Some(today));
    assert_eq!(record.due_date(), Some(day(2025, 6, 30)));
}

#[test]
fn draft_validation_rejects_unstorable_subjects() {
    assert_eq!(
        TaskDraft::new("   ").validate(),
        Err(TaskValidationError::EmptySubject)
    );
    assert_eq!(
        TaskDraft::new("a,b").validate(),
        Err(TaskValidationError::SubjectContainsDelimiter)
    );
    assert_eq!(
        TaskDraft::new("a\nb").validate(),
        Err(TaskValidationError::SubjectContainsLineBreak)
    );
    assert!(TaskDraft::new("buy milk").validate().is_ok());
}

#[test]
fn labels_and_tbd_rendering() {
    assert_eq!(TaskStatus::NotStarted.label(), "NOT STARTED");
    assert_eq!(display_date(None), "TBD");
    assert_eq!(display_date(Some(day(2025, 1, 2))), "2025-01-02");
    assert_eq!(
        TaskRecord::new(3, "file taxes").to_string(),
        "Task #3: file taxes [NORMAL]"
    );
}

#[test]
fn serialization_uses_file_enum_names() {
    let mut record = TaskRecord::new(4, "json");
    record.set_priority(Priority::Urgent);
    record.set_status(TaskStatus::Completed, day(2025, 2, 3));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["priority"], "URGENT");
    assert_eq!(json["status"], "COMPLETED");
    assert_eq!(json["completed_date"], "2025-02-03");
    assert_eq!(json["due_date"], serde_json::Value::Null);

    let decoded: TaskRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}
