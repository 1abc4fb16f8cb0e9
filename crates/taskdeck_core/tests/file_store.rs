use chrono::NaiveDate;
use std::fs;
use taskdeck_core::repo::file_store::{read_records, write_records};
use taskdeck_core::{
    CodecError, FileStore, Priority, PriorityStore, RejectReason, RepoError, TaskRecord,
    TaskStatus, DEFAULT_HEADER,
};

const HEADER: &str = "ID,Subject,Priority,Status,StartDate,DueDate,CompletedDate";

fn day(m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, m, d)
}

fn sample_store() -> PriorityStore {
    vec![
        TaskRecord::restore(1, "Low chore", Priority::Low, TaskStatus::NotStarted, None, None, None),
        TaskRecord::restore(
            2,
            "Finished urgent",
            Priority::Urgent,
            TaskStatus::Completed,
            day(1, 2),
            day(1, 10),
            day(1, 9),
        ),
        TaskRecord::restore(3, "Normal soon", Priority::Normal, TaskStatus::InProgress, None, day(2, 1), None),
        TaskRecord::restore(4, "Normal later", Priority::Normal, TaskStatus::NotStarted, None, None, None),
    ]
    .into_iter()
    .collect()
}

#[test]
fn missing_file_loads_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let file = FileStore::new(dir.path().join("absent.csv"));

    let report = file.load_report().unwrap();
    assert!(report.store.is_empty());
    assert!(report.rejected.is_empty());
}

#[test]
fn save_writes_header_then_sorted_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    let file = FileStore::new(&path);

    let written = file.save(&sample_store(), HEADER).unwrap();
    assert_eq!(written, 4);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "ID,Subject,Priority,Status,StartDate,DueDate,CompletedDate\n\
         3,Normal soon,NORMAL,IN_PROGRESS,NULL,2025-02-01,NULL\n\
         4,Normal later,NORMAL,NOT_STARTED,NULL,NULL,NULL\n\
         1,Low chore,LOW,NOT_STARTED,NULL,NULL,NULL\n\
         2,Finished urgent,URGENT,COMPLETED,2025-01-02,2025-01-10,2025-01-09\n"
    );
}

#[test]
fn save_load_save_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    let file = FileStore::new(&path);

    file.save(&sample_store(), DEFAULT_HEADER).unwrap();
    let first = fs::read(&path).unwrap();

    let reloaded = file.load().unwrap();
    assert_eq!(reloaded.len(), 4);
    file.save(&reloaded, DEFAULT_HEADER).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn malformed_line_is_skipped_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    fs::write(
        &path,
        "header\n\
         1,Good one,HIGH,NOT_STARTED,NULL,NULL,NULL\n\
         2,Bad one,CRITICAL,NOT_STARTED,NULL,NULL,NULL\n\
         3,Good two,LOW,IN_PROGRESS,2025-01-01,NULL,NULL\n",
    )
    .unwrap();

    let report = FileStore::new(&path).load_report().unwrap();
    assert_eq!(report.store.len(), 2);
    assert!(report.store.contains(1));
    assert!(report.store.contains(3));
    assert!(!report.store.contains(2));

    assert_eq!(report.rejected.len(), 1);
    let rejected = &report.rejected[0];
    assert_eq!(rejected.line_number, 3);
    assert_eq!(rejected.raw, "2,Bad one,CRITICAL,NOT_STARTED,NULL,NULL,NULL");
    assert_eq!(
        rejected.reason,
        RejectReason::Malformed(CodecError::UnknownPriority("CRITICAL".to_string()))
    );
}

#[test]
fn header_is_always_skipped_blank_lines_ignored_and_crlf_stripped() {
    let input = "1,Looks like data,HIGH,NOT_STARTED,NULL,NULL,NULL\r\n\
                 \r\n\
                 2,Real,HIGH,NOT_STARTED,NULL,2025-03-03,NULL\r\n\
                 \n   \n";

    let report = read_records(input.as_bytes()).unwrap();
    assert_eq!(report.store.len(), 1);
    assert!(report.rejected.is_empty());
    let record = report.store.get(2).unwrap();
    assert_eq!(record.due_date(), day(3, 3));
    assert_eq!(record.completed_date(), None);
}

#[test]
fn non_utf8_line_is_rejected_without_failing_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    let mut bytes = b"header\n1,First,HIGH,NOT_STARTED,NULL,NULL,NULL\n".to_vec();
    bytes.extend_from_slice(b"2,Bro\xffken,LOW,NOT_STARTED,NULL,NULL,NULL\r\n");
    bytes.extend_from_slice(b"3,Third,LOW,NOT_STARTED,NULL,NULL,NULL");
    fs::write(&path, bytes).unwrap();

    let report = FileStore::new(&path).load_report().unwrap();
    assert_eq!(report.store.len(), 2);
    assert!(report.store.contains(1));
    assert!(report.store.contains(3));

    assert_eq!(report.rejected.len(), 1);
    let rejected = &report.rejected[0];
    assert_eq!(rejected.line_number, 3);
    assert_eq!(
        rejected.reason,
        RejectReason::Malformed(CodecError::InvalidUtf8)
    );
    assert!(rejected.raw.starts_with("2,Bro"));
    assert!(!rejected.raw.ends_with('\r'));
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let input = "header\n\
                 5,First,LOW,NOT_STARTED,NULL,NULL,NULL\n\
                 5,Second,URGENT,NOT_STARTED,NULL,NULL,NULL\n";

    let report = read_records(input.as_bytes()).unwrap();
    assert_eq!(report.store.len(), 1);
    assert_eq!(report.store.get(5).unwrap().subject(), "First");
    assert_eq!(report.rejected[0].reason, RejectReason::DuplicateId(5));
}

#[test]
fn legacy_six_column_file_loads() {
    let input = "ID,Subject,Priority,Status,StartDate,DueDate\n\
                 1,Old,NORMAL,COMPLETED,NULL,NULL\n";

    let report = read_records(input.as_bytes()).unwrap();
    assert_eq!(report.store.len(), 1);
    assert!(report.rejected.is_empty());
}

#[test]
fn write_records_uses_drain_order() {
    let mut out = Vec::new();
    let count = write_records(&mut out, &sample_store(), "H").unwrap();

    let text = String::from_utf8(out).unwrap();
    let ids: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(count, 4);
    assert_eq!(ids, vec!["3", "4", "1", "2"]);
}

#[test]
fn empty_store_saves_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tasks.csv");

    FileStore::new(&path).save(&PriorityStore::new(), HEADER).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), format!("{HEADER}\n"));
}

#[test]
fn unreadable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = FileStore::new(dir.path()).load_report().unwrap_err();
    assert!(matches!(err, RepoError::Io { op: "read", .. }));
}

#[test]
fn failed_save_keeps_target_and_cleans_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("tasks.csv");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep.txt"), "previous").unwrap();

    let err = FileStore::new(&target)
        .save(&sample_store(), HEADER)
        .unwrap_err();
    assert!(matches!(err, RepoError::Io { op: "replace", .. }));

    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "previous");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}
