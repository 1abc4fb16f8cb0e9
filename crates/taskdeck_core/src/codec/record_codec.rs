//! Task record <-> delimited text line.
//!
//! # Responsibility
//! - Encode one record per line in fixed column order.
//! - Decode one line back into a record, failing that line only.
//!
//! # Invariants
//! - Column order: id, subject, priority, status, start, due, completed.
//! - Absent dates encode as `NULL`; any casing of `NULL` decodes as absent.
//! - Legacy 6-column lines decode with an absent completed date.
//! - Subjects are written verbatim; embedded delimiters are not escaped.
//! - Every column except the subject is trimmed before parsing.
//! - Decode keeps a line as written even when status and completed date
//!   disagree; such lines are only logged at `debug`.

use crate::model::task::{Priority, TaskId, TaskRecord, TaskStatus, FIELD_DELIMITER};
use chrono::NaiveDate;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Serialization token for an absent date.
pub const NULL_TOKEN: &str = "NULL";
/// Date layout used on disk.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Column count written by `encode`.
pub const FIELD_COUNT: usize = 7;
/// Column count of files written before completion dates existed.
pub const LEGACY_FIELD_COUNT: usize = 6;

pub type CodecResult<T> = Result<T, CodecError>;

/// Per-line decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    FieldCount { expected: usize, actual: usize },
    InvalidId(String),
    UnknownPriority(String),
    UnknownStatus(String),
    InvalidDate { column: &'static str, value: String },
    InvalidUtf8,
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount { expected, actual } => {
                write!(f, "expected {expected} fields, found {actual}")
            }
            Self::InvalidId(value) => write!(f, "invalid task id `{value}`"),
            Self::UnknownPriority(value) => write!(f, "unknown priority `{value}`"),
            Self::UnknownStatus(value) => write!(f, "unknown status `{value}`"),
            Self::InvalidDate { column, value } => {
                write!(f, "invalid {column} `{value}`; expected YYYY-MM-DD or NULL")
            }
            Self::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

impl Error for CodecError {}

/// Encodes a record as one line, without a trailing newline.
pub fn encode(record: &TaskRecord) -> String {
    let delimiter = FIELD_DELIMITER.to_string();
    [
        record.id().to_string(),
        record.subject().to_string(),
        record.priority().as_str().to_string(),
        record.status().as_str().to_string(),
        encode_date(record.start_date()),
        encode_date(record.due_date()),
        encode_date(record.completed_date()),
    ]
    .join(delimiter.as_str())
}

/// Decodes one line into a record.
///
/// Accepts 7 columns, or 6 columns from the legacy layout.
pub fn decode(line: &str) -> CodecResult<TaskRecord> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT && fields.len() != LEGACY_FIELD_COUNT {
        return Err(CodecError::FieldCount {
            expected: FIELD_COUNT,
            actual: fields.len(),
        });
    }

    let id: TaskId = fields[0]
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidId(fields[0].to_string()))?;
    let priority = Priority::from_name(fields[2].trim())
        .ok_or_else(|| CodecError::UnknownPriority(fields[2].to_string()))?;
    let status = TaskStatus::from_name(fields[3].trim())
        .ok_or_else(|| CodecError::UnknownStatus(fields[3].to_string()))?;
    let start_date = decode_date(fields[4], "start date")?;
    let due_date = decode_date(fields[5], "due date")?;
    let completed_date = match fields.get(6) {
        Some(value) => decode_date(value, "completed date")?,
        None => None,
    };
    if (status == TaskStatus::Completed) != completed_date.is_some() {
        debug!(
            "event=task_decode module=codec status=inconsistent id={} task_status={} completed_date={}",
            id,
            status,
            completed_date.is_some()
        );
    }

    Ok(TaskRecord::restore(
        id,
        fields[1],
        priority,
        status,
        start_date,
        due_date,
        completed_date,
    ))
}

fn encode_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => NULL_TOKEN.to_string(),
    }
}

fn decode_date(value: &str, column: &'static str) -> CodecResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(NULL_TOKEN) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| CodecError::InvalidDate {
            column,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{decode_date, encode_date, CodecError};
    use chrono::NaiveDate;

    #[test]
    fn null_token_is_case_insensitive_on_read() {
        assert_eq!(decode_date("null", "due date").unwrap(), None);
        assert_eq!(decode_date("Null", "due date").unwrap(), None);
        assert_eq!(encode_date(None), "NULL");
    }

    #[test]
    fn bad_date_names_column() {
        let err = decode_date("2025-13-40", "start date").unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidDate {
                column: "start date",
                value: "2025-13-40".to_string(),
            }
        );
    }

    #[test]
    fn dates_use_iso_layout() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(encode_date(Some(date)), "2025-01-09");
    }
}
