//! Flat-file task persistence.
//!
//! # Responsibility
//! - Read `header + one record per line` files through `record_codec`.
//! - Write the full store back out in drain order, replacing the file.
//!
//! # Invariants
//! - The first line is a header: always skipped on read, never validated.
//! - Blank lines are ignored; other undecodable lines, bad UTF-8 included,
//!   are reported in `LoadReport::rejected` and logged, then skipped.
//! - A line whose id is already loaded is rejected, keeping ids unique.
//! - Saves go to a sibling temp file that is renamed over the target, so a
//!   failed save leaves the previous contents intact.

use crate::codec::record_codec::{self, CodecError};
use crate::logging::sanitize_message;
use crate::model::task::TaskId;
use crate::store::priority_store::PriorityStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const MAX_LOGGED_LINE_CHARS: usize = 120;

pub type RepoResult<T> = Result<T, RepoError>;

/// File-level persistence error.
#[derive(Debug)]
pub enum RepoError {
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

impl RepoError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "failed to {op} `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Why a data line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Malformed(CodecError),
    DuplicateId(TaskId),
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id}"),
        }
    }
}

/// A data line that did not make it into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the file, header included.
    pub line_number: usize,
    pub raw: String,
    pub reason: RejectReason,
}

/// Result of reading a task file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub store: PriorityStore,
    pub rejected: Vec<RejectedLine>,
}

/// Task file at a fixed path.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file into a fresh store, dropping rejected-line details.
    pub fn load(&self) -> RepoResult<PriorityStore> {
        self.load_report().map(|report| report.store)
    }

    /// Loads the file and reports every skipped line.
    ///
    /// # Errors
    /// - Returns `RepoError::Io` when the file exists but cannot be read.
    pub fn load_report(&self) -> RepoResult<LoadReport> {
        let started_at = Instant::now();
        if !self.path.exists() {
            info!(
                "event=task_load module=repo status=ok source=missing_file count=0 rejected=0"
            );
            return Ok(LoadReport::default());
        }

        let report = File::open(&self.path)
            .and_then(|file| read_records(BufReader::new(file)))
            .map_err(|err| {
                error!(
                    "event=task_load module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                RepoError::io("read", &self.path, err)
            })?;

        info!(
            "event=task_load module=repo status=ok count={} rejected={} duration_ms={}",
            report.store.len(),
            report.rejected.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Rewrites the whole file: `header`, then every record in drain order.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    /// - Returns `RepoError::Io` when the temp file cannot be written or
    ///   renamed; the previous file contents are left untouched.
    pub fn save(&self, store: &PriorityStore, header: &str) -> RepoResult<usize> {
        let started_at = Instant::now();
        let tmp_path = temp_path_for(&self.path);

        let result = write_file(&tmp_path, store, header)
            .map_err(|err| RepoError::io("write", &tmp_path, err))
            .and_then(|count| {
                std::fs::rename(&tmp_path, &self.path)
                    .map(|()| count)
                    .map_err(|err| RepoError::io("replace", &self.path, err))
            });

        match result {
            Ok(count) => {
                info!(
                    "event=task_save module=repo status=ok count={} duration_ms={}",
                    count,
                    started_at.elapsed().as_millis()
                );
                Ok(count)
            }
            Err(err) => {
                let _ = std::fs::remove_file(&tmp_path);
                error!(
                    "event=task_save module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Reads header + data lines from any buffered source.
///
/// Only transport errors fail the whole read; bad lines, including lines
/// that are not valid UTF-8, land in `rejected`.
pub fn read_records<R: BufRead>(mut reader: R) -> io::Result<LoadReport> {
    let mut report = LoadReport::default();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;
        if line_number == 1 {
            continue;
        }

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let Ok(raw) = std::str::from_utf8(bytes) else {
            let raw = String::from_utf8_lossy(bytes).into_owned();
            reject(
                &mut report,
                line_number,
                raw,
                RejectReason::Malformed(CodecError::InvalidUtf8),
            );
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }

        let reason = match record_codec::decode(raw) {
            Ok(record) if report.store.contains(record.id()) => {
                RejectReason::DuplicateId(record.id())
            }
            Ok(record) => {
                report.store.insert(record);
                continue;
            }
            Err(err) => RejectReason::Malformed(err),
        };
        reject(&mut report, line_number, raw.to_string(), reason);
    }

    Ok(report)
}

fn reject(report: &mut LoadReport, line_number: usize, raw: String, reason: RejectReason) {
    warn!(
        "event=task_decode module=repo status=error line={} reason=\"{}\" raw=\"{}\"",
        line_number,
        reason,
        sanitize_message(&raw, MAX_LOGGED_LINE_CHARS)
    );
    report.rejected.push(RejectedLine {
        line_number,
        raw,
        reason,
    });
}

/// Writes `header` and the store in drain order, one record per line.
pub fn write_records<W: Write>(
    mut writer: W,
    store: &PriorityStore,
    header: &str,
) -> io::Result<usize> {
    writeln!(writer, "{header}")?;
    let mut count = 0;
    for record in store.drain_in_order() {
        writeln!(writer, "{}", record_codec::encode(&record))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

fn write_file(path: &Path, store: &PriorityStore, header: &str) -> io::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let count = write_records(&mut writer, store, header)?;
    writer.get_ref().sync_all()?;
    Ok(count)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("tasks"),
        std::process::id()
    );
    path.parent()
        .map(|parent| parent.join(&tmp_name))
        .unwrap_or_else(|| PathBuf::from(&tmp_name))
}

#[cfg(test)]
mod tests {
    use super::temp_path_for;
    use std::path::Path;

    #[test]
    fn temp_path_is_a_hidden_sibling() {
        let tmp = temp_path_for(Path::new("/data/tasks.csv"));
        assert_eq!(tmp.parent(), Some(Path::new("/data")));
        let name = tmp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".tasks.csv.tmp-"));
    }
}
