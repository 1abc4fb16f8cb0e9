//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Name the task file and its header line.
//! - Carry logging level/directory for `init_logging_with`.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Default task file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "tasks.csv";
/// Header written as the first line of every saved file.
pub const DEFAULT_HEADER: &str = "ID,Subject,Priority,Status,StartDate,DueDate,CompletedDate";

/// Where and how the task collection is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_file: PathBuf,
    pub header: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

/// Logging settings; `log_dir` must be absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: PathBuf,
}

impl LogConfig {
    /// Uses the build-mode default level.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: log_dir.into(),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}
