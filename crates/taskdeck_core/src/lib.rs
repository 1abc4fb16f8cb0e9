//! Core domain logic for taskdeck.
//! This crate is the single source of truth for task ordering and persistence.

pub mod clock;
pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::record_codec::{decode, encode, CodecError, CodecResult, NULL_TOKEN};
pub use config::{LogConfig, StoreConfig, DEFAULT_DATA_FILE, DEFAULT_HEADER};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingError,
};
pub use model::ordering::{compare, priority_rank};
pub use model::task::{
    display_date, Priority, TaskDraft, TaskId, TaskRecord, TaskStatus, TaskValidationError,
};
pub use repo::file_store::{
    FileStore, LoadReport, RejectReason, RejectedLine, RepoError, RepoResult,
};
pub use service::task_service::{
    ServiceError, ServiceResult, TaskFilter, TaskService, TaskStats,
};
pub use store::priority_store::{DrainInOrder, PriorityStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
