//! Core domain logic for the task board.
//! This crate owns the task collection, its persistence slot and the
//! filtered column views.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;

pub use config::BoardConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::task::{
    format_timestamp, parse_due_date, ParseEnumError, Priority, Task, TaskDraft, TaskId, TaskPatch,
    TaskStatus, TaskValidationError, DUE_DATE_FORMAT,
};
pub use repo::slot_repo::{
    MemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use store::clock::{Clock, FixedClock, SystemClock};
pub use store::codec::{decode_tasks, encode_tasks, SlotDecodeError};
pub use store::drop::{DropEvent, DropOutcome};
pub use store::task_store::{TaskStore, DEFAULT_SLOT_KEY};
pub use view::projector::{
    filter_tasks, format_due_date, is_overdue, project, BoardColumn, BoardQuery, BoardView,
    PriorityFilter, StatusFilter,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
