//! Core state-and-progression engine for HabitFlow.
//! This crate is the single source of truth for habit and progress invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use engine::outcome::MutationOutcome;
pub use engine::rollover::RolloverOutcome;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::Celebration;
pub use model::habit::{Habit, HabitDraft, HabitId, HabitKind};
pub use model::state::{AchievementRecord, ProgressState, Stats, Theme};
pub use model::timer::{FocusTimer, TickResult};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use service::habit_service::{DayCheck, HabitService};
pub use store::progress_store::{
    ExportArtifact, ImportRejection, LoadSource, LoadedState, ProgressStore, StoreError,
    StoreResult,
};
pub use view::{AchievementStatus, CompletionSummary};

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
