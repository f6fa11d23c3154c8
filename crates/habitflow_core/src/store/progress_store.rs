//! Progress store: load, save, export and import of the root aggregate.
//!
//! # Responsibility
//! - Own the serialize/deserialize contract for `ProgressState`.
//! - Seed a fresh state on first run and recover from malformed records.
//! - Validate and merge imported records.
//!
//! # Invariants
//! - Malformed persisted bytes are treated as absent data, never surfaced.
//! - Written records always carry `timerRunning = false`.
//! - A rejected import leaves persisted and in-memory state untouched.

use crate::model::state::ProgressState;
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use crate::store::normalize::{normalize_record, DATE_FORMAT};
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used for the single persisted record.
pub const DEFAULT_STORAGE_KEY: &str = "habitflow-simple";

pub type StoreResult<T> = Result<T, StoreError>;

/// Why an imported record was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportRejection {
    /// Input is not parseable JSON.
    InvalidJson,
    /// Input parsed but is not a JSON object.
    NotAnObject,
    /// `habits` is missing or not an array.
    HabitsNotASequence,
}

impl Display for ImportRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson => write!(f, "import is not valid JSON"),
            Self::NotAnObject => write!(f, "import is not a JSON object"),
            Self::HabitsNotASequence => write!(f, "import `habits` is not an array"),
        }
    }
}

/// Store-level error for persistence and import use-cases.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Serialize(serde_json::Error),
    ImportRejected(ImportRejection),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize progress record: {err}"),
            Self::ImportRejected(reason) => write!(f, "import rejected: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::ImportRejected(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// No record existed; default habits were seeded.
    Fresh,
    /// A record existed and was normalized.
    Persisted,
    /// A record existed but could not be parsed; default habits were seeded.
    Recovered,
}

/// Result envelope of `ProgressStore::load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub state: ProgressState,
    pub source: LoadSource,
}

/// Downloadable export of the persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `habitflow-<YYYY-MM-DD>.json`
    pub file_name: String,
    /// Pretty-printed JSON record.
    pub contents: String,
}

/// Progress store over a key-value repository.
pub struct ProgressStore<S: KeyValueStore> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Creates a store using `DEFAULT_STORAGE_KEY`.
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads and normalizes persisted state.
    ///
    /// # Side effects
    /// - Persists a freshly seeded state when no usable record exists.
    ///
    /// # Errors
    /// - Returns repository errors only; malformed data never fails.
    pub fn load(&self, today: NaiveDate) -> StoreResult<LoadedState> {
        let raw = self.kv.get(&self.key)?;
        let parsed = raw
            .as_deref()
            .map(|record| serde_json::from_str::<Value>(record));

        let (state, source) = match parsed {
            Some(Ok(value)) if value.is_object() => {
                (normalize_record(&value), LoadSource::Persisted)
            }
            Some(_) => {
                warn!(
                    "event=state_load module=store status=recovered reason=malformed_record key={}",
                    self.key
                );
                (ProgressState::fresh(today), LoadSource::Recovered)
            }
            None => (ProgressState::fresh(today), LoadSource::Fresh),
        };

        if source != LoadSource::Persisted {
            self.save(&state)?;
        }

        info!(
            "event=state_load module=store status=ok source={source:?} habits={} xp={} streak={}",
            state.habits.len(),
            state.xp,
            state.streak
        );
        Ok(LoadedState { state, source })
    }

    /// Writes the full state with volatile timer fields forced inert.
    pub fn save(&self, state: &ProgressState) -> StoreResult<()> {
        let record = serde_json::to_string(&state.to_persisted())?;
        self.kv.set(&self.key, &record)?;
        Ok(())
    }

    /// Produces the downloadable export for `state`.
    ///
    /// The file name uses the anchor date, or `today` when unanchored.
    pub fn export(&self, state: &ProgressState, today: NaiveDate) -> StoreResult<ExportArtifact> {
        let date = state.anchor_date.unwrap_or(today);
        let contents = serde_json::to_string_pretty(&state.to_persisted())?;
        Ok(ExportArtifact {
            file_name: format!("habitflow-{}.json", date.format(DATE_FORMAT)),
            contents,
        })
    }

    /// Validates `raw`, merges it over `current` and persists the result.
    ///
    /// # Contract
    /// - Top-level fields absent from `raw` keep their values from `current`.
    /// - `level` is recomputed from the imported `xp`.
    /// - `date` defaults to `today` when absent or unparseable.
    /// - The focus timer is stopped.
    ///
    /// # Errors
    /// - `StoreError::ImportRejected` when `raw` is not an object with a
    ///   `habits` array; nothing is written in that case.
    pub fn import(
        &self,
        current: &ProgressState,
        raw: &str,
        today: NaiveDate,
    ) -> StoreResult<ProgressState> {
        let imported = validate_import(raw).map_err(|reason| {
            warn!("event=state_import module=store status=rejected reason={reason:?}");
            StoreError::ImportRejected(reason)
        })?;

        let mut merged = match serde_json::to_value(current.to_persisted())? {
            Value::Object(record) => record,
            _ => serde_json::Map::new(),
        };
        merged.extend(imported);

        let mut state = normalize_record(&Value::Object(merged));
        if state.anchor_date.is_none() {
            state.anchor_date = Some(today);
        }
        state.timer.stop();

        self.save(&state)?;
        info!(
            "event=state_import module=store status=ok habits={} xp={} level={}",
            state.habits.len(),
            state.xp,
            state.level
        );
        Ok(state)
    }

    /// Deletes the persisted record; the next load seeds a fresh state.
    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(&self.key)?;
        info!("event=state_clear module=store status=ok key={}", self.key);
        Ok(())
    }
}

fn validate_import(raw: &str) -> Result<serde_json::Map<String, Value>, ImportRejection> {
    let value: Value = serde_json::from_str(raw).map_err(|_| ImportRejection::InvalidJson)?;
    let Value::Object(record) = value else {
        return Err(ImportRejection::NotAnObject);
    };
    if !record.get("habits").is_some_and(Value::is_array) {
        return Err(ImportRejection::HabitsNotASequence);
    }
    Ok(record)
}
