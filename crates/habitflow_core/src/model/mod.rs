//! Domain model for habits and gamified progress.
//!
//! # Responsibility
//! - Define canonical data structures used by engine and store logic.
//! - Keep the persisted shape compatible with exported records.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - `ProgressState` is the only root aggregate; views borrow from it.

pub mod event;
pub mod habit;
pub mod state;
pub mod timer;
