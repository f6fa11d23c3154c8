//! Progress persistence.
//!
//! # Responsibility
//! - Own load/normalize/save of the single progress record.
//! - Keep record defaulting pure and separately testable.

pub mod normalize;
pub mod progress_store;
