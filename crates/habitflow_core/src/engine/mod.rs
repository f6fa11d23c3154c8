//! State-and-progression engine.
//!
//! # Responsibility
//! - Apply daily rollover, progression rules and habit mutations to an
//!   explicitly passed `ProgressState`.
//! - Describe every change through `MutationOutcome` instead of calling into
//!   presentation code.
//!
//! # Invariants
//! - Engine functions never persist; the service layer does.
//! - Engine functions never fail; invalid targets are no-ops.

pub mod focus;
pub mod mutation;
pub mod outcome;
pub mod progression;
pub mod rollover;
