//! Daily rollover: date-boundary detection, streak continuation and reset.
//!
//! # Responsibility
//! - Compare the anchor date with the local "today".
//! - Apply the single streak adjustment and per-habit reset on a crossing.
//!
//! # Invariants
//! - A crossing is applied at most once per anchor change.
//! - Productivity is judged on stored progress of every habit, scheduled
//!   today or not.
//! - A gap of several days still applies one check and one adjustment.

use crate::model::state::ProgressState;
use chrono::NaiveDate;
use log::info;

/// What a rollover check did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// Anchor was unset and is now `today`. Nothing else changed.
    Initialized,
    /// Anchor already equals `today`.
    Unchanged,
    /// A date boundary was crossed; progress was reset.
    RolledOver {
        productive: bool,
        previous_streak: u32,
        streak: u32,
    },
}

impl RolloverOutcome {
    /// Returns whether the state changed and must be persisted.
    pub fn changed_state(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Returns whether any habit satisfies its completion predicate.
pub fn was_productive(state: &ProgressState) -> bool {
    state.habits.iter().any(|habit| habit.is_completed())
}

/// Applies the daily rollover for `today`.
///
/// Achievement re-evaluation and persistence are left to the caller.
pub fn apply_rollover(state: &mut ProgressState, today: NaiveDate) -> RolloverOutcome {
    let Some(anchor) = state.anchor_date else {
        state.anchor_date = Some(today);
        info!("event=rollover module=engine status=initialized anchor={today}");
        return RolloverOutcome::Initialized;
    };

    if anchor == today {
        return RolloverOutcome::Unchanged;
    }

    let productive = was_productive(state);
    let previous_streak = state.streak;
    state.streak = if productive {
        previous_streak.saturating_add(1)
    } else {
        0
    };
    state.reset_all_progress();
    state.anchor_date = Some(today);

    info!(
        "event=rollover module=engine status=ok from={anchor} to={today} productive={productive} streak={}",
        state.streak
    );
    RolloverOutcome::RolledOver {
        productive,
        previous_streak,
        streak: state.streak,
    }
}
