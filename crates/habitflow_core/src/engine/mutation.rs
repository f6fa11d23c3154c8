//! Habit mutation operations over an explicitly passed state.
//!
//! # Responsibility
//! - Change habit progress and the habit list.
//! - Award experience and completion stats on upward completion crossings.
//!
//! # Invariants
//! - `0 <= count <= goal` after every count change.
//! - One award per upward crossing; undoing never removes xp or stats.
//! - Unknown ids and wrong-kind calls are silent no-ops.
//!
//! Persistence is the caller's job; see `service::habit_service`.

use crate::engine::outcome::MutationOutcome;
use crate::engine::progression::{gain_xp, record_completion};
use crate::model::event::Celebration;
use crate::model::habit::{generate_habit_id, Habit, HabitDraft, HabitId, HabitKind};
use crate::model::state::{ProgressState, Theme, FILTER_ALL};
use log::{debug, info};

/// Experience for reaching a count goal.
pub const COUNT_COMPLETION_XP: u64 = 10;
/// Experience for checking off a binary habit.
pub const BINARY_COMPLETION_XP: u64 = 15;

/// Moves a count habit by `delta`, clamped to `[0, goal]`.
pub fn adjust_count(
    state: &mut ProgressState,
    habit_id: &str,
    delta: i64,
    now_ms: i64,
) -> MutationOutcome {
    let Some(habit) = count_habit_mut(state, habit_id) else {
        return noop("adjust_count", habit_id);
    };

    let was_completed = habit.is_completed();
    let next = i64::from(habit.count)
        .saturating_add(delta)
        .clamp(0, i64::from(habit.goal));
    habit.count = next as u32;
    let crossed = !was_completed && habit.is_completed();
    let display = (habit.emoji.clone(), habit.name.clone());

    let mut outcome = MutationOutcome::applied();
    if crossed {
        reward_completion(
            state,
            &mut outcome,
            COUNT_COMPLETION_XP,
            count_celebration(&display.0, &display.1),
            now_ms,
        );
    }
    outcome
}

/// Flips a binary habit; a false-to-true flip is rewarded.
pub fn toggle_binary(state: &mut ProgressState, habit_id: &str, now_ms: i64) -> MutationOutcome {
    let Some(habit) = state
        .habit_mut(habit_id)
        .filter(|habit| habit.kind == HabitKind::Binary)
    else {
        return noop("toggle_binary", habit_id);
    };

    habit.done = !habit.done;
    let completed = habit.done;
    let celebration = Celebration::new(
        habit.emoji.clone(),
        "Great job!",
        format!("{} completed.", habit.name),
    );

    let mut outcome = MutationOutcome::applied();
    if completed {
        reward_completion(
            state,
            &mut outcome,
            BINARY_COMPLETION_XP,
            celebration,
            now_ms,
        );
    }
    outcome
}

/// Completes a count habit in one step, or resets it when already complete.
pub fn toggle_count(state: &mut ProgressState, habit_id: &str, now_ms: i64) -> MutationOutcome {
    let Some(habit) = count_habit_mut(state, habit_id) else {
        return noop("toggle_count", habit_id);
    };

    if habit.is_completed() {
        habit.count = 0;
        return MutationOutcome::applied();
    }

    habit.count = habit.goal;
    let celebration = count_celebration(&habit.emoji, &habit.name);
    let mut outcome = MutationOutcome::applied();
    reward_completion(
        state,
        &mut outcome,
        COUNT_COMPLETION_XP,
        celebration,
        now_ms,
    );
    outcome
}

/// Complete/undo entry point dispatching on the habit kind.
pub fn toggle(state: &mut ProgressState, habit_id: &str, now_ms: i64) -> MutationOutcome {
    match state.habit(habit_id).map(|habit| habit.kind) {
        Some(HabitKind::Count) => toggle_count(state, habit_id, now_ms),
        Some(HabitKind::Binary) => toggle_binary(state, habit_id, now_ms),
        None => noop("toggle", habit_id),
    }
}

/// Appends a normalized habit with a fresh id.
pub fn add_habit(state: &mut ProgressState, draft: HabitDraft) -> HabitId {
    let mut habit = draft.into_habit();
    while state.contains_habit(&habit.id) {
        habit.id = generate_habit_id();
    }

    let id = habit.id.clone();
    info!(
        "event=habit_add module=engine status=ok habit_id={id} kind={} goal={}",
        habit.kind.as_str(),
        habit.goal
    );
    state.habits.push(habit);
    id
}

/// Removes a habit by id. Absent ids are not an error.
pub fn remove_habit(state: &mut ProgressState, habit_id: &str) -> MutationOutcome {
    let before = state.habits.len();
    state.habits.retain(|habit| habit.id != habit_id);
    if state.habits.len() == before {
        return noop("remove_habit", habit_id);
    }

    info!("event=habit_remove module=engine status=ok habit_id={habit_id}");
    MutationOutcome::applied()
}

/// Clears today's progress and rearms the focus timer.
///
/// `streak`, `xp` and `stats` are untouched.
pub fn reset_today(state: &mut ProgressState) -> MutationOutcome {
    state.timer.reset();
    state.reset_all_progress();
    info!(
        "event=reset_today module=engine status=ok habits={}",
        state.habits.len()
    );
    MutationOutcome::applied()
}

/// Switches between light and dark theme.
pub fn toggle_theme(state: &mut ProgressState) -> Theme {
    state.theme = state.theme.toggled();
    state.theme
}

/// Selects the category filter; blank input selects every category.
pub fn set_filter(state: &mut ProgressState, filter: &str) {
    state.current_filter = match filter.trim() {
        "" => FILTER_ALL.to_string(),
        value => value.to_string(),
    };
}

fn count_habit_mut<'s>(
    state: &'s mut ProgressState,
    habit_id: &str,
) -> Option<&'s mut Habit> {
    state
        .habit_mut(habit_id)
        .filter(|habit| habit.kind == HabitKind::Count)
}

fn count_celebration(emoji: &str, name: &str) -> Celebration {
    Celebration::new(emoji, "Completed!", format!("{name} is done for today."))
}

fn reward_completion(
    state: &mut ProgressState,
    outcome: &mut MutationOutcome,
    xp: u64,
    celebration: Celebration,
    now_ms: i64,
) {
    outcome.absorb_xp(gain_xp(state, xp, now_ms));
    outcome.absorb_unlocks(record_completion(state, now_ms));
    outcome.celebrate(celebration);
    info!(
        "event=habit_complete module=engine status=ok xp={} completions={}",
        state.xp, state.stats.completions
    );
}

fn noop(operation: &str, habit_id: &str) -> MutationOutcome {
    debug!("event={operation} module=engine status=noop habit_id={habit_id}");
    MutationOutcome::noop()
}
