//! Read-only projections consumed by the presentation layer.
//!
//! # Responsibility
//! - Select today's habits (schedule + category filter).
//! - Summarize today's completion and the achievement board.
//!
//! # Invariants
//! - Views borrow the state; they never mutate it.

use crate::engine::progression::achievement_definitions;
use crate::model::habit::{Habit, WeekdayIndex};
use crate::model::state::{ProgressState, FILTER_ALL};

/// Today's completion figures over the filtered habit list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionSummary {
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage, `0` when `total == 0`.
    pub percentage: u8,
}

/// One achievement as shown on the trophy board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
    pub unlocked_at_ms: Option<i64>,
}

/// Returns habits scheduled on `weekday` that match the current filter.
pub fn today_habits(state: &ProgressState, weekday: WeekdayIndex) -> Vec<&Habit> {
    state
        .habits
        .iter()
        .filter(|habit| habit.is_scheduled_on(weekday))
        .filter(|habit| matches_filter(habit, &state.current_filter))
        .collect()
}

/// Returns completion figures for `today_habits`.
pub fn today_completion(state: &ProgressState, weekday: WeekdayIndex) -> CompletionSummary {
    let habits = today_habits(state, weekday);
    let total = habits.len();
    let completed = habits.iter().filter(|habit| habit.is_completed()).count();
    let percentage = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    };

    CompletionSummary {
        completed,
        total,
        percentage,
    }
}

/// Returns every achievement definition with its unlock status.
pub fn achievement_board(state: &ProgressState) -> Vec<AchievementStatus> {
    achievement_definitions()
        .iter()
        .map(|definition| {
            let record = state
                .achievements
                .get(definition.id)
                .filter(|record| record.unlocked);
            AchievementStatus {
                id: definition.id,
                icon: definition.icon,
                title: definition.title,
                description: definition.description,
                unlocked: record.is_some(),
                unlocked_at_ms: record.and_then(|record| record.unlocked_at_ms),
            }
        })
        .collect()
}

fn matches_filter(habit: &Habit, filter: &str) -> bool {
    filter == FILTER_ALL || habit.category == filter
}
