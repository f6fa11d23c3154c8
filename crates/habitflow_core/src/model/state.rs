//! Progress state aggregate.
//!
//! # Responsibility
//! - Define the single root aggregate owned by the progress store.
//! - Define the persisted wire shape (field names match exported records).
//!
//! # Invariants
//! - `level == level_for_xp(xp)` after every engine operation.
//! - An unlocked achievement record is never re-locked.
//! - `stats` counters only grow, except when a record is imported.

use crate::model::habit::{default_habits, Habit, HabitId};
use crate::model::timer::FocusTimer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Experience needed per level.
pub const XP_PER_LEVEL: u64 = 100;
/// Category filter value that matches every habit.
pub const FILTER_ALL: &str = "all";

/// Returns the level derived from total experience.
pub fn level_for_xp(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// Colour scheme selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Lifetime counters referenced by achievement rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub completions: u64,
    pub focus_sessions: u64,
}

/// Unlock record for one achievement id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub unlocked: bool,
    /// Unix epoch milliseconds of the unlock, serialized as `at`.
    #[serde(rename = "at")]
    pub unlocked_at_ms: Option<i64>,
}

/// Root aggregate for habits and gamified progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub habits: Vec<Habit>,
    pub xp: u64,
    pub level: u64,
    pub streak: u32,
    /// Local calendar day the daily state belongs to, serialized as `date`.
    #[serde(rename = "date")]
    pub anchor_date: Option<NaiveDate>,
    pub achievements: BTreeMap<String, AchievementRecord>,
    pub stats: Stats,
    pub theme: Theme,
    pub current_filter: String,
    #[serde(flatten)]
    pub timer: FocusTimer,
}

impl Default for ProgressState {
    /// Empty template used as the base for field-by-field defaulting.
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            xp: 0,
            level: level_for_xp(0),
            streak: 0,
            anchor_date: None,
            achievements: BTreeMap::new(),
            stats: Stats::default(),
            theme: Theme::default(),
            current_filter: FILTER_ALL.to_string(),
            timer: FocusTimer::default(),
        }
    }
}

impl ProgressState {
    /// Creates the first-run state: default habits anchored at `today`.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            habits: default_habits(),
            anchor_date: Some(today),
            ..Self::default()
        }
    }

    /// Recomputes the derived level from `xp`.
    pub fn recompute_level(&mut self) {
        self.level = level_for_xp(self.xp);
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn habit_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|habit| habit.id == id)
    }

    pub fn contains_habit(&self, id: &HabitId) -> bool {
        self.habit(id).is_some()
    }

    pub fn is_achievement_unlocked(&self, id: &str) -> bool {
        self.achievements
            .get(id)
            .is_some_and(|record| record.unlocked)
    }

    /// Clears today's progress on every habit, regardless of schedule.
    pub fn reset_all_progress(&mut self) {
        self.habits.iter_mut().for_each(Habit::reset_progress);
    }

    /// Returns a copy safe for persistence: volatile timer state forced inert.
    pub fn to_persisted(&self) -> Self {
        let mut persisted = self.clone();
        persisted.timer.stop();
        persisted
    }
}
