//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record persisted inside `ProgressState`.
//! - Provide the per-day scheduling and completion predicates.
//! - Normalize user-entered drafts into valid habits.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `goal >= 1` and `0 <= count <= goal`.
//! - `count` and `done` both persist regardless of `kind`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier for a habit (`h1`, `h2`, ... for seeded habits).
pub type HabitId = String;

/// Weekday index, `0 = Sunday` through `6 = Saturday`.
pub type WeekdayIndex = u8;

/// Emoji used when a draft does not provide one.
pub const DEFAULT_HABIT_EMOJI: &str = "📝";
/// Smallest accepted goal value.
pub const MIN_GOAL: u32 = 1;

const DAYS_PER_WEEK: WeekdayIndex = 7;

/// How progress is tracked for one habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    /// Numeric progress toward `goal`.
    Count,
    /// Done / not-done.
    Binary,
}

impl HabitKind {
    /// Returns the persisted wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Binary => "binary",
        }
    }

    /// Parses a persisted wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "count" => Some(Self::Count),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

/// Recurring task definition plus today's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub emoji: String,
    pub name: String,
    /// Serialized as `type` to stay compatible with exported records.
    #[serde(rename = "type")]
    pub kind: HabitKind,
    pub goal: u32,
    /// Serialized as `days`.
    #[serde(rename = "days")]
    pub scheduled_days: BTreeSet<WeekdayIndex>,
    pub category: String,
    pub count: u32,
    pub done: bool,
}

impl Habit {
    /// Returns whether this habit is active on `weekday`.
    ///
    /// Out-of-range weekdays are never scheduled.
    pub fn is_scheduled_on(&self, weekday: WeekdayIndex) -> bool {
        weekday < DAYS_PER_WEEK && self.scheduled_days.contains(&weekday)
    }

    /// Returns whether today's progress satisfies this habit.
    pub fn is_completed(&self) -> bool {
        match self.kind {
            HabitKind::Count => self.count >= self.goal,
            HabitKind::Binary => self.done,
        }
    }

    /// Returns today's progress as a whole percentage in `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        match self.kind {
            HabitKind::Count => {
                let goal = u64::from(self.goal.max(MIN_GOAL));
                let percent = (u64::from(self.count) * 100 / goal).min(100);
                percent as u8
            }
            HabitKind::Binary => {
                if self.done {
                    100
                } else {
                    0
                }
            }
        }
    }

    /// Clears today's progress (`count = 0`, `done = false`).
    pub fn reset_progress(&mut self) {
        self.count = 0;
        self.done = false;
    }
}

/// User-entered habit definition before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
    pub emoji: String,
    pub kind: HabitKind,
    pub category: String,
    /// Raw goal input; missing or non-positive values fall back to `MIN_GOAL`.
    pub goal: Option<i64>,
    /// Empty means every day.
    pub days: Vec<i64>,
}

impl HabitDraft {
    /// Builds a normalized habit with a freshly generated id.
    pub fn into_habit(self) -> Habit {
        self.into_habit_with_id(generate_habit_id())
    }

    /// Builds a normalized habit with a caller-provided id.
    pub fn into_habit_with_id(self, id: HabitId) -> Habit {
        let emoji = match self.emoji.trim() {
            "" => DEFAULT_HABIT_EMOJI.to_string(),
            value => value.to_string(),
        };
        let goal = match self.kind {
            HabitKind::Count => normalize_goal(self.goal),
            HabitKind::Binary => MIN_GOAL,
        };
        let mut scheduled_days = normalize_days(self.days);
        if scheduled_days.is_empty() {
            scheduled_days = every_day();
        }

        Habit {
            id,
            emoji,
            name: self.name.trim().to_string(),
            kind: self.kind,
            goal,
            scheduled_days,
            category: self.category.trim().to_string(),
            count: 0,
            done: false,
        }
    }
}

/// Generates a new unique habit id.
pub fn generate_habit_id() -> HabitId {
    format!("h{}", Uuid::new_v4().simple())
}

/// Returns the full Sunday..Saturday schedule.
pub fn every_day() -> BTreeSet<WeekdayIndex> {
    (0..DAYS_PER_WEEK).collect()
}

/// Clamps raw goal input to a valid goal.
pub fn normalize_goal(raw: Option<i64>) -> u32 {
    match raw {
        Some(value) if value >= i64::from(MIN_GOAL) => u32::try_from(value).unwrap_or(u32::MAX),
        _ => MIN_GOAL,
    }
}

/// Keeps only valid weekday indices.
pub fn normalize_days(raw: impl IntoIterator<Item = i64>) -> BTreeSet<WeekdayIndex> {
    raw.into_iter()
        .filter(|day| (0..i64::from(DAYS_PER_WEEK)).contains(day))
        .map(|day| day as WeekdayIndex)
        .collect()
}

/// Returns the fixed habit list seeded on first run.
pub fn default_habits() -> Vec<Habit> {
    const WEEKDAYS: &[WeekdayIndex] = &[1, 2, 3, 4, 5];
    const ALL: &[WeekdayIndex] = &[0, 1, 2, 3, 4, 5, 6];

    let seed = |id: &str,
                emoji: &str,
                name: &str,
                kind: HabitKind,
                goal: u32,
                days: &[WeekdayIndex],
                category: &str| Habit {
        id: id.to_string(),
        emoji: emoji.to_string(),
        name: name.to_string(),
        kind,
        goal,
        scheduled_days: days.iter().copied().collect(),
        category: category.to_string(),
        count: 0,
        done: false,
    };

    vec![
        seed("h1", "💧", "Drink Water", HabitKind::Count, 8, ALL, "health"),
        seed("h2", "🧠", "Deep Work", HabitKind::Count, 4, WEEKDAYS, "work"),
        seed("h3", "🧘", "Meditate", HabitKind::Binary, 1, ALL, "mindfulness"),
        seed("h4", "🚶", "Walk 30 Minutes", HabitKind::Binary, 1, ALL, "health"),
        seed("h5", "🏋️", "Workout", HabitKind::Binary, 1, &[1, 3, 5], "health"),
        seed("h6", "📚", "Read 20 Pages", HabitKind::Count, 20, ALL, "learning"),
        seed(
            "h7",
            "💻",
            "Learn / Practice Coding",
            HabitKind::Count,
            2,
            WEEKDAYS,
            "learning",
        ),
        seed("h8", "📝", "Journal", HabitKind::Binary, 1, ALL, "mindfulness"),
        seed("h9", "🛌", "Sleep 7+ Hours", HabitKind::Binary, 1, ALL, "health"),
        seed("h10", "👣", "Steps", HabitKind::Count, 8000, ALL, "health"),
        seed("h11", "🧎", "Stretch", HabitKind::Binary, 1, ALL, "health"),
    ]
}
