//! Versioned defaulting for persisted and imported progress records.
//!
//! # Responsibility
//! - Turn a possibly partial, externally sourced JSON record into a complete
//!   and valid `ProgressState`.
//! - Keep the transform pure so older or hand-edited records can be tested in
//!   isolation.
//!
//! # Invariants
//! - Never fails: every missing or mistyped field falls back to the template.
//! - The derived `level` is always recomputed from `xp`.
//! - Habit ids in the result are unique; later duplicates are dropped.

use crate::model::habit::{
    every_day, normalize_days, Habit, HabitKind, DEFAULT_HABIT_EMOJI, MIN_GOAL,
};
use crate::model::state::{AchievementRecord, ProgressState, Stats, Theme};
use crate::model::timer::FocusTimer;
use chrono::NaiveDate;
use log::warn;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Wire format for `date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalizes any JSON value into a complete progress state.
///
/// Non-object input yields the empty template.
pub fn normalize_record(value: &Value) -> ProgressState {
    match value.as_object() {
        Some(record) => normalize_object(record),
        None => {
            warn!("event=state_normalize module=store status=fallback reason=not_an_object");
            ProgressState::default()
        }
    }
}

fn normalize_object(record: &Map<String, Value>) -> ProgressState {
    let template = ProgressState::default();

    let xp = read_count(record.get("xp")).unwrap_or(template.xp);
    let mut state = ProgressState {
        habits: normalize_habits(record.get("habits")),
        xp,
        level: template.level,
        streak: read_count(record.get("streak")).map_or(template.streak, saturate_u32),
        anchor_date: record
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_date),
        achievements: normalize_achievements(record.get("achievements")),
        stats: normalize_stats(record.get("stats")),
        theme: record
            .get("theme")
            .and_then(Value::as_str)
            .and_then(Theme::parse)
            .unwrap_or(template.theme),
        current_filter: record
            .get("currentFilter")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or(template.current_filter, str::to_string),
        timer: FocusTimer {
            remaining_secs: read_count(record.get("timerSeconds"))
                .map_or(template.timer.remaining_secs, saturate_u32),
            running: false,
        },
    };
    state.recompute_level();
    state
}

/// Parses a `YYYY-MM-DD` anchor date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn normalize_habits(value: Option<&Value>) -> Vec<Habit> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut habits = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match normalize_habit(item) {
            Some(habit) if seen.insert(habit.id.clone()) => habits.push(habit),
            Some(habit) => {
                warn!(
                    "event=state_normalize module=store status=dropped reason=duplicate_habit_id index={index} habit_id={}",
                    habit.id
                );
            }
            None => {
                warn!(
                    "event=state_normalize module=store status=dropped reason=malformed_habit index={index}"
                );
            }
        }
    }
    habits
}

fn normalize_habit(value: &Value) -> Option<Habit> {
    let record = value.as_object()?;
    let id = match record.get("id")? {
        Value::String(id) if !id.trim().is_empty() => id.trim().to_string(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };

    let kind = record
        .get("type")
        .and_then(Value::as_str)
        .and_then(HabitKind::parse)
        .unwrap_or(HabitKind::Binary);
    let goal = read_count(record.get("goal"))
        .map_or(MIN_GOAL, saturate_u32)
        .max(MIN_GOAL);
    let scheduled_days = match record.get("days").and_then(Value::as_array) {
        Some(days) => normalize_days(days.iter().filter_map(Value::as_i64)),
        None => every_day(),
    };
    let count = read_count(record.get("count"))
        .map_or(0, saturate_u32)
        .min(goal);

    Some(Habit {
        id,
        emoji: read_string(record, "emoji").unwrap_or_else(|| DEFAULT_HABIT_EMOJI.to_string()),
        name: read_string(record, "name").unwrap_or_default(),
        kind,
        goal,
        scheduled_days,
        category: read_string(record, "category").unwrap_or_default(),
        count,
        done: record.get("done").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn normalize_achievements(value: Option<&Value>) -> BTreeMap<String, AchievementRecord> {
    let Some(entries) = value.and_then(Value::as_object) else {
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(id, entry)| {
            let entry = entry.as_object()?;
            let record = AchievementRecord {
                unlocked: entry
                    .get("unlocked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                unlocked_at_ms: entry.get("at").and_then(Value::as_i64),
            };
            Some((id.clone(), record))
        })
        .collect()
}

fn normalize_stats(value: Option<&Value>) -> Stats {
    let Some(stats) = value.and_then(Value::as_object) else {
        return Stats::default();
    };

    Stats {
        completions: read_count(stats.get("completions")).unwrap_or(0),
        focus_sessions: read_count(stats.get("focusSessions")).unwrap_or(0),
    }
}

/// Reads a non-negative integer counter.
///
/// Negative numbers clamp to zero, fractional numbers are floored and
/// non-numeric values yield `None`.
fn read_count(value: Option<&Value>) -> Option<u64> {
    let Value::Number(number) = value? else {
        return None;
    };
    if let Some(value) = number.as_u64() {
        return Some(value);
    }
    if number.as_i64().is_some() {
        return Some(0);
    }
    number
        .as_f64()
        .filter(|value| value.is_finite())
        .map(|value| value.max(0.0).floor() as u64)
}

fn read_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
