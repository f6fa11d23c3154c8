//! Experience, level and achievement rules.
//!
//! # Responsibility
//! - Award experience and keep `level` derived from `xp`.
//! - Evaluate the fixed achievement rule set.
//! - Be the only writer of `stats`.
//!
//! # Invariants
//! - Predicates read only non-decreasing quantities (`stats`, `streak`,
//!   `xp`), so an unlockable achievement stays unlockable.
//! - Unlocked records are never re-locked.
//! - Unlocks are reported in definition order.

use crate::model::event::Celebration;
use crate::model::state::{level_for_xp, AchievementRecord, ProgressState};
use log::info;

/// One entry of the achievement rule set.
#[derive(Clone, Copy)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub predicate: fn(&ProgressState) -> bool,
}

static ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "first_win",
        icon: "🥇",
        title: "First Win",
        description: "Complete your first habit",
        predicate: first_win,
    },
    AchievementDefinition {
        id: "five_wins",
        icon: "🏅",
        title: "On a Roll",
        description: "Complete 5 habits",
        predicate: five_wins,
    },
    AchievementDefinition {
        id: "streak_3",
        icon: "🔥",
        title: "Warm Streak",
        description: "Reach a 3-day streak",
        predicate: streak_3,
    },
    AchievementDefinition {
        id: "streak_7",
        icon: "🚀",
        title: "Weekly Warrior",
        description: "Reach a 7-day streak",
        predicate: streak_7,
    },
    AchievementDefinition {
        id: "xp_100",
        icon: "✨",
        title: "XP Starter",
        description: "Earn 100 XP",
        predicate: xp_100,
    },
    AchievementDefinition {
        id: "xp_500",
        icon: "💎",
        title: "XP Grinder",
        description: "Earn 500 XP",
        predicate: xp_500,
    },
    AchievementDefinition {
        id: "focus_1",
        icon: "🎯",
        title: "Focused",
        description: "Finish 1 focus session",
        predicate: focus_1,
    },
    AchievementDefinition {
        id: "focus_5",
        icon: "🧠",
        title: "Deep Focus",
        description: "Finish 5 focus sessions",
        predicate: focus_5,
    },
];

fn first_win(state: &ProgressState) -> bool {
    state.stats.completions >= 1
}

fn five_wins(state: &ProgressState) -> bool {
    state.stats.completions >= 5
}

fn streak_3(state: &ProgressState) -> bool {
    state.streak >= 3
}

fn streak_7(state: &ProgressState) -> bool {
    state.streak >= 7
}

fn xp_100(state: &ProgressState) -> bool {
    state.xp >= 100
}

fn xp_500(state: &ProgressState) -> bool {
    state.xp >= 500
}

fn focus_1(state: &ProgressState) -> bool {
    state.stats.focus_sessions >= 1
}

fn focus_5(state: &ProgressState) -> bool {
    state.stats.focus_sessions >= 5
}

/// Returns the ordered achievement rule set.
pub fn achievement_definitions() -> &'static [AchievementDefinition] {
    ACHIEVEMENTS
}

/// Looks up one definition by id.
pub fn achievement_definition(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|definition| definition.id == id)
}

/// Achievement newly unlocked by one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementUnlock {
    pub id: &'static str,
    pub unlocked_at_ms: i64,
    pub celebration: Celebration,
}

/// Result of one experience award.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpGain {
    pub amount: u64,
    pub previous_level: u64,
    pub level: u64,
    pub unlocked: Vec<AchievementUnlock>,
}

impl XpGain {
    /// Returns the new level when this gain crossed a level threshold.
    pub fn level_up(&self) -> Option<u64> {
        (self.level > self.previous_level).then_some(self.level)
    }
}

/// Adds experience, recomputes level and re-evaluates achievements.
pub fn gain_xp(state: &mut ProgressState, amount: u64, now_ms: i64) -> XpGain {
    let previous_level = state.level;
    state.xp = state.xp.saturating_add(amount);
    state.level = level_for_xp(state.xp);

    if state.level > previous_level {
        info!(
            "event=level_up module=progression status=ok level={} xp={}",
            state.level, state.xp
        );
    }

    XpGain {
        amount,
        previous_level,
        level: state.level,
        unlocked: evaluate_achievements(state, now_ms),
    }
}

/// Counts one habit completion and re-evaluates achievements.
pub fn record_completion(state: &mut ProgressState, now_ms: i64) -> Vec<AchievementUnlock> {
    state.stats.completions = state.stats.completions.saturating_add(1);
    evaluate_achievements(state, now_ms)
}

/// Counts one finished focus session and re-evaluates achievements.
pub fn record_focus_session(state: &mut ProgressState, now_ms: i64) -> Vec<AchievementUnlock> {
    state.stats.focus_sessions = state.stats.focus_sessions.saturating_add(1);
    evaluate_achievements(state, now_ms)
}

/// Unlocks every satisfied, not-yet-unlocked achievement.
pub fn evaluate_achievements(state: &mut ProgressState, now_ms: i64) -> Vec<AchievementUnlock> {
    let mut unlocked = Vec::new();

    for definition in ACHIEVEMENTS {
        if state.is_achievement_unlocked(definition.id) || !(definition.predicate)(state) {
            continue;
        }

        state.achievements.insert(
            definition.id.to_string(),
            AchievementRecord {
                unlocked: true,
                unlocked_at_ms: Some(now_ms),
            },
        );
        info!(
            "event=achievement_unlock module=progression status=ok achievement_id={}",
            definition.id
        );
        unlocked.push(AchievementUnlock {
            id: definition.id,
            unlocked_at_ms: now_ms,
            celebration: Celebration::new(
                "🏆",
                "Trophy unlocked!",
                format!("{} {}", definition.icon, definition.title),
            ),
        });
    }

    unlocked
}

#[cfg(test)]
mod tests {
    use super::{achievement_definitions, evaluate_achievements, gain_xp};
    use crate::model::state::ProgressState;

    #[test]
    fn rule_set_ids_are_unique_and_ordered() {
        let ids: Vec<_> = achievement_definitions().iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec![
                "first_win",
                "five_wins",
                "streak_3",
                "streak_7",
                "xp_100",
                "xp_500",
                "focus_1",
                "focus_5"
            ]
        );
    }

    #[test]
    fn gain_xp_reports_level_up_once_threshold_is_crossed() {
        let mut state = ProgressState::default();
        let gain = gain_xp(&mut state, 90, 1);
        assert_eq!(gain.level_up(), None);

        let gain = gain_xp(&mut state, 15, 2);
        assert_eq!(gain.level_up(), Some(2));
        assert_eq!(state.level, 2);
        assert_eq!(gain.unlocked.len(), 1);
        assert_eq!(gain.unlocked[0].id, "xp_100");
    }

    #[test]
    fn simultaneous_unlocks_follow_definition_order() {
        let mut state = ProgressState::default();
        state.stats.completions = 5;
        state.streak = 7;

        let ids: Vec<_> = evaluate_achievements(&mut state, 10)
            .into_iter()
            .map(|unlock| unlock.id)
            .collect();
        assert_eq!(ids, vec!["first_win", "five_wins", "streak_3", "streak_7"]);
        assert!(evaluate_achievements(&mut state, 11).is_empty());
    }
}
