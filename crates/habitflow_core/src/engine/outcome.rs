//! Change description returned by every mutation.

use crate::engine::progression::{AchievementUnlock, XpGain};
use crate::model::event::Celebration;

/// What one mutation changed, for the presentation layer to react to.
///
/// Celebrations are listed in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// `false` when the call was a no-op (unknown id, wrong habit kind).
    pub applied: bool,
    pub xp_gained: u64,
    /// New level when a threshold was crossed.
    pub level_up: Option<u64>,
    /// Newly unlocked achievement ids.
    pub unlocked: Vec<String>,
    pub celebrations: Vec<Celebration>,
}

impl MutationOutcome {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn applied() -> Self {
        Self {
            applied: true,
            ..Self::default()
        }
    }

    pub(crate) fn absorb_xp(&mut self, gain: XpGain) {
        self.xp_gained += gain.amount;
        if let Some(level) = gain.level_up() {
            self.level_up = Some(level);
        }
        self.absorb_unlocks(gain.unlocked);
    }

    pub(crate) fn absorb_unlocks(&mut self, unlocks: Vec<AchievementUnlock>) {
        for unlock in unlocks {
            self.unlocked.push(unlock.id.to_string());
            self.celebrations.push(unlock.celebration);
        }
    }

    pub(crate) fn celebrate(&mut self, celebration: Celebration) {
        self.celebrations.push(celebration);
    }

    /// Folds a follow-up outcome into this one.
    pub(crate) fn merge(&mut self, other: MutationOutcome) {
        self.applied |= other.applied;
        self.xp_gained += other.xp_gained;
        if other.level_up.is_some() {
            self.level_up = other.level_up;
        }
        self.unlocked.extend(other.unlocked);
        self.celebrations.extend(other.celebrations);
    }
}
