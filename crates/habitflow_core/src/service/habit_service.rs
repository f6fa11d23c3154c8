//! Habit use-case service.
//!
//! # Responsibility
//! - Own the single `ProgressState` and its progress store.
//! - Run the daily rollover on open and before every mutation.
//! - Persist after every mutation and hand back a `MutationOutcome`.
//!
//! # Invariants
//! - Every mutating call persists the full state before returning.
//! - The service never runs background work; the host drives `tick_focus`.
//! - Readers get snapshot borrows of the owned state.

use crate::clock::Clock;
use crate::engine::focus::{complete_focus_session, tick_focus};
use crate::engine::mutation;
use crate::engine::outcome::MutationOutcome;
use crate::engine::progression::evaluate_achievements;
use crate::engine::rollover::{apply_rollover, RolloverOutcome};
use crate::model::habit::{Habit, HabitDraft, HabitId};
use crate::model::state::{ProgressState, Theme};
use crate::model::timer::{format_timer, TickResult};
use crate::repo::kv_repo::KeyValueStore;
use crate::store::progress_store::{ExportArtifact, LoadSource, ProgressStore, StoreResult};
use crate::view::{
    achievement_board, today_completion, today_habits, AchievementStatus, CompletionSummary,
};
use log::info;

/// Result of one day-boundary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCheck {
    pub rollover: RolloverOutcome,
    /// Achievements unlocked because the streak changed.
    pub outcome: MutationOutcome,
}

/// Service facade over the engine and progress store.
pub struct HabitService<S: KeyValueStore, C: Clock> {
    store: ProgressStore<S>,
    clock: C,
    state: ProgressState,
    load_source: LoadSource,
    startup: DayCheck,
}

impl<S: KeyValueStore, C: Clock> HabitService<S, C> {
    /// Loads state and applies the startup rollover check.
    ///
    /// # Errors
    /// - Returns storage errors from load or the follow-up save.
    pub fn open(store: ProgressStore<S>, clock: C) -> StoreResult<Self> {
        let loaded = store.load(clock.today())?;
        let mut service = Self {
            store,
            clock,
            state: loaded.state,
            load_source: loaded.source,
            startup: DayCheck {
                rollover: RolloverOutcome::Unchanged,
                outcome: MutationOutcome::noop(),
            },
        };
        service.startup = service.check_day()?;
        Ok(service)
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Day check performed while opening.
    pub fn startup(&self) -> &DayCheck {
        &self.startup
    }

    /// Applies the daily rollover when the local day changed.
    ///
    /// Safe to call at any time; a second call on the same day is a no-op.
    pub fn check_day(&mut self) -> StoreResult<DayCheck> {
        let rollover = apply_rollover(&mut self.state, self.clock.today());
        let mut outcome = MutationOutcome::noop();

        if rollover.changed_state() {
            self.store.save(&self.state)?;
        }
        if let RolloverOutcome::RolledOver { .. } = rollover {
            let unlocks = evaluate_achievements(&mut self.state, self.clock.now_millis());
            if !unlocks.is_empty() {
                outcome.absorb_unlocks(unlocks);
                self.store.save(&self.state)?;
            }
        }

        Ok(DayCheck { rollover, outcome })
    }

    /// Moves a count habit by `delta`.
    pub fn adjust_count(&mut self, habit_id: &str, delta: i64) -> StoreResult<MutationOutcome> {
        self.mutate(|state, now_ms| mutation::adjust_count(state, habit_id, delta, now_ms))
    }

    /// Flips a binary habit.
    pub fn toggle_binary(&mut self, habit_id: &str) -> StoreResult<MutationOutcome> {
        self.mutate(|state, now_ms| mutation::toggle_binary(state, habit_id, now_ms))
    }

    /// Completes or resets a count habit in one step.
    pub fn toggle_count(&mut self, habit_id: &str) -> StoreResult<MutationOutcome> {
        self.mutate(|state, now_ms| mutation::toggle_count(state, habit_id, now_ms))
    }

    /// Complete/undo for any habit kind.
    pub fn toggle(&mut self, habit_id: &str) -> StoreResult<MutationOutcome> {
        self.mutate(|state, now_ms| mutation::toggle(state, habit_id, now_ms))
    }

    /// Appends a habit and returns its new id.
    pub fn add_habit(&mut self, draft: HabitDraft) -> StoreResult<HabitId> {
        let mut habit_id = HabitId::new();
        self.mutate(|state, _| {
            habit_id = mutation::add_habit(state, draft);
            MutationOutcome::applied()
        })?;
        Ok(habit_id)
    }

    /// Removes a habit; unknown ids are ignored.
    pub fn remove_habit(&mut self, habit_id: &str) -> StoreResult<MutationOutcome> {
        self.mutate(|state, _| mutation::remove_habit(state, habit_id))
    }

    /// Clears today's progress without touching streak, xp or stats.
    pub fn reset_today(&mut self) -> StoreResult<MutationOutcome> {
        self.mutate(|state, _| mutation::reset_today(state))
    }

    pub fn toggle_theme(&mut self) -> StoreResult<Theme> {
        let mut theme = self.state.theme;
        self.mutate(|state, _| {
            theme = mutation::toggle_theme(state);
            MutationOutcome::applied()
        })?;
        Ok(theme)
    }

    pub fn set_filter(&mut self, filter: &str) -> StoreResult<()> {
        self.mutate(|state, _| {
            mutation::set_filter(state, filter);
            MutationOutcome::applied()
        })?;
        Ok(())
    }

    /// Starts the focus countdown. The host must call `tick_focus` each second.
    pub fn start_focus(&mut self) {
        self.state.timer.start();
    }

    /// Pauses the focus countdown and keeps the remaining time.
    pub fn stop_focus(&mut self) -> StoreResult<()> {
        self.state.timer.stop();
        self.store.save(&self.state)
    }

    /// Stops the focus countdown and rearms the default duration.
    pub fn reset_focus(&mut self) -> StoreResult<()> {
        self.state.timer.reset();
        self.store.save(&self.state)
    }

    /// Advances the focus countdown by one second.
    ///
    /// Persists only when the session finishes.
    pub fn tick_focus(&mut self) -> StoreResult<(TickResult, MutationOutcome)> {
        let (tick, outcome) = tick_focus(&mut self.state, self.clock.now_millis());
        if tick != TickResult::Finished {
            return Ok((tick, outcome));
        }

        let mut combined = self.check_day()?.outcome;
        combined.merge(outcome);
        self.store.save(&self.state)?;
        Ok((tick, combined))
    }

    /// Rewards a focus session finished outside the countdown.
    pub fn complete_focus_session(&mut self) -> StoreResult<MutationOutcome> {
        self.mutate(complete_focus_session)
    }

    /// Returns `MM:SS` for the remaining focus time.
    pub fn timer_display(&self) -> String {
        format_timer(self.state.timer.remaining_secs)
    }

    /// Habits scheduled today that match the current filter.
    pub fn today_habits(&self) -> Vec<&Habit> {
        today_habits(&self.state, self.clock.weekday())
    }

    pub fn today_completion(&self) -> CompletionSummary {
        today_completion(&self.state, self.clock.weekday())
    }

    pub fn achievement_board(&self) -> Vec<AchievementStatus> {
        achievement_board(&self.state)
    }

    /// Builds the downloadable export of the current state.
    pub fn export(&self) -> StoreResult<ExportArtifact> {
        self.store.export(&self.state, self.clock.today())
    }

    /// Replaces state from an exported record.
    ///
    /// # Errors
    /// - `StoreError::ImportRejected` leaves the state untouched.
    pub fn import(&mut self, raw: &str) -> StoreResult<()> {
        self.state = self.store.import(&self.state, raw, self.clock.today())?;
        Ok(())
    }

    /// Discards every record and starts over with the default habits.
    pub fn reset_all_data(&mut self) -> StoreResult<()> {
        self.store.clear()?;
        self.state = ProgressState::fresh(self.clock.today());
        self.store.save(&self.state)?;
        info!("event=reset_all_data module=service status=ok");
        Ok(())
    }

    fn mutate(
        &mut self,
        operation: impl FnOnce(&mut ProgressState, i64) -> MutationOutcome,
    ) -> StoreResult<MutationOutcome> {
        let mut outcome = self.check_day()?.outcome;
        outcome.merge(operation(&mut self.state, self.clock.now_millis()));
        self.store.save(&self.state)?;
        Ok(outcome)
    }
}
