//! Focus-session rewards driven by the externally ticked countdown.

use crate::engine::outcome::MutationOutcome;
use crate::engine::progression::{gain_xp, record_focus_session};
use crate::model::event::Celebration;
use crate::model::state::ProgressState;
use crate::model::timer::TickResult;
use log::info;

/// Experience for finishing one focus session.
pub const FOCUS_SESSION_XP: u64 = 25;

/// Advances the countdown by one second.
///
/// When the countdown finishes, the session is rewarded like a manual
/// completion and the timer is left rearmed and stopped.
pub fn tick_focus(state: &mut ProgressState, now_ms: i64) -> (TickResult, MutationOutcome) {
    let tick = state.timer.tick();
    let outcome = match tick {
        TickResult::Idle => MutationOutcome::noop(),
        TickResult::Counting { .. } => MutationOutcome::applied(),
        TickResult::Finished => complete_focus_session(state, now_ms),
    };
    (tick, outcome)
}

/// Rewards one finished focus session and rearms the timer.
pub fn complete_focus_session(state: &mut ProgressState, now_ms: i64) -> MutationOutcome {
    state.timer.reset();

    let mut outcome = MutationOutcome::applied();
    outcome.absorb_xp(gain_xp(state, FOCUS_SESSION_XP, now_ms));
    outcome.absorb_unlocks(record_focus_session(state, now_ms));
    outcome.celebrate(Celebration::new(
        "🎯",
        "Focus complete!",
        format!("{FOCUS_SESSION_XP} XP earned. Keep going!"),
    ));

    info!(
        "event=focus_complete module=engine status=ok focus_sessions={} xp={}",
        state.stats.focus_sessions, state.xp
    );
    outcome
}
