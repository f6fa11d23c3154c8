//! Focus-session countdown.
//!
//! The countdown owns no background execution. The host calls `tick()` once
//! per real second while the timer is running.

use serde::{Deserialize, Serialize};

/// Default focus session length (25 minutes).
pub const DEFAULT_FOCUS_SECS: u32 = 25 * 60;

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Timer is stopped; nothing happened.
    Idle,
    /// One second elapsed, time remains.
    Counting { remaining_secs: u32 },
    /// Countdown reached zero. The timer is stopped and rearmed.
    Finished,
}

/// Explicit countdown value persisted with progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTimer {
    #[serde(rename = "timerSeconds")]
    pub remaining_secs: u32,
    /// Runtime-only flag; always written as `false`.
    #[serde(rename = "timerRunning")]
    pub running: bool,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self {
            remaining_secs: DEFAULT_FOCUS_SECS,
            running: false,
        }
    }
}

impl FocusTimer {
    /// Starts counting down. No-op when already running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops counting down and keeps the remaining time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops and rearms to the default duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = DEFAULT_FOCUS_SECS;
    }

    pub fn tick(&mut self) -> TickResult {
        if !self.running {
            return TickResult::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickResult::Counting {
                remaining_secs: self.remaining_secs,
            };
        }

        self.reset();
        TickResult::Finished
    }
}

/// Formats seconds as `MM:SS`.
pub fn format_timer(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
