use chrono::{Days, NaiveDate};
use habitflow_core::db::{open_db, open_db_in_memory};
use habitflow_core::engine::progression::achievement_definition;
use habitflow_core::{
    Clock, FixedClock, HabitDraft, HabitKind, HabitService, ImportRejection, LoadSource,
    MemoryKeyValueStore, ProgressStore, RolloverOutcome, SqliteKeyValueStore, StoreError, Theme,
    TickResult,
};
use std::cell::Cell;

/// Clock whose day can be advanced between calls.
struct SteppingClock {
    today: Cell<NaiveDate>,
    now_millis: Cell<i64>,
}

impl SteppingClock {
    fn starting(year: i32, month: u32, date: u32) -> Self {
        Self {
            today: Cell::new(NaiveDate::from_ymd_opt(year, month, date).unwrap()),
            now_millis: Cell::new(1_704_067_200_000),
        }
    }

    fn advance_day(&self) {
        self.today.set(self.today.get() + Days::new(1));
        self.now_millis.set(self.now_millis.get() + 86_400_000);
    }
}

impl Clock for SteppingClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_millis(&self) -> i64 {
        self.now_millis.get()
    }
}

fn open<'a>(
    kv: &'a MemoryKeyValueStore,
    clock: &'a SteppingClock,
) -> HabitService<&'a MemoryKeyValueStore, &'a SteppingClock> {
    HabitService::open(ProgressStore::new(kv), clock).unwrap()
}

#[test]
fn first_open_seeds_defaults_and_initializes_day() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);

    let service = open(&kv, &clock);

    assert_eq!(service.load_source(), LoadSource::Fresh);
    assert_eq!(service.startup().rollover, RolloverOutcome::Unchanged);
    assert_eq!(service.state().habits.len(), 11);
    assert_eq!(service.timer_display(), "25:00");
    assert!(!kv.is_empty());
}

#[test]
fn every_mutation_is_persisted() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);

    let mut service = open(&kv, &clock);
    service.adjust_count("h1", 3).unwrap();
    service.toggle_binary("h3").unwrap();
    service.set_filter("health").unwrap();
    assert_eq!(service.toggle_theme().unwrap(), Theme::Dark);
    let expected = service.state().clone();
    drop(service);

    let reopened = open(&kv, &clock);
    assert_eq!(reopened.load_source(), LoadSource::Persisted);
    assert_eq!(reopened.state(), &expected);
    assert_eq!(reopened.state().habit("h1").unwrap().count, 3);
    assert_eq!(reopened.state().xp, 15);
}

#[test]
fn rollover_runs_before_mutation_across_midnight() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);
    service.toggle("h3").unwrap();

    clock.advance_day();
    service.toggle("h4").unwrap();

    let state = service.state();
    assert_eq!(state.streak, 1);
    assert!(!state.habit("h3").unwrap().done);
    assert!(state.habit("h4").unwrap().done);
    assert_eq!(
        state.anchor_date,
        NaiveDate::from_ymd_opt(2024, 1, 2)
    );
}

#[test]
fn reopening_on_a_later_day_rolls_over_at_startup() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);
    service.adjust_count("h1", 2).unwrap();
    drop(service);

    clock.advance_day();
    let service = open(&kv, &clock);

    assert_eq!(
        service.startup().rollover,
        RolloverOutcome::RolledOver {
            productive: false,
            previous_streak: 0,
            streak: 0,
        }
    );
    assert_eq!(service.state().habit("h1").unwrap().count, 0);
}

#[test]
fn streak_achievement_unlocks_on_day_check() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);

    for _ in 0..2 {
        service.toggle_binary("h8").unwrap();
        clock.advance_day();
        service.check_day().unwrap();
    }
    service.toggle_binary("h8").unwrap();
    clock.advance_day();
    let check = service.check_day().unwrap();

    assert_eq!(service.state().streak, 3);
    assert_eq!(check.outcome.unlocked, vec!["streak_3".to_string()]);
    assert_eq!(check.outcome.celebrations[0].message, "🔥 Warm Streak");
    assert!(service.check_day().unwrap().outcome.unlocked.is_empty());
}

#[test]
fn full_focus_session_rewards_and_persists() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);

    service.start_focus();
    let mut last = None;
    for _ in 0..1500 {
        last = Some(service.tick_focus().unwrap());
    }
    let (tick, outcome) = last.unwrap();

    assert_eq!(tick, TickResult::Finished);
    assert_eq!(outcome.xp_gained, 25);
    assert_eq!(outcome.unlocked, vec!["focus_1".to_string()]);
    assert_eq!(service.timer_display(), "25:00");
    drop(service);

    let reopened = open(&kv, &clock);
    assert_eq!(reopened.state().xp, 25);
    assert_eq!(reopened.state().stats.focus_sessions, 1);
    assert!(!reopened.state().timer.running);
}

#[test]
fn paused_focus_keeps_remaining_time() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);

    service.start_focus();
    for _ in 0..61 {
        service.tick_focus().unwrap();
    }
    service.stop_focus().unwrap();
    assert_eq!(service.timer_display(), "23:59");
    assert_eq!(service.tick_focus().unwrap().0, TickResult::Idle);

    service.reset_focus().unwrap();
    assert_eq!(service.timer_display(), "25:00");
}

#[test]
fn today_views_follow_schedule_and_filter() {
    let kv = MemoryKeyValueStore::new();
    // 2024-01-06 is a Saturday.
    let clock = SteppingClock::starting(2024, 1, 6);
    let mut service = open(&kv, &clock);

    let ids: Vec<&str> = service
        .today_habits()
        .iter()
        .map(|habit| habit.id.as_str())
        .collect();
    assert!(!ids.contains(&"h2"));
    assert!(!ids.contains(&"h5"));
    assert_eq!(ids.len(), 8);

    service.set_filter("mindfulness").unwrap();
    service.toggle("h3").unwrap();
    let summary = service.today_completion();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.percentage, 50);

    let board = service.achievement_board();
    assert_eq!(board.len(), 8);
    assert!(board[0].unlocked);
    assert!(board[1..].iter().all(|status| !status.unlocked));
}

#[test]
fn added_habit_survives_reopen_and_removal_is_idempotent() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);

    let id = service
        .add_habit(HabitDraft {
            name: "Floss".to_string(),
            emoji: "🦷".to_string(),
            kind: HabitKind::Binary,
            category: "health".to_string(),
            goal: None,
            days: Vec::new(),
        })
        .unwrap();
    drop(service);

    let mut service = open(&kv, &clock);
    assert_eq!(service.state().habit(&id).unwrap().name, "Floss");
    assert!(service.remove_habit(&id).unwrap().applied);
    assert!(!service.remove_habit(&id).unwrap().applied);
    assert_eq!(service.state().habits.len(), 11);
}

#[test]
fn export_then_import_restores_progress_after_reset() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);
    service.toggle("h1").unwrap();
    service.toggle("h3").unwrap();
    let artifact = service.export().unwrap();
    assert_eq!(artifact.file_name, "habitflow-2024-01-01.json");

    service.reset_all_data().unwrap();
    assert_eq!(service.state().xp, 0);
    assert!(service.state().achievements.is_empty());

    service.import(&artifact.contents).unwrap();
    assert_eq!(service.state().xp, 25);
    assert_eq!(service.state().stats.completions, 2);
    assert!(service.state().is_achievement_unlocked("first_win"));
}

#[test]
fn rejected_import_keeps_current_state() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);
    service.toggle("h3").unwrap();
    let before = service.state().clone();

    let err = service.import(r#"{"habits": "nope"}"#).unwrap_err();

    assert!(matches!(
        err,
        StoreError::ImportRejected(ImportRejection::HabitsNotASequence)
    ));
    assert_eq!(service.state(), &before);
}

#[test]
fn reset_today_is_persisted_without_losing_progression() {
    let kv = MemoryKeyValueStore::new();
    let clock = SteppingClock::starting(2024, 1, 1);
    let mut service = open(&kv, &clock);
    service.toggle("h6").unwrap();

    service.reset_today().unwrap();
    drop(service);

    let reopened = open(&kv, &clock);
    assert_eq!(reopened.state().habit("h6").unwrap().count, 0);
    assert_eq!(reopened.state().xp, 10);
    assert_eq!(reopened.state().stats.completions, 1);
}

#[test]
fn sqlite_backed_service_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitflow.sqlite3");
    let clock = SteppingClock::starting(2024, 1, 1);

    {
        let conn = open_db(&path).unwrap();
        let store = ProgressStore::with_key(SqliteKeyValueStore::new(&conn), "habitflow-test");
        let mut service = HabitService::open(store, &clock).unwrap();
        service.toggle("h3").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = ProgressStore::with_key(SqliteKeyValueStore::new(&conn), "habitflow-test");
    let service = HabitService::open(store, &clock).unwrap();
    assert_eq!(service.load_source(), LoadSource::Persisted);
    assert!(service.state().habit("h3").unwrap().done);
    assert_eq!(service.state().xp, 15);
}

#[test]
fn unlock_timestamps_come_from_the_injected_clock() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(), 1_704_585_600_000);
    let store = ProgressStore::new(SqliteKeyValueStore::new(&conn));
    let mut service = HabitService::open(store, clock).unwrap();

    service.toggle("h9").unwrap();

    let status = service
        .achievement_board()
        .into_iter()
        .find(|status| status.id == "first_win")
        .unwrap();
    assert!(status.unlocked);
    assert_eq!(status.unlocked_at_ms, Some(1_704_585_600_000));
    assert_eq!(
        status.title,
        achievement_definition("first_win").unwrap().title
    );
}
