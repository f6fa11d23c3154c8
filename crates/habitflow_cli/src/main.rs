//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `habitflow_core` wiring end to end: config, logging, SQLite
//!   store, startup rollover.
//! - Print a deterministic summary of today's state.

use habitflow_core::db::open_db;
use habitflow_core::{
    core_version, init_logging, CoreConfig, HabitService, ProgressStore, RolloverOutcome,
    SqliteKeyValueStore, SystemClock,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("habitflow: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let store = ProgressStore::with_key(SqliteKeyValueStore::new(&conn), config.storage_key);
    let service = HabitService::open(store, SystemClock)?;
    log::info!("event=cli_start module=cli status=ok");

    let state = service.state();
    let summary = service.today_completion();
    println!("habitflow_core version={}", core_version());
    println!(
        "date={} streak={} xp={} level={}",
        state
            .anchor_date
            .map(|date| date.to_string())
            .unwrap_or_default(),
        state.streak,
        state.xp,
        state.level
    );
    if let RolloverOutcome::RolledOver { productive, .. } = service.startup().rollover {
        println!("rollover productive={productive}");
    }
    println!(
        "today completed={}/{} ({}%)",
        summary.completed, summary.total, summary.percentage
    );
    for habit in service.today_habits() {
        let mark = if habit.is_completed() { "x" } else { " " };
        println!(
            "[{mark}] {} {} {}%",
            habit.emoji,
            habit.name,
            habit.progress_percent()
        );
    }
    for unlock in &service.startup().outcome.celebrations {
        println!("{} {} {}", unlock.icon, unlock.title, unlock.message);
    }
    Ok(())
}
