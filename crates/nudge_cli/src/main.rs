//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `nudge_core` wiring end to end.
//! - Keep output deterministic for quick local sanity checks.

use nudge_core::db::open_db_in_memory;
use nudge_core::{NoopScheduler, ReminderManager, SqliteReminderStore};

fn main() {
    println!("nudge_core ping={}", nudge_core::ping());
    println!("nudge_core version={}", nudge_core::core_version());

    // Drive one full lifecycle against an in-memory database and the no-op
    // scheduler, independently of any host notification runtime.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("smoke failed: db open: {err}");
            std::process::exit(1);
        }
    };
    let store = match SqliteReminderStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("smoke failed: store init: {err}");
            std::process::exit(1);
        }
    };

    let mut manager = ReminderManager::new(store, NoopScheduler::default());
    let report = manager.initialize();
    println!(
        "smoke init loaded={} permission={} physical_device={}",
        report.loaded, report.permission, report.physical_device
    );

    match manager.create_reminder("smoke reminder", "10") {
        Ok(outcome) => {
            println!(
                "smoke created id={} persisted={}",
                outcome.reminder.id, outcome.persisted
            );
            manager.delete_reminder(outcome.reminder.id);
            println!("smoke remaining={}", manager.list_reminders().len());
        }
        Err(err) => {
            eprintln!("smoke failed: create: {err}");
            std::process::exit(1);
        }
    }
}
