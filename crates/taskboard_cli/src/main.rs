//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskboard_core` linkage and print the configured board.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `taskboard_cli [search]`. The board location comes from
//! `TASKBOARD_DB_PATH` / `TASKBOARD_SLOT_KEY`.

use std::process::ExitCode;
use taskboard_core::db::open_db;
use taskboard_core::{
    format_due_date, is_overdue, BoardConfig, BoardQuery, Clock, SqliteSlotRepository, TaskStore,
};

fn main() -> ExitCode {
    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    let config = BoardConfig::from_env();
    let search = std::env::args().nth(1).unwrap_or_default();

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteSlotRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("failed to prepare board storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = TaskStore::load(repo, config.slot_key.clone());
    if store.load_failed() {
        eprintln!("failed to read board slot `{}`", store.slot_key());
        return ExitCode::FAILURE;
    }
    let today = store.clock().today();
    let view = store.project(&BoardQuery::search(search));

    println!(
        "board db={} slot={} tasks={} shown={}",
        config.db_path.display(),
        store.slot_key(),
        store.len(),
        view.total()
    );
    for column in view.columns() {
        println!("\n{} ({})", column.title(), column.count());
        for task in &column.tasks {
            let due = match task.due_date {
                Some(date) if is_overdue(task.due_date, today) => {
                    format!(" due={} overdue", format_due_date(date))
                }
                Some(date) => format!(" due={}", format_due_date(date)),
                None => String::new(),
            };
            println!(
                "  [{}] {} ({}){}",
                task.id,
                task.title,
                task.priority.label(),
                due
            );
        }
    }

    ExitCode::SUCCESS
}
