//! FFI use-case API for the board UI shell.
//!
//! # Responsibility
//! - Expose the board store operations as sync, string-typed calls.
//! - Return a ready-to-render column snapshot for the current filters.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens the database, loads the board, applies at most one
//!   mutation and drops the store; calls are serialized.
//! - A call reports `ok=true` only when the board was read and every change
//!   it made reached the database.
//! - Unknown task ids are not errors; the response reports `changed=false`.

use chrono::NaiveDate;
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use taskboard_core::db::open_db;
use taskboard_core::{
    core_version as core_version_inner, format_due_date, format_timestamp,
    init_logging as init_logging_inner, is_overdue, parse_due_date, ping as ping_inner,
    BoardConfig, BoardQuery, Clock, DropEvent, DropOutcome, ParseEnumError, Priority,
    PriorityFilter, SqliteSlotRepository, StatusFilter, Task, TaskDraft, TaskId, TaskPatch,
    TaskStatus, TaskStore, DUE_DATE_FORMAT,
};

static BOARD_CONFIG: OnceLock<BoardConfig> = OnceLock::new();
static BOARD_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the board database file before first use.
///
/// Returns empty string on success. Fails when the board already resolved
/// a different path (explicitly or from `TASKBOARD_DB_PATH`/defaults).
#[flutter_rust_bridge::frb(sync)]
pub fn configure_board_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = BOARD_CONFIG.get_or_init(|| BoardConfig {
        db_path: requested.clone(),
        ..BoardConfig::from_env()
    });
    if active.db_path == requested {
        String::new()
    } else {
        format!(
            "board db already configured at `{}`; refusing to switch to `{}`",
            active.db_path.display(),
            requested.display()
        )
    }
}

/// Result envelope for board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether input parsed, the board loaded and any change was saved.
    pub ok: bool,
    /// Whether canonical data changed.
    pub changed: bool,
    /// Affected task ID, when one is known.
    pub task_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn applied(changed: bool, task_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub priority_label: String,
    pub status: String,
    /// `YYYY-MM-DD`, or empty when unset.
    pub due_date: String,
    /// e.g. `Oct 19, 2026`, or empty when unset.
    pub due_date_display: String,
    pub is_overdue: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One status column with its visible cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumnItem {
    /// Column id used for drag-and-drop (`todo|in-progress|completed`).
    pub status: String,
    pub title: String,
    pub tasks: Vec<BoardTaskItem>,
}

/// Filtered board snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub ok: bool,
    pub columns: Vec<BoardColumnItem>,
    /// Tasks on the board before filtering.
    pub total_tasks: u32,
    pub message: String,
}

/// Creates a `todo` task. Blank titles are ignored (`changed=false`).
///
/// `priority` accepts `low|medium|high`; empty means `medium`.
/// `due_date` accepts `YYYY-MM-DD`; empty means no due date.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(
    title: String,
    description: String,
    priority: String,
    due_date: String,
) -> BoardActionResponse {
    let priority = match parse_priority_or_default(&priority) {
        Ok(priority) => priority,
        Err(message) => return BoardActionResponse::failure(message),
    };
    let due_date = match parse_due_date(&due_date) {
        Ok(due_date) => due_date,
        Err(err) => {
            return BoardActionResponse::failure(format!("invalid due_date `{due_date}`: {err}"))
        }
    };
    let draft = TaskDraft {
        title,
        description,
        priority,
        due_date,
    };

    add_response(with_board(|store| store.add(draft)))
}

/// Edits a task; `None` fields keep their value. `due_date: Some("")` clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_task(
    task_id: String,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due_date: Option<String>,
) -> BoardActionResponse {
    let patch = match build_patch(title, description, priority, status, due_date) {
        Ok(patch) => patch,
        Err(message) => return BoardActionResponse::failure(message),
    };
    let id = TaskId::from(task_id);
    mutation_response(
        &id,
        with_board(|store| store.update(&id, patch)),
        "Task updated.",
    )
}

/// Deletes a task.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_task(task_id: String) -> BoardActionResponse {
    let id = TaskId::from(task_id);
    mutation_response(&id, with_board(|store| store.delete(&id)), "Task deleted.")
}

/// Advances a task along `todo -> in-progress -> completed -> todo`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_status(task_id: String) -> BoardActionResponse {
    let id = TaskId::from(task_id);
    mutation_response(
        &id,
        with_board(|store| store.toggle_status(&id)),
        "Task status advanced.",
    )
}

/// Sets a task status directly.
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_status(task_id: String, status: String) -> BoardActionResponse {
    let status = match status.parse::<TaskStatus>() {
        Ok(status) => status,
        Err(err) => return BoardActionResponse::failure(err.to_string()),
    };
    let id = TaskId::from(task_id);
    mutation_response(
        &id,
        with_board(|store| store.set_status(&id, status)),
        "Task status set.",
    )
}

/// Applies a finished drag. `destination_column=None` means dropped outside.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drop_task(
    task_id: String,
    source_column: String,
    destination_column: Option<String>,
) -> BoardActionResponse {
    let event = DropEvent {
        task_id: TaskId::from(task_id),
        source_column,
        destination_column,
    };
    let task_id = Some(event.task_id.to_string());
    match with_board(|store| store.apply_drop(&event)) {
        Ok(DropOutcome::Moved(status)) => BoardActionResponse::applied(
            true,
            task_id,
            format!("Task moved to {}.", status.label()),
        ),
        Ok(DropOutcome::Reordered) => {
            BoardActionResponse::applied(false, task_id, "Order within a column is not saved.")
        }
        Ok(DropOutcome::Ignored) => BoardActionResponse::applied(false, task_id, "Drop ignored."),
        Err(message) => BoardActionResponse::failure(message),
    }
}

/// Returns the board columns for the current search and filter controls.
///
/// `status_filter`: `all|todo|in-progress|completed`; empty means `all`.
/// `priority_filter`: `all|low|medium|high`; empty means `all`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot(search: String, status_filter: String, priority_filter: String) -> BoardSnapshot {
    match build_query(search, &status_filter, &priority_filter) {
        Ok(query) => snapshot_at(board_config(), &query),
        Err(message) => snapshot_failure(message),
    }
}

fn snapshot_at(config: &BoardConfig, query: &BoardQuery) -> BoardSnapshot {
    let result = with_board_at(config, |store| {
        let today = store.clock().today();
        let columns = store
            .project(query)
            .columns()
            .iter()
            .map(|column| BoardColumnItem {
                status: column.status.as_str().to_string(),
                title: column.title().to_string(),
                tasks: column
                    .tasks
                    .iter()
                    .map(|task| to_task_item(task, today))
                    .collect(),
            })
            .collect::<Vec<_>>();
        (columns, store.len())
    });

    match result {
        Ok((columns, total)) => {
            let visible: usize = columns.iter().map(|column| column.tasks.len()).sum();
            BoardSnapshot {
                ok: true,
                columns,
                total_tasks: u32::try_from(total).unwrap_or(u32::MAX),
                message: format!("Showing {visible} of {total} task(s)."),
            }
        }
        Err(message) => snapshot_failure(message),
    }
}

fn snapshot_failure(message: String) -> BoardSnapshot {
    BoardSnapshot {
        ok: false,
        columns: Vec::new(),
        total_tasks: 0,
        message,
    }
}

fn add_response(result: Result<Option<TaskId>, String>) -> BoardActionResponse {
    match result {
        Ok(Some(id)) => BoardActionResponse::applied(true, Some(id.to_string()), "Task created."),
        Ok(None) => BoardActionResponse::applied(false, None, "Title is empty; nothing created."),
        Err(message) => BoardActionResponse::failure(message),
    }
}

fn mutation_response(
    id: &TaskId,
    result: Result<bool, String>,
    applied_message: &str,
) -> BoardActionResponse {
    match result {
        Ok(true) => BoardActionResponse::applied(true, Some(id.to_string()), applied_message),
        Ok(false) => BoardActionResponse::applied(false, Some(id.to_string()), "No matching change."),
        Err(message) => BoardActionResponse::failure(message),
    }
}

fn build_patch(
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due_date: Option<String>,
) -> Result<TaskPatch, String> {
    let priority = priority
        .map(|value| value.parse::<Priority>().map_err(|err| err.to_string()))
        .transpose()?;
    let status = status
        .map(|value| value.parse::<TaskStatus>().map_err(|err| err.to_string()))
        .transpose()?;
    let due_date = due_date
        .map(|value| {
            parse_due_date(&value).map_err(|err| format!("invalid due_date `{value}`: {err}"))
        })
        .transpose()?;
    Ok(TaskPatch {
        title,
        description,
        priority,
        status,
        due_date,
    })
}

fn build_query(search: String, status: &str, priority: &str) -> Result<BoardQuery, String> {
    let status = match status.trim() {
        "" => StatusFilter::All,
        value => value
            .parse::<StatusFilter>()
            .map_err(|err| err.to_string())?,
    };
    let priority = match priority.trim() {
        "" => PriorityFilter::All,
        value => value
            .parse::<PriorityFilter>()
            .map_err(|err| err.to_string())?,
    };
    Ok(BoardQuery {
        search,
        status,
        priority,
    })
}

fn parse_priority_or_default(value: &str) -> Result<Priority, String> {
    match value.trim() {
        "" => Ok(Priority::default()),
        other => other
            .parse::<Priority>()
            .map_err(|err: ParseEnumError| err.to_string()),
    }
}

fn to_task_item(task: &Task, today: NaiveDate) -> BoardTaskItem {
    BoardTaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority.as_str().to_string(),
        priority_label: task.priority.label().to_string(),
        status: task.status.as_str().to_string(),
        due_date: task
            .due_date
            .map(|date| date.format(DUE_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        due_date_display: task.due_date.map(format_due_date).unwrap_or_default(),
        is_overdue: is_overdue(task.due_date, today),
        created_at: format_timestamp(&task.created_at),
        updated_at: format_timestamp(&task.updated_at),
    }
}

fn board_config() -> &'static BoardConfig {
    BOARD_CONFIG.get_or_init(BoardConfig::from_env)
}

fn with_board<T>(f: impl FnOnce(&mut TaskStore<SqliteSlotRepository<'_>>) -> T) -> Result<T, String> {
    with_board_at(board_config(), f)
}

/// Runs `f` against a freshly loaded board.
///
/// Fails instead of handing out an empty board when the slot is unreadable,
/// and fails after `f` when its change did not reach the database.
fn with_board_at<T>(
    config: &BoardConfig,
    f: impl FnOnce(&mut TaskStore<SqliteSlotRepository<'_>>) -> T,
) -> Result<T, String> {
    let _guard = BOARD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(&config.db_path).map_err(|err| {
        warn!("event=board_open module=ffi status=error error={err}");
        format!("board DB open failed: {err}")
    })?;
    let repo = SqliteSlotRepository::try_new(&conn)
        .map_err(|err| format!("board repo init failed: {err}"))?;
    let mut store = TaskStore::load(repo, config.slot_key.clone());
    if store.load_failed() {
        warn!("event=board_load module=ffi status=error slot={}", config.slot_key);
        return Err(format!("board slot `{}` could not be read", config.slot_key));
    }

    let value = f(&mut store);
    if store.has_unsaved_changes() {
        warn!("event=board_save module=ffi status=error slot={}", config.slot_key);
        return Err("board save failed; the change was not kept".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{
        add_response, board_add_task, board_delete_task, board_drop_task, board_set_status,
        board_snapshot, board_toggle_status, board_update_task, configure_board_db_path,
        core_version, init_logging, mutation_response, ping, snapshot_at, with_board_at,
        BoardSnapshot, BoardTaskItem,
    };
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use taskboard_core::db::open_db;
    use taskboard_core::{BoardConfig, BoardQuery, TaskDraft, TaskId, DEFAULT_SLOT_KEY};

    fn use_test_db() {
        let path = std::env::temp_dir().join(format!(
            "taskboard-ffi-test-{}.sqlite3",
            std::process::id()
        ));
        let error = configure_board_db_path(path.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    fn find_task<'a>(snapshot: &'a BoardSnapshot, id: &str) -> Option<(&'a str, &'a BoardTaskItem)> {
        snapshot.columns.iter().find_map(|column| {
            column
                .tasks
                .iter()
                .find(|task| task.id == id)
                .map(|task| (column.status.as_str(), task))
        })
    }

    /// Private board file, outside the process-wide configured one.
    fn isolated_config(name: &str) -> BoardConfig {
        let db_path: PathBuf = std::env::temp_dir().join(format!(
            "{}-{}.sqlite3",
            unique_token(name),
            std::process::id()
        ));
        BoardConfig {
            db_path,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }

    fn add(title: &str) -> String {
        let response = board_add_task(title.to_string(), String::new(), String::new(), String::new());
        assert!(response.ok && response.changed, "{}", response.message);
        response.task_id.expect("created task should return task_id")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_refuses_a_second_path() {
        use_test_db();
        let error = configure_board_db_path("/definitely/another/board.sqlite3".to_string());
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn add_then_snapshot_shows_task_in_todo_column() {
        use_test_db();
        let title = unique_token("ffi-add");
        let response = board_add_task(
            title.clone(),
            "details".to_string(),
            "high".to_string(),
            "2000-01-01".to_string(),
        );
        assert!(response.ok, "{}", response.message);
        let id = response.task_id.expect("task id");

        let snapshot = board_snapshot(title.clone(), "all".to_string(), String::new());
        assert!(snapshot.ok, "{}", snapshot.message);
        let titles: Vec<_> = snapshot.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["To Do", "In Progress", "Completed"]);

        let (column, task) = find_task(&snapshot, &id).expect("task should be visible");
        assert_eq!(column, "todo");
        assert_eq!(task.title, title);
        assert_eq!(task.priority_label, "High");
        assert_eq!(task.due_date, "2000-01-01");
        assert_eq!(task.due_date_display, "Jan 1, 2000");
        assert!(task.is_overdue);
    }

    #[test]
    fn blank_title_creates_nothing() {
        use_test_db();
        let response = board_add_task("   ".to_string(), String::new(), String::new(), String::new());
        assert!(response.ok);
        assert!(!response.changed);
        assert!(response.task_id.is_none());
    }

    #[test]
    fn invalid_inputs_are_reported() {
        use_test_db();
        let bad_priority =
            board_add_task("x".to_string(), String::new(), "urgent".to_string(), String::new());
        assert!(!bad_priority.ok);
        assert!(bad_priority.message.contains("urgent"));

        let bad_filter = board_snapshot(String::new(), "done".to_string(), "all".to_string());
        assert!(!bad_filter.ok);
    }

    #[test]
    fn toggle_set_status_and_drop_move_between_columns() {
        use_test_db();
        let title = unique_token("ffi-move");
        let id = add(&title);

        assert!(board_toggle_status(id.clone()).changed);
        let snapshot = board_snapshot(title.clone(), String::new(), String::new());
        assert_eq!(find_task(&snapshot, &id).unwrap().0, "in-progress");

        assert!(board_set_status(id.clone(), "completed".to_string()).changed);
        let dropped = board_drop_task(id.clone(), "completed".to_string(), Some("todo".to_string()));
        assert!(dropped.changed, "{}", dropped.message);

        let same_column =
            board_drop_task(id.clone(), "todo".to_string(), Some("todo".to_string()));
        assert!(same_column.ok && !same_column.changed);
        let outside = board_drop_task(id.clone(), "todo".to_string(), None);
        assert!(outside.ok && !outside.changed);

        let snapshot = board_snapshot(title, String::new(), String::new());
        assert_eq!(find_task(&snapshot, &id).unwrap().0, "todo");
    }

    #[test]
    fn update_and_delete_round_trip() {
        use_test_db();
        let title = unique_token("ffi-edit");
        let id = add(&title);

        let updated = board_update_task(
            id.clone(),
            None,
            Some("new description".to_string()),
            Some("low".to_string()),
            None,
            Some(String::new()),
        );
        assert!(updated.changed, "{}", updated.message);

        let snapshot = board_snapshot(title.clone(), String::new(), "low".to_string());
        let (_, task) = find_task(&snapshot, &id).expect("task should match low filter");
        assert_eq!(task.description, "new description");
        assert_eq!(task.due_date, "");

        assert!(board_delete_task(id.clone()).changed);
        assert!(!board_delete_task(id.clone()).changed);
        let snapshot = board_snapshot(title, String::new(), String::new());
        assert!(find_task(&snapshot, &id).is_none());
    }

    #[test]
    fn unknown_ids_are_not_failures() {
        use_test_db();
        let response = board_toggle_status(unique_token("missing"));
        assert!(response.ok);
        assert!(!response.changed);
    }

    #[test]
    fn rejected_write_is_reported_and_not_shown() {
        let config = isolated_config("taskboard-ffi-reject");
        let seeded = add_response(with_board_at(&config, |store| {
            store.add(TaskDraft::new("Walk dog"))
        }));
        assert!(seeded.ok && seeded.changed, "{}", seeded.message);
        let seeded_id = TaskId::from(seeded.task_id.expect("seeded task id"));

        let conn = open_db(&config.db_path).expect("open board db");
        conn.execute_batch(
            "CREATE TRIGGER reject_slot_update BEFORE UPDATE ON kv_slots
             BEGIN SELECT RAISE(ABORT, 'slot writes disabled'); END;",
        )
        .expect("install trigger");
        drop(conn);

        let response = add_response(with_board_at(&config, |store| {
            store.add(TaskDraft::new("Buy milk"))
        }));
        assert!(!response.ok);
        assert!(!response.changed);
        assert!(response.task_id.is_none());
        assert!(response.message.contains("save failed"), "{}", response.message);

        let toggled = mutation_response(
            &seeded_id,
            with_board_at(&config, |store| store.toggle_status(&seeded_id)),
            "Task status advanced.",
        );
        assert!(!toggled.ok && !toggled.changed);

        let snapshot = snapshot_at(&config, &BoardQuery::default());
        assert!(snapshot.ok, "{}", snapshot.message);
        assert_eq!(snapshot.total_tasks, 1);
        let (column, task) = find_task(&snapshot, seeded_id.as_str()).expect("seeded task");
        assert_eq!(column, "todo");
        assert_eq!(task.title, "Walk dog");

        let _ = std::fs::remove_file(&config.db_path);
    }

    #[test]
    fn unreadable_board_is_reported_and_left_alone() {
        let config = isolated_config("taskboard-ffi-unreadable");
        let conn = open_db(&config.db_path).expect("open board db");
        conn.execute_batch(
            "INSERT INTO kv_slots (key, value) VALUES ('pt-task-manager-data', CAST(x'00ff' AS BLOB));",
        )
        .expect("store unreadable value");
        drop(conn);

        let snapshot = snapshot_at(&config, &BoardQuery::default());
        assert!(!snapshot.ok);
        assert!(snapshot.message.contains("could not be read"), "{}", snapshot.message);

        let response = add_response(with_board_at(&config, |store| {
            store.add(TaskDraft::new("Buy milk"))
        }));
        assert!(!response.ok && !response.changed);

        let conn = open_db(&config.db_path).expect("reopen board db");
        let kind: String = conn
            .query_row(
                "SELECT typeof(value) FROM kv_slots WHERE key = 'pt-task-manager-data';",
                [],
                |row| row.get(0),
            )
            .expect("slot row kept");
        assert_eq!(kind, "blob");
        drop(conn);

        let _ = std::fs::remove_file(&config.db_path);
    }
}
