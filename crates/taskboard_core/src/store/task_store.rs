//! Owned task collection with load-at-construction / save-on-mutation.
//!
//! # Responsibility
//! - Hold the canonical, insertion-ordered task list.
//! - Apply create/update/delete/status mutations.
//! - Mirror the full collection into one storage slot after each mutation.
//!
//! # Invariants
//! - Task ids are unique within the collection.
//! - Every mutation of a task strictly advances its `updated_at`.
//! - Unknown ids and blank titles are ignored, not reported.
//! - Storage read/write failures are logged and swallowed; callers that need
//!   durability check `load_failed` / `has_unsaved_changes`.
//! - A store whose slot could not be read never writes that slot.

use super::clock::{Clock, SystemClock};
use super::codec::{decode_tasks, encode_tasks};
use crate::model::task::{
    Task, TaskDraft, TaskId, TaskPatch, TaskStatus, LATEST_TIMESTAMP_MILLIS,
};
use crate::repo::slot_repo::SlotRepository;
use crate::view::projector::{project, BoardQuery, BoardView};
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};

/// Slot key used by the board when no other key is configured.
pub const DEFAULT_SLOT_KEY: &str = "pt-task-manager-data";

/// Board task store.
///
/// Generic over the slot backend and the clock so tests can pin time and
/// inspect the persisted payload.
pub struct TaskStore<R: SlotRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    slot_key: String,
    tasks: Vec<Task>,
    load_failed: bool,
    unsaved: bool,
}

impl<R: SlotRepository> TaskStore<R> {
    /// Loads the collection from `slot_key` using the wall clock.
    pub fn load(repo: R, slot_key: impl Into<String>) -> Self {
        Self::load_with_clock(repo, slot_key, SystemClock)
    }
}

impl<R: SlotRepository, C: Clock> TaskStore<R, C> {
    /// Loads the collection from `slot_key`.
    ///
    /// Absent, empty or malformed payloads yield an empty collection. So does
    /// an unreadable slot, which is additionally flagged by `load_failed`.
    pub fn load_with_clock(repo: R, slot_key: impl Into<String>, clock: C) -> Self {
        let slot_key = slot_key.into();
        let (tasks, load_failed) = match read_collection(&repo, &slot_key) {
            Ok(tasks) => (tasks, false),
            Err(()) => (Vec::new(), true),
        };
        Self {
            repo,
            clock,
            slot_key,
            tasks,
            load_failed,
            unsaved: false,
        }
    }

    /// Tasks in canonical order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Whether the slot could not be read at load time.
    ///
    /// Such a store starts empty and keeps every change in memory only, so
    /// stored data it never saw is not overwritten.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Whether the last mutation is missing from storage.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Filtered, column-partitioned view of the current collection.
    pub fn project(&self, query: &BoardQuery) -> BoardView<'_> {
        project(&self.tasks, query)
    }

    /// Appends a new `todo` task built from `draft`.
    ///
    /// Returns `None` without touching storage when the title is blank.
    pub fn add(&mut self, draft: TaskDraft) -> Option<TaskId> {
        if draft.title.trim().is_empty() {
            debug!("event=task_add module=store status=skip reason=blank_title");
            return None;
        }

        let mut id = TaskId::generate();
        while self.position(&id).is_some() {
            id = TaskId::generate();
        }

        let task = Task::from_draft(id.clone(), draft, self.clock.now());
        self.tasks.push(task);
        info!(
            "event=task_add module=store status=ok task_id={} count={}",
            id,
            self.tasks.len()
        );
        self.persist();
        Some(id)
    }

    /// Merges `patch` into the task with `id` and stamps `updated_at`.
    ///
    /// Returns `false` for unknown ids and for patches that blank the title.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_update module=store status=skip reason=not_found task_id={id}");
            return false;
        };
        if patch.blanks_title() {
            debug!("event=task_update module=store status=skip reason=blank_title task_id={id}");
            return false;
        }

        let now = self.clock.now();
        let task = &mut self.tasks[index];
        task.apply_patch(patch);
        task.updated_at = advance_stamp(task.updated_at, now);
        info!(
            "event=task_update module=store status=ok task_id={} task_status={}",
            id, task.status
        );
        self.persist();
        true
    }

    /// Removes the task with `id`; order of the remaining tasks is kept.
    ///
    /// The collection is written back even when nothing matched.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let removed = match self.position(id) {
            Some(index) => {
                self.tasks.remove(index);
                info!(
                    "event=task_delete module=store status=ok task_id={} count={}",
                    id,
                    self.tasks.len()
                );
                true
            }
            None => {
                debug!("event=task_delete module=store status=skip reason=not_found task_id={id}");
                false
            }
        };
        self.persist();
        removed
    }

    /// Moves the task one step along `todo -> in-progress -> completed -> todo`.
    pub fn toggle_status(&mut self, id: &TaskId) -> bool {
        let Some(current) = self.get(id).map(|task| task.status) else {
            debug!("event=task_toggle module=store status=skip reason=not_found task_id={id}");
            return false;
        };
        self.update(id, TaskPatch::status(current.next()))
    }

    /// Sets the status directly, bypassing the cycle.
    pub fn set_status(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        self.update(id, TaskPatch::status(status))
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn persist(&mut self) {
        if self.load_failed {
            warn!(
                "event=slot_write module=store status=skip reason=load_failed slot={}",
                self.slot_key
            );
            self.unsaved = true;
            return;
        }

        let payload = match encode_tasks(&self.tasks) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=slot_write module=store status=error error_code=encode_failed slot={} error={}",
                    self.slot_key, err
                );
                self.unsaved = true;
                return;
            }
        };

        match self.repo.write_slot(&self.slot_key, &payload) {
            Ok(()) => {
                debug!(
                    "event=slot_write module=store status=ok slot={} count={} bytes={}",
                    self.slot_key,
                    self.tasks.len(),
                    payload.len()
                );
                self.unsaved = false;
            }
            Err(err) => {
                error!(
                    "event=slot_write module=store status=error error_code=write_failed slot={} error={}",
                    self.slot_key, err
                );
                self.unsaved = true;
            }
        }
    }
}

/// Reads the stored collection. `Err` only when the slot itself is
/// unreadable; malformed payloads decode to an empty collection.
fn read_collection<R: SlotRepository>(repo: &R, slot_key: &str) -> Result<Vec<Task>, ()> {
    let raw = match repo.read_slot(slot_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=slot_load module=store status=ok slot={slot_key} count=0 source=absent");
            return Ok(Vec::new());
        }
        Err(err) => {
            warn!(
                "event=slot_load module=store status=error error_code=read_failed slot={slot_key} error={err}"
            );
            return Err(());
        }
    };

    if raw.trim().is_empty() {
        info!("event=slot_load module=store status=ok slot={slot_key} count=0 source=empty");
        return Ok(Vec::new());
    }

    let tasks = match decode_tasks(&raw) {
        Ok(tasks) => {
            info!(
                "event=slot_load module=store status=ok slot={} count={} source=stored",
                slot_key,
                tasks.len()
            );
            tasks
        }
        Err(err) => {
            warn!(
                "event=slot_load module=store status=error error_code=malformed_payload slot={slot_key} error={err}"
            );
            Vec::new()
        }
    };
    Ok(tasks)
}

/// Next `updated_at` value: `now`, or one millisecond past `previous` when
/// the clock has not moved beyond it.
///
/// Never exceeds `LATEST_TIMESTAMP_MILLIS`; past that the stamp could no
/// longer be written as a four-digit-year ISO string.
fn advance_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let next = if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    };
    match DateTime::from_timestamp_millis(LATEST_TIMESTAMP_MILLIS) {
        Some(latest) => next.min(latest),
        None => next,
    }
}
