//! Drag-and-drop completion handling.
//!
//! # Invariants
//! - Column ids are status wire strings (`todo`, `in-progress`, `completed`).
//! - Dropping outside a known column changes nothing.
//! - Reordering inside one column changes nothing; display order is always
//!   insertion order.

use super::clock::Clock;
use super::task_store::TaskStore;
use crate::model::task::{TaskId, TaskStatus};
use crate::repo::slot_repo::SlotRepository;
use log::debug;

/// A finished drag reported by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: TaskId,
    pub source_column: String,
    /// `None` when the card was released outside every column.
    pub destination_column: Option<String>,
}

impl DropEvent {
    pub fn new(
        task_id: impl Into<TaskId>,
        source_column: impl Into<String>,
        destination_column: Option<&str>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            source_column: source_column.into(),
            destination_column: destination_column.map(str::to_string),
        }
    }
}

/// What a drop did to the canonical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Outside any column, unknown column, or unknown task.
    Ignored,
    /// Same column; only the rendering layer's transient order changed.
    Reordered,
    Moved(TaskStatus),
}

impl<R: SlotRepository, C: Clock> TaskStore<R, C> {
    /// Applies a drag completion: a cross-column drop sets the status to
    /// the destination column.
    pub fn apply_drop(&mut self, event: &DropEvent) -> DropOutcome {
        let Some(destination) = event.destination_column.as_deref() else {
            debug!(
                "event=task_drop module=store status=skip reason=no_destination task_id={}",
                event.task_id
            );
            return DropOutcome::Ignored;
        };

        let Ok(status) = destination.parse::<TaskStatus>() else {
            debug!(
                "event=task_drop module=store status=skip reason=unknown_column task_id={}",
                event.task_id
            );
            return DropOutcome::Ignored;
        };

        if destination == event.source_column {
            return DropOutcome::Reordered;
        }

        if self.set_status(&event.task_id, status) {
            DropOutcome::Moved(status)
        } else {
            DropOutcome::Ignored
        }
    }
}
