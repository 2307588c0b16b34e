//! JSON encoding of the task collection stored in a slot.
//!
//! # Invariants
//! - The payload is a bare JSON array of task records; no version field.
//! - A payload decodes only if every record is valid and ids are unique.

use crate::model::task::{Task, TaskId, TaskValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a stored payload could not be turned into a collection.
#[derive(Debug)]
pub enum SlotDecodeError {
    Json(serde_json::Error),
    InvalidRecord {
        index: usize,
        error: TaskValidationError,
    },
    DuplicateId(TaskId),
}

impl Display for SlotDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed task payload: {err}"),
            Self::InvalidRecord { index, error } => {
                write!(f, "invalid task record at index {index}: {error}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate task id `{id}`"),
        }
    }
}

impl Error for SlotDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidRecord { error, .. } => Some(error),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SlotDecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Decodes a slot payload into an ordered collection.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, SlotDecodeError> {
    let tasks: Vec<Task> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        task.validate()
            .map_err(|error| SlotDecodeError::InvalidRecord { index, error })?;
        if !seen.insert(task.id.as_str()) {
            return Err(SlotDecodeError::DuplicateId(task.id.clone()));
        }
    }

    Ok(tasks)
}

/// Encodes the full collection for a slot overwrite.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}
