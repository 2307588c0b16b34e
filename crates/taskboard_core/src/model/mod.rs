//! Board domain model.
//!
//! # Responsibility
//! - Define the task record persisted in the board slot.
//! - Define the closed priority/status enums and their wire strings.
//!
//! # Invariants
//! - Every task is identified by a stable, non-empty `TaskId`.
//! - Status is always one of the three board columns.

pub mod task;
