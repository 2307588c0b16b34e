//! Key-value slot storage contracts and implementations.
//!
//! # Responsibility
//! - Define the slot read/write contract the task store persists through.
//! - Isolate SQLite details from store orchestration.
//!
//! # Invariants
//! - A slot holds one opaque string value; writes replace it wholesale.
//! - Slot keys are non-empty.

pub mod slot_repo;
