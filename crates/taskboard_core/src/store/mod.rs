//! Task store: the single owner of the board collection.
//!
//! # Responsibility
//! - Load the collection once from a slot, write it back after each mutation.
//! - Expose add/update/delete/toggle/set-status and drop handling.
//!
//! # Invariants
//! - Store operations never return errors; storage failures are logged.
//! - In-memory state is authoritative for the running session.

pub mod clock;
pub mod codec;
pub mod drop;
pub mod task_store;
