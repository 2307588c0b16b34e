//! Derived board views.
//!
//! # Responsibility
//! - Filter and partition the canonical collection for display.
//! - Provide presentation-only date helpers.
//!
//! # Invariants
//! - Views borrow the collection and never reorder or mutate it.
//! - Views are recomputed on every call; nothing is cached.

pub mod projector;
