//! Persistence contracts and implementations for collection snapshots.
//!
//! # Responsibility
//! - Define the slot-level storage contract used by the store.
//! - Isolate SQLite details from store and service orchestration.
//!
//! # Invariants
//! - Repositories move opaque snapshot text; they never parse entities.

pub mod slot_repo;
