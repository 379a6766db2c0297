//! Domain model for todo records.
//!
//! # Responsibility
//! - Define the canonical `Todo` record and its validated write inputs.
//! - Own timestamp formatting shared by every write path.
//!
//! # Invariants
//! - Every todo is identified by a storage-assigned `TodoId` that never changes.
//! - A persisted title is never empty or whitespace-only.
//! - Deletion is permanent; there is no tombstone state.

pub mod timestamp;
pub mod todo;
