//! Domain model for annual goal tracking.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one goal shape for persistence, share snapshots and plan import.
//!
//! # Invariants
//! - Every goal is identified by a non-empty `GoalId`.
//! - Categories form a closed set; unknown values never pass validation.
//!
//! # See also
//! - docs/architecture/share-snapshot.md

pub mod goal;
pub mod progress;
