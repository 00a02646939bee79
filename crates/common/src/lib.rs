//! Shared types for the rewind workspace.
//!
//! # Invariants
//! - A snapshot is always a JSON object at the root.
//! - Key paths address values from the root of a snapshot.

pub mod types;

pub use types::{KeyPath, Snapshot, ValueKind};
