//! Diff Engine: structural differences between snapshots and their application.
//!
//! # Invariants
//! - `Diff::compute` is pure and deterministic.
//! - Applying `Diff::compute(a, b)` to `a` yields exactly `b`.
//! - Nested objects are diffed key by key; every other value is atomic.

pub mod diff;

pub use diff::{Change, Diff, DiffError};
