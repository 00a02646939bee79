//! History: the append-only diff log, the position pointer, undo/redo and reconstruction.
//!
//! # Invariants
//! - Entry 0 is the diff from `{}` to the construction-time snapshot.
//! - Folding entries `0..=index` from `{}` reproduces the live snapshot.
//! - The log only grows by appending; a write behind the tip first drops forward entries.

pub mod log;
pub mod timeline;

pub use log::HistoryLog;
pub use timeline::Timeline;
