//! Versioned records: a plain object whose every write becomes an undoable history entry.
//!
//! # Invariants
//! - Every accepted write appends exactly one history entry and advances the index by one.
//! - The live snapshot is only ever changed through the write protocol, undo or redo.
//! - Reserved control names are never stored as top-level fields.
//!
//! ```
//! use rewind_record::Versioned;
//! use serde_json::json;
//!
//! let mut record = Versioned::new(json!({ "value": "Hello" }))?;
//! record.set("value", json!("Hello Sam"))?;
//! record.undo(1);
//! assert_eq!(record.get("value"), Some(&json!("Hello")));
//! record.redo(1);
//! assert_eq!(record.get("value"), Some(&json!("Hello Sam")));
//! # Ok::<(), rewind_record::RecordError>(())
//! ```

pub mod record;

pub use record::{RESERVED_KEYS, RecordError, Versioned};
