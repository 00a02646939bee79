use rewind_common::{Snapshot, ValueKind};
use rewind_diff::Diff;
use rewind_history::Timeline;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Control names that can never be stored or written as top-level fields.
pub const RESERVED_KEYS: [&str; 6] = [
    "$$index",
    "$$history",
    "$$historyForward",
    "$$historyBackward",
    "$$undo",
    "$$redo",
];

/// Errors from record construction and writes.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("expecting value to be plain object, got {kind}")]
    NotPlainObject { kind: ValueKind },
    #[error("`{0}` is a reserved control name and cannot be written")]
    ReservedKey(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A plain object with change tracking, undo and redo.
///
/// Reads go straight to the live snapshot. Every write is diffed against the
/// previous state and appended to the history; writing after an undo discards
/// the entries that could have been redone.
#[derive(Debug, Clone)]
pub struct Versioned {
    current: Snapshot,
    timeline: Timeline,
}

impl Versioned {
    /// Wrap `value`, which must be a JSON object.
    pub fn new(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(initial) => Self::from_snapshot(initial),
            other => Err(RecordError::NotPlainObject {
                kind: ValueKind::of(&other),
            }),
        }
    }

    /// Wrap a snapshot. Fails if a top-level key is a reserved control name.
    pub fn from_snapshot(initial: Snapshot) -> Result<Self, RecordError> {
        for key in initial.keys() {
            check_writable(key)?;
        }
        Ok(Self::wrap(initial))
    }

    fn wrap(initial: Snapshot) -> Self {
        let timeline = Timeline::new(&initial);
        Self {
            current: initial,
            timeline,
        }
    }

    /// Wrap the serialized form of `value`, which must serialize to an object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RecordError> {
        Self::new(serde_json::to_value(value)?)
    }

    /// Deserialize the live snapshot into `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        Ok(serde_json::from_value(Value::Object(self.current.clone()))?)
    }

    /// Live value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.current.get(key)
    }

    /// Borrow the live snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Set a field and record the change. Returns the stored value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<&Value, RecordError> {
        let key = key.into();
        check_writable(&key)?;

        let before = self.current.clone();
        self.current.insert(key.clone(), value);
        let index = self.timeline.record(&before, &self.current);
        tracing::debug!(%key, index, "write");
        Ok(&self.current[&key])
    }

    /// Remove a field and record the change. Returns the removed value, if any.
    ///
    /// Removing a missing field still counts as a write and adds an empty entry.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, RecordError> {
        check_writable(key)?;

        let before = self.current.clone();
        let removed = self.current.remove(key);
        let index = self.timeline.record(&before, &self.current);
        tracing::debug!(key, index, existed = removed.is_some(), "remove");
        Ok(removed)
    }

    /// Current position in the history.
    pub fn index(&self) -> usize {
        self.timeline.index()
    }

    /// Number of history entries, including ones ahead of the index.
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Always false: the construction-time entry is never dropped.
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Every snapshot in the history, up to position `limit` if given.
    pub fn history(&self, limit: Option<usize>) -> Vec<Snapshot> {
        self.timeline.history(limit)
    }

    /// Snapshots ahead of the index, available for redo.
    pub fn history_forward(&self, limit: Option<usize>) -> Vec<Snapshot> {
        self.timeline.history_forward(limit)
    }

    /// Snapshots at or behind the index.
    pub fn history_backward(&self, limit: Option<usize>) -> Vec<Snapshot> {
        self.timeline.history_backward(limit)
    }

    /// Step back up to `steps` writes. Returns the number of steps taken.
    pub fn undo(&mut self, steps: usize) -> usize {
        self.timeline.undo(steps, &mut self.current)
    }

    /// Step forward up to `steps` undone writes. Returns the number of steps taken.
    pub fn redo(&mut self, steps: usize) -> usize {
        self.timeline.redo(steps, &mut self.current)
    }

    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }

    /// The recorded diffs, entry 0 first.
    pub fn diffs(&self) -> &[Diff] {
        self.timeline.log().entries()
    }
}

impl Default for Versioned {
    fn default() -> Self {
        Self::wrap(Map::new())
    }
}

impl TryFrom<Value> for Versioned {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn check_writable(key: &str) -> Result<(), RecordError> {
    if RESERVED_KEYS.contains(&key) {
        return Err(RecordError::ReservedKey(key.to_string()));
    }
    Ok(())
}
