use rewind_common::{KeyPath, Snapshot, ValueKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single keyed change inside a [`Diff`].
///
/// Serialized as `{"type": "put", "key": [...], "value": ...}` or
/// `{"type": "del", "key": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Change {
    /// Set the value at `key`, adding it if absent.
    Put { key: KeyPath, value: Value },
    /// Remove the value at `key`.
    Del { key: KeyPath },
}

impl Change {
    /// Path this change addresses.
    pub fn key(&self) -> &KeyPath {
        match self {
            Self::Put { key, .. } | Self::Del { key } => key,
        }
    }
}

/// Errors from strict diff application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("change has an empty key path")]
    EmptyPath,
    #[error("cannot descend into {kind} at {path}")]
    NotAnObject { path: KeyPath, kind: ValueKind },
}

/// The transformation from one snapshot to another, as an ordered list of changes.
///
/// Object values present on both sides are recursed into, so a change to a
/// nested field is recorded at its full path. Arrays and scalars are atomic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diff {
    changes: Vec<Change>,
}

impl Diff {
    /// Wrap a hand-built list of changes.
    pub fn from_changes(changes: Vec<Change>) -> Self {
        Self { changes }
    }

    /// Compute the diff that turns `before` into `after`.
    pub fn compute(before: &Snapshot, after: &Snapshot) -> Self {
        let mut changes = Vec::new();
        diff_objects(before, after, &KeyPath::root(), &mut changes);
        tracing::trace!(changes = changes.len(), "computed diff");
        Self { changes }
    }

    /// Apply this diff to a copy of `base`.
    ///
    /// Malformed changes are skipped with a warning; use [`Diff::try_apply`]
    /// to reject them instead.
    pub fn apply(&self, base: &Snapshot) -> Snapshot {
        let mut out = base.clone();
        self.apply_in_place(&mut out);
        out
    }

    /// Apply this diff directly to `target`, skipping malformed changes.
    pub fn apply_in_place(&self, target: &mut Snapshot) {
        for change in &self.changes {
            if let Err(e) = apply_change(target, change) {
                tracing::warn!(key = %change.key(), "skipping change: {e}");
            }
        }
    }

    /// Apply this diff to a copy of `base`, failing on the first malformed change.
    pub fn try_apply(&self, base: &Snapshot) -> Result<Snapshot, DiffError> {
        let mut out = base.clone();
        for change in &self.changes {
            apply_change(&mut out, change)?;
        }
        Ok(out)
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the diff records no change at all.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

fn diff_objects(before: &Snapshot, after: &Snapshot, path: &KeyPath, changes: &mut Vec<Change>) {
    for (key, old) in before {
        match after.get(key) {
            None => changes.push(Change::Del {
                key: path.child(key.as_str()),
            }),
            Some(new) if new == old => {}
            Some(new) => match (old, new) {
                (Value::Object(old), Value::Object(new)) => {
                    diff_objects(old, new, &path.child(key.as_str()), changes);
                }
                _ => changes.push(Change::Put {
                    key: path.child(key.as_str()),
                    value: new.clone(),
                }),
            },
        }
    }
    for (key, new) in after {
        if !before.contains_key(key) {
            changes.push(Change::Put {
                key: path.child(key.as_str()),
                value: new.clone(),
            });
        }
    }
}

/// Walk to the parent object of `change.key()` and perform the change there.
///
/// A put creates missing intermediate objects; a delete under a missing
/// parent has nothing to remove.
fn apply_change(target: &mut Snapshot, change: &Change) -> Result<(), DiffError> {
    let Some((last, parents)) = change.key().split_last() else {
        return Err(DiffError::EmptyPath);
    };

    let mut cursor = target;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = match change {
            Change::Put { .. } => cursor
                .entry(segment.as_str())
                .or_insert_with(|| Value::Object(Map::new())),
            Change::Del { .. } => match cursor.get_mut(segment) {
                Some(slot) => slot,
                None => return Ok(()),
            },
        };
        cursor = match slot {
            Value::Object(map) => map,
            other => {
                return Err(DiffError::NotAnObject {
                    path: parents[..=depth].iter().collect(),
                    kind: ValueKind::of(other),
                });
            }
        };
    }

    match change {
        Change::Put { value, .. } => {
            cursor.insert(last.clone(), value.clone());
        }
        Change::Del { .. } => {
            cursor.remove(last);
        }
    }
    Ok(())
}
