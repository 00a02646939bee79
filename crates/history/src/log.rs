use rewind_common::Snapshot;
use rewind_diff::Diff;
use serde::{Deserialize, Serialize};

/// Ordered log of diffs; folding a prefix from `{}` yields a past snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<Diff>,
}

impl HistoryLog {
    /// Start a log whose first entry builds `initial` from the empty object.
    pub fn new(initial: &Snapshot) -> Self {
        Self {
            entries: vec![Diff::compute(&Snapshot::new(), initial)],
        }
    }

    /// Append a diff. Entries are never modified after writing.
    pub fn append(&mut self, diff: Diff) {
        self.entries.push(diff);
    }

    /// Drop every entry after `index`.
    pub fn truncate_after(&mut self, index: usize) {
        self.entries.truncate(index.saturating_add(1));
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Diff> {
        self.entries.get(index)
    }

    /// Read-only access to all entries.
    pub fn entries(&self) -> &[Diff] {
        &self.entries
    }

    /// The snapshot after entry `index` has been applied.
    pub fn reconstruct(&self, index: usize) -> Option<Snapshot> {
        let prefix = self.entries.get(..=index)?;
        let mut running = Snapshot::new();
        for diff in prefix {
            diff.apply_in_place(&mut running);
        }
        Some(running)
    }

    /// Snapshots after each entry in `start..=end`, with `end` clamped to the last entry.
    ///
    /// Entries before `start` are folded but not returned, so every element is
    /// a full state rather than a partial one.
    pub fn reconstruct_range(&self, start: usize, end: usize) -> Vec<Snapshot> {
        let _span = tracing::info_span!("reconstruct_range", start, end).entered();
        let Some(last) = self.entries.len().checked_sub(1) else {
            return Vec::new();
        };
        let end = end.min(last);
        if start > end {
            return Vec::new();
        }

        let mut running = Snapshot::new();
        let mut out = Vec::with_capacity(end - start + 1);
        for (i, diff) in self.entries[..=end].iter().enumerate() {
            diff.apply_in_place(&mut running);
            if i >= start {
                out.push(running.clone());
            }
        }
        out
    }
}
