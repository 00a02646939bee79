use crate::log::HistoryLog;
use rewind_common::Snapshot;
use rewind_diff::Diff;

/// A [`HistoryLog`] paired with the position pointer into it.
///
/// The timeline does not own the live snapshot; callers pass it in so undo
/// and redo can rewrite it. The caller is responsible for keeping the live
/// snapshot equal to `log().reconstruct(index())`.
#[derive(Debug, Clone)]
pub struct Timeline {
    log: HistoryLog,
    index: usize,
}

impl Timeline {
    /// Create a timeline positioned at the construction-time entry.
    pub fn new(initial: &Snapshot) -> Self {
        Self {
            log: HistoryLog::new(initial),
            index: 0,
        }
    }

    /// Current position pointer.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    /// Number of entries in the log, including forward history.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Always false: a timeline starts with the construction-time entry and never drops it.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Whether there are entries that can be undone.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether there are entries that can be redone.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.log.len()
    }

    /// Record a write that turned `before` into `after`. Returns the new index.
    ///
    /// Any forward history is discarded first and cannot be redone afterwards.
    pub fn record(&mut self, before: &Snapshot, after: &Snapshot) -> usize {
        if self.can_redo() {
            tracing::debug!(
                index = self.index,
                dropped = self.log.len() - self.index - 1,
                "discarding forward history"
            );
            self.log.truncate_after(self.index);
        }
        self.log.append(Diff::compute(before, after));
        self.index += 1;
        self.index
    }

    /// Move back up to `steps` entries and rebuild `live`. Returns the number of steps taken.
    pub fn undo(&mut self, steps: usize, live: &mut Snapshot) -> usize {
        let target = self.index.saturating_sub(steps);
        let moved = self.index - target;
        if moved == 0 {
            return 0;
        }
        let Some(snapshot) = self.log.reconstruct(target) else {
            return 0;
        };
        *live = snapshot;
        self.index = target;
        tracing::debug!(index = self.index, moved, "undo");
        moved
    }

    /// Move forward up to `steps` entries, applying each to `live`. Returns the number of steps taken.
    pub fn redo(&mut self, steps: usize, live: &mut Snapshot) -> usize {
        let last = self.log.len().saturating_sub(1);
        let target = self.index.saturating_add(steps).min(last);
        let moved = target.saturating_sub(self.index);
        if moved == 0 {
            return 0;
        }
        for diff in &self.log.entries()[self.index + 1..=target] {
            diff.apply_in_place(live);
        }
        self.index = target;
        tracing::debug!(index = self.index, moved, "redo");
        moved
    }

    /// Every snapshot in the log, up to log position `limit` if given.
    pub fn history(&self, limit: Option<usize>) -> Vec<Snapshot> {
        self.log.reconstruct_range(0, capped(self.log.len(), limit))
    }

    /// Snapshots strictly ahead of the pointer, i.e. those available for redo.
    pub fn history_forward(&self, limit: Option<usize>) -> Vec<Snapshot> {
        self.log.reconstruct_range(self.index + 1, capped(self.log.len(), limit))
    }

    /// Snapshots at or behind the pointer.
    pub fn history_backward(&self, limit: Option<usize>) -> Vec<Snapshot> {
        self.log.reconstruct_range(0, capped(self.index, limit))
    }
}

fn capped(end: usize, limit: Option<usize>) -> usize {
    limit.map_or(end, |n| n.min(end))
}
