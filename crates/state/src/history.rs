//! Undo/redo history
//!
//! [`History`] is a bounded, linear log of snapshots with a cursor pointing
//! at the current one. It is a dumb stack: it never compares snapshots, so
//! pushing a value equal to the current one still records a new entry.
//!
//! Invariants, after every operation:
//!
//! - `1 <= len() <= max_size()`
//! - `cursor() < len()`
//!
//! Undo and redo hand back a [`Transition`] token. Until the caller settles
//! it, pushes are suppressed, so a reactive re-push fired while the caller
//! applies the restored snapshot cannot overwrite the transition.

use std::collections::VecDeque;
use tracing::{debug, trace};

/// Default number of snapshots kept
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Outcome of [`History::push`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The snapshot became the new current entry
    Recorded,
    /// An undo/redo transition is still being applied; the log is untouched
    Suppressed,
}

/// Token for an undo/redo transition in progress
///
/// Hand it back to [`History::settle`] once the restored snapshot has been
/// applied everywhere it needs to go.
#[derive(Debug)]
#[must_use = "a transition suppresses pushes until it is settled"]
pub struct Transition<T> {
    snapshot: T,
    generation: u64,
}

impl<T> Transition<T> {
    /// The snapshot that became current
    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }
}

/// Bounded linear undo/redo log
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    max_size: usize,
    /// Generation of the outstanding transition, if any
    applying: Option<u64>,
    generation: u64,
}

impl<T: Clone> History<T> {
    /// Create a history seeded with the initial snapshot
    pub fn new(initial: T) -> Self {
        Self::with_max_size(initial, DEFAULT_MAX_HISTORY)
    }

    /// Create a history with a custom bound (at least one entry is kept)
    pub fn with_max_size(initial: T, max_size: usize) -> Self {
        let max_size = max_size.max(1);
        let mut entries = VecDeque::with_capacity(max_size.min(DEFAULT_MAX_HISTORY));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            max_size,
            applying: None,
            generation: 0,
        }
    }

    /// Record a new snapshot as the current state
    ///
    /// Discards any redo entries past the cursor, then evicts the oldest
    /// entry if the bound is exceeded.
    pub fn push(&mut self, snapshot: T) -> PushOutcome {
        if self.applying.is_some() {
            debug!("history push suppressed during undo/redo transition");
            return PushOutcome::Suppressed;
        }

        let discarded = self.entries.len() - (self.cursor + 1);
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);

        if self.entries.len() > self.max_size {
            self.entries.pop_front();
            trace!("history full, evicted oldest snapshot");
        }
        self.cursor = self.entries.len() - 1;

        trace!(
            cursor = self.cursor,
            len = self.entries.len(),
            discarded,
            "history push"
        );
        PushOutcome::Recorded
    }

    /// Step back one entry
    ///
    /// Returns `None` (and changes nothing) at the oldest entry.
    pub fn undo(&mut self) -> Option<Transition<T>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "undo");
        Some(self.begin_transition())
    }

    /// Step forward one entry
    ///
    /// Returns `None` (and changes nothing) at the newest entry.
    pub fn redo(&mut self) -> Option<Transition<T>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "redo");
        Some(self.begin_transition())
    }

    /// Mark a transition as fully applied, re-enabling pushes
    ///
    /// A token superseded by a later undo/redo leaves the newer transition
    /// in place. Returns whether the guard was cleared.
    pub fn settle(&mut self, transition: Transition<T>) -> bool {
        if self.applying == Some(transition.generation) {
            self.applying = None;
            true
        } else {
            false
        }
    }

    fn begin_transition(&mut self) -> Transition<T> {
        self.generation += 1;
        self.applying = Some(self.generation);
        Transition {
            snapshot: self.current().clone(),
            generation: self.generation,
        }
    }

    /// Replace the whole log with a single seed entry
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
        self.applying = None;
    }
}

impl<T> History<T> {
    /// The current snapshot
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Whether there is an older entry to step back to
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether there is a newer entry to step forward to
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of entries in the log
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the log holds at least its seed entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the current entry
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of entries kept
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of undo steps available
    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    /// Number of redo steps available
    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    /// Whether an undo/redo transition is waiting to be settled
    pub fn is_transitioning(&self) -> bool {
        self.applying.is_some()
    }

    /// Iterate over the entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
