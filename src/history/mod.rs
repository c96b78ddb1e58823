//! # Undo/Redo History
//!
//! [`History`] wraps any [`Reducer`] with a linear, branch-discarding log:
//!
//! ```text
//! past: [s0, s1]   current: s2   future: [s3, s4]
//!        undo ← moves current to the front of future
//!        redo → moves current to the end of past
//!        dispatch → pushes current to past, clears future
//! ```
//!
//! Snapshots are `Arc`s, so every entry is shared, never copied.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reducer::Reducer;

/// Derived history flags for UI controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Undo/redo decorator around an inner reducer.
pub struct History<R: Reducer> {
    reducer: R,
    past: Vec<Arc<R::State>>,
    current: Arc<R::State>,
    future: VecDeque<Arc<R::State>>,
    /// Maximum `past` length; oldest entries are dropped first.
    limit: Option<usize>,
}

impl<R: Reducer> History<R> {
    pub fn new(reducer: R, initial: R::State) -> Self {
        Self::from_snapshot(reducer, Arc::new(initial))
    }

    pub fn from_snapshot(reducer: R, initial: Arc<R::State>) -> Self {
        Self {
            reducer,
            past: Vec::new(),
            current: initial,
            future: VecDeque::new(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.enforce_limit();
        self
    }

    pub fn current(&self) -> &Arc<R::State> {
        &self.current
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Run `action` through the inner reducer. Returns `true` when the state
    /// changed and a history entry was recorded. The redo branch is
    /// discarded either way.
    pub fn dispatch(&mut self, action: &R::Action) -> bool {
        let next = self.reducer.reduce(&self.current, action);
        self.future.clear();

        if Arc::ptr_eq(&next, &self.current) {
            return false;
        }

        let prev = std::mem::replace(&mut self.current, next);
        self.past.push(prev);
        self.enforce_limit();
        debug!(past = self.past.len(), "history entry recorded");
        true
    }

    /// Step back one entry. No-op (returns `false`) at the start of the log.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, prev);
        self.future.push_front(current);
        debug!(past = self.past.len(), future = self.future.len(), "undo");
        true
    }

    /// Step forward one entry. No-op (returns `false`) at the end of the log.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.past.push(current);
        self.enforce_limit();
        debug!(past = self.past.len(), future = self.future.len(), "redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus { can_undo: self.can_undo(), can_redo: self.can_redo() }
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Drop the whole log and start over from `initial`.
    pub fn reset(&mut self, initial: R::State) {
        self.past.clear();
        self.future.clear();
        self.current = Arc::new(initial);
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
    }
}

impl<R> std::fmt::Debug for History<R>
where
    R: Reducer,
    R::State: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("past", &self.past.len())
            .field("current", &self.current)
            .field("future", &self.future.len())
            .finish()
    }
}
