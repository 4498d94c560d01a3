// SPDX-License-Identifier: AGPL-3.0-or-later
//! Back/forward navigation history

use orb_core::ProviderId;

use crate::path_stack::PathStack;

/// Owned snapshot of a browsing location
///
/// Entries never share storage with the live path stack: they are copied in
/// through [`HistoryEntry::snapshot`] and copied out on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: PathStack,
    pub provider: Option<ProviderId>,
}

impl HistoryEntry {
    pub fn snapshot(path: &PathStack, provider: Option<&ProviderId>) -> Self {
        Self {
            path: path.clone(),
            provider: provider.cloned(),
        }
    }
}

/// Past and future stacks with browser semantics
#[derive(Debug, Default)]
pub struct History {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new location and drop everything ahead of it
    pub fn push(&mut self, entry: HistoryEntry) {
        self.past.push(entry);
        self.future.clear();
    }

    /// Step back to the previous location
    ///
    /// Returns `None`, leaving both stacks untouched, when there is no entry
    /// before the current one.
    pub fn go_back(&mut self) -> Option<HistoryEntry> {
        if self.past.len() < 2 {
            return None;
        }
        let current = self.past.pop()?;
        self.future.push(current);
        self.past.last().cloned()
    }

    /// Step forward to the location last left with [`History::go_back`]
    pub fn go_forward(&mut self) -> Option<HistoryEntry> {
        let next = self.future.pop()?;
        self.past.push(next);
        self.past.last().cloned()
    }

    pub fn can_go_back(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_go_forward(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.past.last()
    }
}
