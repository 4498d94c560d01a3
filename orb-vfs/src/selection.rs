// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lockable selection over the current listing

/// Indices into the current listing
///
/// Mutators report whether anything changed so the owner knows when to
/// notify. While locked every mutation is refused.
#[derive(Debug, Default)]
pub struct Selection {
    indices: Vec<usize>,
    locked: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an index; selecting an index twice is a no-op
    pub fn select(&mut self, index: usize) -> bool {
        if self.locked || self.indices.contains(&index) {
            return false;
        }
        self.indices.push(index);
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.indices.clear();
        true
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
