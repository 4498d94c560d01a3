// SPDX-License-Identifier: AGPL-3.0-or-later
//! Listing entries

use chrono::{DateTime, Utc};

use crate::ObjectId;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericObject {
    pub id: ObjectId,
    pub name: String,
    pub modified_at: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl GenericObject {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            modified_at: None,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified_at = Some(modified);
        self
    }

    pub fn is_folder(&self) -> bool {
        self.id.is_folder()
    }

    pub fn is_symlink(&self) -> bool {
        self.id.is_symlink()
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}
