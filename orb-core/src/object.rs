// SPDX-License-Identifier: AGPL-3.0-or-later
//! Object identity within a provider's namespace

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Mime strings recognized as directories
pub const DIRECTORY_MIME_TYPES: [&str; 2] = ["inode/directory", "directory"];

/// Mime string of a symbolic link
pub const SYMLINK_MIME_TYPE: &str = "symlink";

/// Mime classification of an entry
///
/// The folder flag is derived from the classification string on first use and
/// memoized; the string itself never changes after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MimeType {
    value: String,
    is_folder: OnceCell<bool>,
}

impl MimeType {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_folder: OnceCell::new(),
        }
    }

    pub fn directory() -> Self {
        Self::new(DIRECTORY_MIME_TYPES[1])
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_folder(&self) -> bool {
        *self
            .is_folder
            .get_or_init(|| DIRECTORY_MIME_TYPES.contains(&self.value.as_str()))
    }

    pub fn is_symlink(&self) -> bool {
        self.value == SYMLINK_MIME_TYPE
    }
}

impl PartialEq for MimeType {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for MimeType {}

impl Hash for MimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl From<String> for MimeType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for MimeType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<MimeType> for String {
    fn from(mime: MimeType) -> Self {
        mime.value
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Identifies an entry within a provider's namespace
///
/// Leading separators are stripped on construction, so building an id from
/// an already normalized path yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    path: String,
    mime_type: MimeType,
}

impl ObjectId {
    pub fn new(path: impl AsRef<str>, mime_type: impl Into<MimeType>) -> Self {
        Self {
            path: path.as_ref().trim_start_matches('/').to_string(),
            mime_type: mime_type.into(),
        }
    }

    pub fn directory(path: impl AsRef<str>) -> Self {
        Self::new(path, MimeType::directory())
    }

    pub fn plain_text(path: impl AsRef<str>) -> Self {
        Self::new(path, "text/plain")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type.is_folder()
    }

    pub fn is_symlink(&self) -> bool {
        self.mime_type.is_symlink()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
