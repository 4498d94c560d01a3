// SPDX-License-Identifier: AGPL-3.0-or-later
//! Storage backend trait

use async_trait::async_trait;
use bytes::Bytes;
use orb_core::{GenericObject, ObjectId, OrbError, OrbResult};
use std::path::PathBuf;

/// One provider's storage, addressed by provider-relative object ids
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn display_name(&self) -> &str;

    async fn is_available(&self) -> bool;
    async fn list_folder_content(&self, path: &ObjectId) -> OrbResult<Vec<GenericObject>>;
    async fn read_file(&self, path: &ObjectId) -> OrbResult<Bytes>;
    async fn write_file(&self, path: &ObjectId, data: Bytes) -> OrbResult<()>;
    /// Create `entry` as a child of `parent`; folders become directories
    async fn create(&self, parent: &ObjectId, entry: &GenericObject) -> OrbResult<()>;
    async fn rename(&self, path: &ObjectId, new_name: &str) -> OrbResult<()>;
    /// Move `path` into the directory `new_parent` of the same backend
    async fn move_to(&self, path: &ObjectId, new_parent: &ObjectId) -> OrbResult<()>;
    async fn delete(&self, path: &ObjectId) -> OrbResult<()>;

    // Optional methods with defaults

    /// Path on the local machine, for backends that have one
    fn local_path(&self, _path: &ObjectId) -> OrbResult<PathBuf> {
        Err(OrbError::Unsupported(format!("{} has no local paths", self.display_name())))
    }
}
