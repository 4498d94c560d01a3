// SPDX-License-Identifier: AGPL-3.0-or-later
//! Local filesystem backend

use async_trait::async_trait;
use bytes::Bytes;
use orb_core::{
    object::{DIRECTORY_MIME_TYPES, SYMLINK_MIME_TYPE},
    GenericObject, ObjectId, OrbError, OrbResult,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::backend::StorageBackend;

/// Fallback for files whose extension says nothing
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess a mime type from the file extension
pub fn mime_for(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return DEFAULT_MIME_TYPE,
    };
    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "py" => "text/x-python",
        "rs" => "text/x-rust",
        "toml" => "application/toml",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => DEFAULT_MIME_TYPE,
    }
}

fn child_id(parent: &ObjectId, name: &str) -> String {
    if parent.is_root() {
        name.to_string()
    } else {
        format!("{}/{}", parent.path().trim_end_matches('/'), name)
    }
}

fn check_name(name: &str) -> OrbResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(OrbError::InvalidPath(name.to_string()));
    }
    Ok(())
}

/// Local filesystem backend rooted at a directory
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn to_real_path(&self, path: &ObjectId) -> OrbResult<PathBuf> {
        let mut real = self.root.clone();
        for seg in path.path().split('/').filter(|s| !s.is_empty()) {
            if seg == "." || seg == ".." {
                return Err(OrbError::InvalidPath(path.path().to_string()));
            }
            real.push(seg);
        }
        Ok(real)
    }

    /// Classify without following symlinks
    async fn entry_for(&self, id: String, name: String, real: &Path) -> OrbResult<GenericObject> {
        let meta = fs::symlink_metadata(real).await?;
        let mime_type = if meta.file_type().is_symlink() {
            SYMLINK_MIME_TYPE
        } else if meta.is_dir() {
            DIRECTORY_MIME_TYPES[0]
        } else {
            mime_for(&name)
        };

        let mut entry = GenericObject::new(ObjectId::new(id, mime_type), name);
        if meta.is_file() {
            entry.size = Some(meta.len());
        }
        if let Ok(modified) = meta.modified() {
            entry.modified_at = Some(modified.into());
        }
        Ok(entry)
    }

    async fn exists(real: &Path) -> bool {
        fs::symlink_metadata(real).await.is_ok()
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn display_name(&self) -> &str {
        "Local Filesystem"
    }

    async fn is_available(&self) -> bool {
        fs::metadata(&self.root).await.map(|m| m.is_dir()).unwrap_or(false)
    }

    async fn list_folder_content(&self, path: &ObjectId) -> OrbResult<Vec<GenericObject>> {
        let real = self.to_real_path(path)?;
        match fs::metadata(&real).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(OrbError::NotADirectory(path.to_string())),
            Err(_) => return Err(OrbError::NotFound(path.to_string())),
        }

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&real).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let id = child_id(path, &name);
            // Entries can vanish between readdir and stat
            match self.entry_for(id, name, &entry.path()).await {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        Ok(entries)
    }

    async fn read_file(&self, path: &ObjectId) -> OrbResult<Bytes> {
        let real = self.to_real_path(path)?;
        match fs::metadata(&real).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(OrbError::NotAFile(path.to_string())),
            Err(_) => return Err(OrbError::NotFound(path.to_string())),
        }
        Ok(Bytes::from(fs::read(&real).await?))
    }

    async fn write_file(&self, path: &ObjectId, data: Bytes) -> OrbResult<()> {
        let real = self.to_real_path(path)?;
        if real.is_dir() {
            return Err(OrbError::NotAFile(path.to_string()));
        }
        if let Some(parent) = real.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&real, &data).await?;
        Ok(())
    }

    async fn create(&self, parent: &ObjectId, entry: &GenericObject) -> OrbResult<()> {
        check_name(&entry.name)?;
        let target = self.to_real_path(parent)?.join(&entry.name);
        if Self::exists(&target).await {
            return Err(OrbError::AlreadyExists(child_id(parent, &entry.name)));
        }

        if entry.is_folder() {
            fs::create_dir(&target).await?;
        } else {
            fs::write(&target, b"").await?;
        }
        Ok(())
    }

    async fn rename(&self, path: &ObjectId, new_name: &str) -> OrbResult<()> {
        check_name(new_name)?;
        let real = self.to_real_path(path)?;
        if path.is_root() || !Self::exists(&real).await {
            return Err(OrbError::NotFound(path.to_string()));
        }
        let dest = match real.parent() {
            Some(parent) => parent.join(new_name),
            None => return Err(OrbError::InvalidPath(path.to_string())),
        };
        if Self::exists(&dest).await {
            return Err(OrbError::AlreadyExists(new_name.to_string()));
        }

        fs::rename(&real, &dest).await?;
        Ok(())
    }

    async fn move_to(&self, path: &ObjectId, new_parent: &ObjectId) -> OrbResult<()> {
        let real = self.to_real_path(path)?;
        if path.is_root() || !Self::exists(&real).await {
            return Err(OrbError::NotFound(path.to_string()));
        }
        let parent = self.to_real_path(new_parent)?;
        if !parent.is_dir() {
            return Err(OrbError::NotADirectory(new_parent.to_string()));
        }
        let dest = match real.file_name() {
            Some(name) => parent.join(name),
            None => return Err(OrbError::InvalidPath(path.to_string())),
        };
        if dest.starts_with(&real) {
            return Err(OrbError::InvalidPath(format!("cannot move {path} into itself")));
        }
        if Self::exists(&dest).await {
            return Err(OrbError::AlreadyExists(dest.display().to_string()));
        }

        fs::rename(&real, &dest).await?;
        Ok(())
    }

    async fn delete(&self, path: &ObjectId) -> OrbResult<()> {
        let real = self.to_real_path(path)?;
        if path.is_root() {
            return Err(OrbError::PermissionDenied("refusing to delete the provider root".into()));
        }
        let meta = match fs::symlink_metadata(&real).await {
            Ok(meta) => meta,
            Err(_) => return Err(OrbError::NotFound(path.to_string())),
        };

        if meta.is_dir() {
            fs::remove_dir_all(&real).await?;
        } else {
            fs::remove_file(&real).await?;
        }
        Ok(())
    }

    fn local_path(&self, path: &ObjectId) -> OrbResult<PathBuf> {
        self.to_real_path(path)
    }
}
