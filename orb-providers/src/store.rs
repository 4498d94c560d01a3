// SPDX-License-Identifier: AGPL-3.0-or-later
//! Persistent provider configurations
//!
//! One JSON file per provider, named `<id>.<kind>` with the kind's wire
//! name, holding the provider's data payload.

use orb_core::{OrbError, OrbResult, ProviderId, ProviderKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub struct ProviderStore {
    dir: PathBuf,
}

impl ProviderStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, provider: &ProviderId) -> OrbResult<PathBuf> {
        if provider.id.is_empty() || provider.id.contains(['/', '\\']) {
            return Err(OrbError::InvalidPath(provider.id.clone()));
        }
        Ok(self.dir.join(provider.key()))
    }

    /// Read every stored provider; unreadable files are skipped
    pub async fn load(&self) -> OrbResult<Vec<ProviderId>> {
        fs::create_dir_all(&self.dir).await?;

        let mut providers = Vec::new();
        let mut read_dir = fs::read_dir(&self.dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            match self.load_one(&name, &entry.path()).await {
                Ok(provider) => providers.push(provider),
                Err(e) => warn!("Skipping stored provider {}: {}", name, e),
            }
        }

        providers.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Loaded {} stored providers from {}", providers.len(), self.dir.display());
        Ok(providers)
    }

    async fn load_one(&self, name: &str, path: &Path) -> OrbResult<ProviderId> {
        let (id, kind) = name
            .rsplit_once('.')
            .ok_or_else(|| OrbError::InvalidRecord(format!("no kind suffix in {name}")))?;
        let kind: ProviderKind = kind.parse()?;
        let content = fs::read(path).await?;
        let data: serde_json::Value = serde_json::from_slice(&content)?;
        Ok(ProviderId::new(id, kind).with_data(data))
    }

    pub async fn save(&self, provider: &ProviderId) -> OrbResult<()> {
        let path = self.file_for(provider)?;
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_vec_pretty(&provider.data)?;
        fs::write(&path, content).await?;
        debug!("Stored provider {} at {}", provider.key(), path.display());
        Ok(())
    }

    pub async fn remove(&self, provider: &ProviderId) -> OrbResult<()> {
        let path = self.file_for(provider)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OrbError::ProviderNotFound(provider.key()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_load_remove() {
        let dir = TempDir::new().unwrap();
        let store = ProviderStore::new(dir.path().join("providers"));

        let work = ProviderId::new("work", ProviderKind::S3).with_data(json!({"bucket": "b"}));
        let photos = ProviderId::new("my.photos", ProviderKind::Native).with_data(json!({"root": "/srv"}));
        store.save(&work).await.unwrap();
        store.save(&photos).await.unwrap();
        assert!(dir.path().join("providers/work.S3").is_file());
        assert!(dir.path().join("providers/my.photos.native_fs").is_file());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![photos.clone(), work.clone()]);

        store.remove(&work).await.unwrap();
        assert_eq!(store.load().await.unwrap(), vec![photos]);
        assert!(matches!(store.remove(&work).await, Err(OrbError::ProviderNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README"), b"hi").unwrap();
        std::fs::write(dir.path().join("x.Dropbox"), b"{}").unwrap();
        std::fs::write(dir.path().join("y.S3"), b"not json").unwrap();
        std::fs::write(dir.path().join("z.OneDrive"), b"{\"token\": 1}").unwrap();

        let loaded = ProviderStore::new(dir.path()).load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "z");
        assert_eq!(loaded[0].kind, ProviderKind::OneDrive);
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = TempDir::new().unwrap();
        let store = ProviderStore::new(dir.path());
        let provider = ProviderId::new("../escape", ProviderKind::Native);
        assert!(matches!(store.save(&provider).await, Err(OrbError::InvalidPath(_))));
    }
}
