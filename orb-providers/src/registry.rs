// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider registry
//!
//! Hosts every configured provider and answers [`Command`]s for them, which
//! makes it the transport end of a [`orb_core::CommandGateway`].

use async_trait::async_trait;
use bytes::Bytes;
use orb_core::{
    wire::{RawEntry, RawProvider},
    Command, CommandTransport, GenericObject, ObjectId, OrbError, OrbResult, ProviderId, ProviderKind,
};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::StorageBackend;
use crate::config::RegistryConfig;
use crate::local::LocalBackend;
use crate::opener;
use crate::store::ProviderStore;

struct Registered {
    provider: ProviderId,
    backend: Arc<dyn StorageBackend>,
    builtin: bool,
}

/// Instantiate the backend serving `provider`
fn backend_for(provider: &ProviderId) -> OrbResult<Arc<dyn StorageBackend>> {
    match provider.kind {
        ProviderKind::Native => {
            let root = provider
                .data
                .get_str("root")
                .ok_or_else(|| OrbError::InvalidRecord(format!("{} has no root directory", provider.key())))?;
            Ok(Arc::new(LocalBackend::new(root)))
        }
        kind => Err(OrbError::Unsupported(format!(
            "{} providers have no storage backend",
            kind.display_name()
        ))),
    }
}

fn join(parent: &ObjectId, name: &str) -> String {
    if parent.is_root() {
        name.to_string()
    } else {
        format!("{}/{}", parent.path().trim_end_matches('/'), name)
    }
}

/// Registry of live providers, keyed by `<id>.<kind>`
pub struct ProviderRegistry {
    store: ProviderStore,
    providers: RwLock<BTreeMap<String, Registered>>,
}

impl ProviderRegistry {
    /// Load stored providers and register the built-in home provider
    pub async fn open(config: &RegistryConfig) -> OrbResult<Self> {
        let registry = Self {
            store: ProviderStore::new(&config.data_dir),
            providers: RwLock::new(BTreeMap::new()),
        };

        if let Some(home) = &config.home_root {
            let provider = ProviderId::new(&config.home_name, ProviderKind::Native)
                .with_data(json!({ "root": home.to_string_lossy() }));
            registry.insert(provider, Arc::new(LocalBackend::new(home)), true);
        }

        for provider in registry.store.load().await? {
            match backend_for(&provider) {
                Ok(backend) => registry.insert(provider, backend, false),
                Err(e) => warn!("Provider {} not loaded: {}", provider.key(), e),
            }
        }

        Ok(registry)
    }

    fn insert(&self, provider: ProviderId, backend: Arc<dyn StorageBackend>, builtin: bool) {
        debug!("Registering provider {}", provider.key());
        self.providers.write().insert(
            provider.key(),
            Registered {
                provider,
                backend,
                builtin,
            },
        );
    }

    pub fn list_providers(&self) -> Vec<ProviderId> {
        self.providers
            .read()
            .values()
            .map(|r| r.provider.clone())
            .collect()
    }

    pub fn backend(&self, provider: &ProviderId) -> OrbResult<Arc<dyn StorageBackend>> {
        self.providers
            .read()
            .get(&provider.key())
            .map(|r| r.backend.clone())
            .ok_or_else(|| OrbError::ProviderNotFound(provider.key()))
    }

    /// Register and persist a provider; `credentials` become its data
    pub async fn add_provider(&self, provider: &ProviderId, credentials: Value) -> OrbResult<ProviderId> {
        let key = provider.key();
        if self.providers.read().contains_key(&key) {
            return Err(OrbError::AlreadyExists(key));
        }

        let provider = provider.clone().with_data(credentials);
        let backend = backend_for(&provider)?;
        if !backend.is_available().await {
            return Err(OrbError::NotFound(format!("storage of {key} is not reachable")));
        }

        self.store.save(&provider).await?;
        self.insert(provider.clone(), backend, false);
        info!("Added provider {} ({})", provider, provider.kind.display_name());
        Ok(provider)
    }

    pub async fn remove_provider(&self, provider: &ProviderId) -> OrbResult<()> {
        let key = provider.key();
        let builtin = match self.providers.read().get(&key) {
            Some(registered) => registered.builtin,
            None => return Err(OrbError::ProviderNotFound(key)),
        };
        if builtin {
            return Err(OrbError::Unsupported(format!("{} is built in", provider)));
        }

        self.store.remove(provider).await?;
        self.providers.write().remove(&key);
        info!("Removed provider {}", provider);
        Ok(())
    }

    /// Move an entry, across providers by copying then deleting the source
    pub async fn move_entry(
        &self,
        provider: &ProviderId,
        path: &ObjectId,
        new_parent: &ObjectId,
        new_provider: &ProviderId,
    ) -> OrbResult<()> {
        let source = self.backend(provider)?;
        if provider.same_instance(new_provider) {
            return source.move_to(path, new_parent).await;
        }
        if path.is_folder() {
            return Err(OrbError::Unsupported("moving folders between providers".into()));
        }

        let destination = self.backend(new_provider)?;
        let name = path.path().rsplit('/').next().unwrap_or_default();
        let target = ObjectId::new(join(new_parent, name), path.mime_type().clone());

        let content = source.read_file(path).await?;
        destination.write_file(&target, content).await?;
        source.delete(path).await?;
        debug!("Moved {}:/{} to {}:/{}", provider, path, new_provider, target);
        Ok(())
    }

    pub async fn open_entry(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<()> {
        let local = self.backend(provider)?.local_path(path)?;
        opener::open_path(&local).await
    }
}

#[async_trait]
impl CommandTransport for ProviderRegistry {
    async fn invoke(&self, command: Command) -> OrbResult<Value> {
        debug!("Handling {}", command.name());
        match command {
            Command::ListProviders => {
                let providers: Vec<RawProvider> = self.list_providers().iter().map(RawProvider::from).collect();
                Ok(serde_json::to_value(providers)?)
            }
            Command::AddProvider {
                provider_id,
                credentials,
            } => {
                self.add_provider(&provider_id.into(), credentials).await?;
                Ok(Value::Null)
            }
            Command::RemoveProvider { provider_id } => {
                self.remove_provider(&provider_id.into()).await?;
                Ok(Value::Null)
            }
            Command::ListFolderContent { provider_id, path } => {
                let entries = self
                    .backend(&provider_id.into())?
                    .list_folder_content(&path.into())
                    .await?;
                let entries: Vec<RawEntry> = entries.iter().map(RawEntry::from).collect();
                Ok(serde_json::to_value(entries)?)
            }
            Command::ReadFile { provider_id, path } => {
                let content = self.backend(&provider_id.into())?.read_file(&path.into()).await?;
                Ok(serde_json::to_value(content.to_vec())?)
            }
            Command::WriteFile {
                provider_id,
                path,
                content,
            } => {
                self.backend(&provider_id.into())?
                    .write_file(&path.into(), Bytes::from(content))
                    .await?;
                Ok(Value::Null)
            }
            Command::Create {
                provider_id,
                path,
                file,
            } => {
                let entry = GenericObject::new(ObjectId::new(&file.id, file.mime_type), file.name);
                self.backend(&provider_id.into())?.create(&path.into(), &entry).await?;
                Ok(Value::Null)
            }
            Command::Open { provider_id, path } => {
                self.open_entry(&provider_id.into(), &path.into()).await?;
                Ok(Value::Null)
            }
            Command::Rename {
                provider_id,
                path,
                new_name,
            } => {
                self.backend(&provider_id.into())?
                    .rename(&path.into(), &new_name)
                    .await?;
                Ok(Value::Null)
            }
            Command::MoveTo {
                provider_id,
                path,
                new_path,
                new_provider_id,
            } => {
                self.move_entry(
                    &provider_id.into(),
                    &path.into(),
                    &new_path.into(),
                    &new_provider_id.into(),
                )
                .await?;
                Ok(Value::Null)
            }
            Command::Delete { provider_id, path } => {
                self.backend(&provider_id.into())?.delete(&path.into()).await?;
                Ok(Value::Null)
            }
        }
    }
}
