// SPDX-License-Identifier: AGPL-3.0-or-later
//! Scripted in-memory gateway for controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use orb_core::{BackendGateway, GenericObject, ObjectId, OrbError, OrbResult, ProviderId, ProviderKind};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A request as the gateway saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProviders,
    AddProvider(String),
    RemoveProvider(String),
    List(String),
    Read(String),
    Write(String, Vec<u8>),
    Create { parent: String, name: String, mime: String },
    Open(String),
    Rename(String, String),
    Move { path: String, new_parent: String, new_provider: String },
    Delete(String),
}

#[derive(Default)]
pub struct ScriptedGateway {
    providers: Mutex<Vec<ProviderId>>,
    listings: Mutex<HashMap<String, Vec<GenericObject>>>,
    calls: Mutex<Vec<Call>>,
    failing_paths: Mutex<HashSet<String>>,
    fail_listing: AtomicBool,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_providers(self: Arc<Self>, providers: Vec<ProviderId>) -> Arc<Self> {
        *self.providers.lock() = providers;
        self
    }

    pub fn set_listing(&self, path: &str, entries: Vec<GenericObject>) {
        self.listings.lock().insert(path.to_string(), entries);
    }

    pub fn fail_path(&self, path: &str) {
        self.failing_paths.lock().insert(path.to_string());
    }

    pub fn fail_listings(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Hold listings of `path` until the returned handle is notified
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(path.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn check(&self, path: &ObjectId) -> OrbResult<()> {
        if self.failing_paths.lock().contains(path.path()) {
            Err(OrbError::PermissionDenied(path.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BackendGateway for ScriptedGateway {
    async fn list_providers(&self) -> OrbResult<Vec<ProviderId>> {
        self.record(Call::ListProviders);
        Ok(self.providers.lock().clone())
    }

    async fn add_provider(&self, provider: &ProviderId, _credentials: serde_json::Value) -> OrbResult<()> {
        self.record(Call::AddProvider(provider.id.clone()));
        self.providers.lock().push(provider.clone());
        Ok(())
    }

    async fn remove_provider(&self, provider: &ProviderId) -> OrbResult<()> {
        self.record(Call::RemoveProvider(provider.id.clone()));
        self.providers.lock().retain(|p| !p.same_instance(provider));
        Ok(())
    }

    async fn list_folder_content(&self, _provider: &ProviderId, path: &ObjectId) -> OrbResult<Vec<GenericObject>> {
        self.record(Call::List(path.path().to_string()));
        let gate = self.gates.lock().get(path.path()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(OrbError::Network("backend unreachable".into()));
        }
        Ok(self.listings.lock().get(path.path()).cloned().unwrap_or_default())
    }

    async fn read_file(&self, _provider: &ProviderId, path: &ObjectId) -> OrbResult<Bytes> {
        self.record(Call::Read(path.path().to_string()));
        self.check(path)?;
        Ok(Bytes::from_static(b"content"))
    }

    async fn write_file(&self, _provider: &ProviderId, path: &ObjectId, content: Bytes) -> OrbResult<()> {
        self.record(Call::Write(path.path().to_string(), content.to_vec()));
        self.check(path)
    }

    async fn create(&self, _provider: &ProviderId, parent: &ObjectId, entry: &GenericObject) -> OrbResult<()> {
        self.record(Call::Create {
            parent: parent.path().to_string(),
            name: entry.name.clone(),
            mime: entry.id.mime_type().to_string(),
        });
        self.check(&entry.id)
    }

    async fn open(&self, _provider: &ProviderId, path: &ObjectId) -> OrbResult<()> {
        self.record(Call::Open(path.path().to_string()));
        self.check(path)
    }

    async fn rename(&self, _provider: &ProviderId, path: &ObjectId, new_name: &str) -> OrbResult<()> {
        self.record(Call::Rename(path.path().to_string(), new_name.to_string()));
        self.check(path)
    }

    async fn move_to(
        &self,
        _provider: &ProviderId,
        path: &ObjectId,
        new_parent: &ObjectId,
        new_provider: &ProviderId,
    ) -> OrbResult<()> {
        self.record(Call::Move {
            path: path.path().to_string(),
            new_parent: new_parent.path().to_string(),
            new_provider: new_provider.id.clone(),
        });
        self.check(path)
    }

    async fn delete(&self, _provider: &ProviderId, path: &ObjectId) -> OrbResult<()> {
        self.record(Call::Delete(path.path().to_string()));
        self.check(path)
    }
}

pub fn home() -> ProviderId {
    ProviderId::new("home", ProviderKind::Native)
}

pub fn work() -> ProviderId {
    ProviderId::new("work", ProviderKind::S3)
}

pub fn file(path: &str, name: &str) -> GenericObject {
    GenericObject::new(ObjectId::new(path, "text/plain"), name)
}

pub fn folder(path: &str, name: &str) -> GenericObject {
    GenericObject::new(ObjectId::new(path, "directory"), name)
}

pub fn names(entries: &[GenericObject]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}
