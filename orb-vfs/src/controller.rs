// SPDX-License-Identifier: AGPL-3.0-or-later
//! Virtual filesystem controller
//!
//! [`VirtualFs`] is either browsing the provider list (no active provider)
//! or a directory tree of the active provider. All state is owned by the
//! controller and guarded by one lock that is never held across a gateway
//! call. Each refresh carries an epoch; a response is installed only if no
//! newer refresh or navigation happened while it was in flight.

use bytes::Bytes;
use futures::future::join_all;
use orb_core::{BackendGateway, GenericObject, ObjectId, OrbError, OrbResult, ProviderId};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::VfsConfig;
use crate::events::{Observers, Operation, VfsEvent};
use crate::filter::{self, FilterConfig, SortConfig};
use crate::history::{History, HistoryEntry};
use crate::path_stack::{PathElement, PathStack};
use crate::selection::Selection;
use crate::templates::FileTemplate;

/// Outcome of a mutation over the selection
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<ObjectId>,
    pub failed: Vec<(ObjectId, OrbError)>,
    /// Set when the refresh following the mutation failed
    pub refresh_error: Option<OrbError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.refresh_error.is_none()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

struct VfsState {
    active_provider: Option<ProviderId>,
    path: PathStack,
    history: History,
    files: Vec<GenericObject>,
    providers: Vec<ProviderId>,
    selection: Selection,
    /// Provider whose listing the selected indices point into; `None` is the provider list
    selection_view: Option<ProviderId>,
    filters: FilterConfig,
    sort: SortConfig,
    listing_epoch: u64,
    providers_epoch: u64,
}

impl VfsState {
    /// Record the current location; in-flight listings no longer apply
    fn navigated(&mut self) {
        self.history
            .push(HistoryEntry::snapshot(&self.path, self.active_provider.as_ref()));
        self.listing_epoch += 1;
    }

    /// Returns whether the selection was cleared
    fn restore(&mut self, entry: HistoryEntry) -> bool {
        self.path = entry.path;
        self.listing_epoch += 1;
        self.bind(entry.provider)
    }

    /// Switch between the provider list and a provider's tree
    ///
    /// The old listing and the indices selected in it no longer apply.
    /// Returns whether the selection was cleared.
    fn bind(&mut self, provider: Option<ProviderId>) -> bool {
        if self.active_provider == provider {
            return false;
        }
        self.active_provider = provider;
        self.files.clear();
        let cleared = !self.selection.is_empty() && self.selection.clear();
        if cleared {
            self.selection_view = self.active_provider.clone();
        }
        cleared
    }

    /// Selected indices, empty when they were taken in another view
    fn live_selection(&self) -> &[usize] {
        if self.selection_view == self.active_provider {
            self.selection.indices()
        } else {
            &[]
        }
    }

    fn select(&mut self, index: usize) -> bool {
        if self.selection.is_locked() {
            return false;
        }
        if self.selection_view != self.active_provider {
            self.selection.clear();
            self.selection_view = self.active_provider.clone();
        }
        self.selection.select(index)
    }
}

/// What the current selection points at
enum Targets {
    Entries(ProviderId, Vec<GenericObject>),
    Providers(Vec<ProviderId>),
}

struct Inner {
    gateway: Arc<dyn BackendGateway>,
    state: Mutex<VfsState>,
    on_change: Observers,
    on_selection_change: Observers,
    events: broadcast::Sender<VfsEvent>,
}

/// Handle to a virtual filesystem controller
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct VirtualFs {
    inner: Arc<Inner>,
}

impl VirtualFs {
    /// Create a controller browsing the provider list
    ///
    /// Nothing is fetched until [`VirtualFs::fetch`] is called.
    pub fn new(gateway: Arc<dyn BackendGateway>, config: VfsConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let mut state = VfsState {
            active_provider: None,
            path: PathStack::new(),
            history: History::new(),
            files: Vec::new(),
            providers: Vec::new(),
            selection: Selection::new(),
            selection_view: None,
            filters: config.filters,
            sort: config.sort,
            listing_epoch: 0,
            providers_epoch: 0,
        };
        state.navigated();

        Self {
            inner: Arc::new(Inner {
                gateway,
                state: Mutex::new(state),
                on_change: Observers::new(),
                on_selection_change: Observers::new(),
                events,
            }),
        }
    }

    /// Called after the listing or the provider list is replaced
    pub fn on_change(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.inner.on_change.register(callback);
    }

    /// Called after the selection changes
    pub fn on_selection_change(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.inner.on_selection_change.register(callback);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VfsEvent> {
        self.inner.events.subscribe()
    }

    pub fn files(&self) -> Vec<GenericObject> {
        self.inner.state.lock().files.clone()
    }

    pub fn providers(&self) -> Vec<ProviderId> {
        self.inner.state.lock().providers.clone()
    }

    pub fn active_provider(&self) -> Option<ProviderId> {
        self.inner.state.lock().active_provider.clone()
    }

    pub fn is_bound(&self) -> bool {
        self.inner.state.lock().active_provider.is_some()
    }

    pub fn path(&self) -> PathStack {
        self.inner.state.lock().path.clone()
    }

    pub fn filters(&self) -> FilterConfig {
        self.inner.state.lock().filters.clone()
    }

    pub fn sort(&self) -> SortConfig {
        self.inner.state.lock().sort
    }

    pub fn can_go_back(&self) -> bool {
        let state = self.inner.state.lock();
        state.active_provider.is_some() && state.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.inner.state.lock().history.can_go_forward()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.inner.state.lock().live_selection().to_vec()
    }

    /// Selected entries of the current listing
    pub fn selected_files(&self) -> Vec<GenericObject> {
        let state = self.inner.state.lock();
        state
            .live_selection()
            .iter()
            .filter_map(|&i| state.files.get(i).cloned())
            .collect()
    }

    /// Breadcrumbs: the provider root followed by the path segments
    pub fn path_as_array(&self) -> Vec<PathElement> {
        let state = self.inner.state.lock();
        match &state.active_provider {
            None => Vec::new(),
            Some(provider) => {
                let mut elements = Vec::with_capacity(state.path.len() + 1);
                elements.push(PathElement::new(ObjectId::directory(&provider.id), &provider.id));
                elements.extend(state.path.as_slice().iter().cloned());
                elements
            }
        }
    }

    fn emit(&self, event: VfsEvent) {
        // No receivers is fine
        let _ = self.inner.events.send(event);
    }

    fn notify_change(&self, event: VfsEvent) {
        self.inner.on_change.notify();
        self.emit(event);
    }

    fn notify_selection(&self) {
        self.inner.on_selection_change.notify();
        self.emit(VfsEvent::SelectionChanged);
    }

    // Selection

    pub fn select_file(&self, index: usize) -> bool {
        let changed = self.inner.state.lock().select(index);
        if changed {
            self.notify_selection();
        }
        changed
    }

    pub fn clear_selection(&self) -> bool {
        let changed = self.inner.state.lock().selection.clear();
        if changed {
            self.notify_selection();
        }
        changed
    }

    pub fn lock_selection(&self) {
        self.inner.state.lock().selection.lock();
    }

    pub fn unlock_selection(&self) {
        self.inner.state.lock().selection.unlock();
    }

    // Refresh

    /// Refresh the provider list when unbound, the current directory otherwise
    pub async fn fetch(&self) -> OrbResult<()> {
        if self.is_bound() {
            self.fetch_files_and_folders().await
        } else {
            self.fetch_providers().await
        }
    }

    /// Fetch, filter and sort the current directory, then publish it
    ///
    /// On failure the previous listing and selection stay in place.
    pub async fn fetch_files_and_folders(&self) -> OrbResult<()> {
        let request = {
            let mut state = self.inner.state.lock();
            match state.active_provider.clone() {
                Some(provider) => {
                    state.listing_epoch += 1;
                    Some((provider, state.path.top(), state.listing_epoch))
                }
                None => None,
            }
        };
        let Some((provider, top, epoch)) = request else {
            return self.fetch_providers().await;
        };

        debug!("Listing {}:/{} (epoch {})", provider, top.object_id, epoch);
        let raw = match self
            .inner
            .gateway
            .list_folder_content(&provider, &top.object_id)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Listing {}:/{} failed: {}", provider, top.object_id, e);
                self.emit(VfsEvent::ListingRefreshFailed { error: e.to_string() });
                return Err(e);
            }
        };

        let installed = {
            let mut state = self.inner.state.lock();
            if state.listing_epoch != epoch {
                None
            } else {
                let files = filter::apply(raw, &state.filters, &state.sort);
                state.files = files;
                Some(state.selection.clear())
            }
        };

        match installed {
            None => {
                warn!("Discarding stale listing of {}:/{} (epoch {})", provider, top.object_id, epoch);
                self.emit(VfsEvent::StaleResponseDiscarded { epoch });
            }
            Some(selection_cleared) => {
                if selection_cleared {
                    self.notify_selection();
                }
                self.notify_change(VfsEvent::ListingChanged);
            }
        }
        Ok(())
    }

    /// Replace the provider list; path, history and selection are untouched
    pub async fn fetch_providers(&self) -> OrbResult<()> {
        let epoch = {
            let mut state = self.inner.state.lock();
            state.providers_epoch += 1;
            state.providers_epoch
        };

        let providers = match self.inner.gateway.list_providers().await {
            Ok(providers) => providers,
            Err(e) => {
                warn!("Listing providers failed: {}", e);
                self.emit(VfsEvent::ProvidersRefreshFailed { error: e.to_string() });
                return Err(e);
            }
        };

        let installed = {
            let mut state = self.inner.state.lock();
            if state.providers_epoch == epoch {
                state.providers = providers;
                true
            } else {
                false
            }
        };

        if installed {
            self.notify_change(VfsEvent::ProvidersChanged);
        } else {
            warn!("Discarding stale provider list (epoch {})", epoch);
            self.emit(VfsEvent::StaleResponseDiscarded { epoch });
        }
        Ok(())
    }

    /// Change listing filters and refresh
    pub async fn set_filters(&self, filters: FilterConfig) -> OrbResult<()> {
        self.inner.state.lock().filters = filters;
        self.fetch().await
    }

    /// Change listing order and refresh
    pub async fn set_sort(&self, sort: SortConfig) -> OrbResult<()> {
        self.inner.state.lock().sort = sort;
        self.fetch().await
    }

    // Navigation

    /// Browse the root of `provider`
    pub async fn set_provider(&self, provider: ProviderId) -> OrbResult<()> {
        let cleared = {
            let mut state = self.inner.state.lock();
            debug!("Switching to provider {}", provider);
            let cleared = state.bind(Some(provider));
            state.path.clear();
            state.navigated();
            cleared
        };
        if cleared {
            self.notify_selection();
        }
        self.fetch().await
    }

    /// Descend into a directory
    pub async fn push(&self, object_id: ObjectId, name: impl Into<String>) -> OrbResult<()> {
        {
            let mut state = self.inner.state.lock();
            state.path.push(PathElement::new(object_id, name));
            state.navigated();
        }
        self.fetch().await
    }

    /// Ascend one directory; a no-op at the provider root
    pub async fn pop(&self) -> OrbResult<Option<PathElement>> {
        let popped = {
            let mut state = self.inner.state.lock();
            let popped = state.path.pop();
            if popped.is_some() {
                state.navigated();
            }
            popped
        };
        if popped.is_some() {
            self.fetch().await?;
        }
        Ok(popped)
    }

    pub async fn set_path(&self, path: PathStack) -> OrbResult<()> {
        {
            let mut state = self.inner.state.lock();
            state.path.set(path);
            state.navigated();
        }
        self.fetch().await
    }

    /// Jump to a breadcrumb of [`VirtualFs::path_as_array`]
    ///
    /// Index 0 leaves the active provider and shows the provider list; any
    /// other index keeps the first `index - 1` path segments.
    pub async fn goto_index(&self, index: usize) -> OrbResult<()> {
        let cleared = {
            let mut state = self.inner.state.lock();
            let cleared = if index == 0 {
                state.path.clear();
                state.bind(None)
            } else {
                state.path.truncate(index - 1);
                false
            };
            state.navigated();
            cleared
        };
        if cleared {
            self.notify_selection();
        }
        self.fetch().await
    }

    /// Open the provider or directory at `index` of what is being shown
    pub async fn enter(&self, index: usize) -> OrbResult<()> {
        enum Target {
            Provider(ProviderId),
            Directory(GenericObject),
        }

        let target = {
            let state = self.inner.state.lock();
            if state.active_provider.is_none() {
                state.providers.get(index).cloned().map(Target::Provider)
            } else {
                state.files.get(index).cloned().map(Target::Directory)
            }
        };

        match target {
            None => Err(OrbError::NotFound(format!("no entry at index {index}"))),
            Some(Target::Provider(provider)) => self.set_provider(provider).await,
            Some(Target::Directory(entry)) if entry.is_folder() => self.push(entry.id, entry.name).await,
            Some(Target::Directory(entry)) => Err(OrbError::NotADirectory(entry.name)),
        }
    }

    /// Restore the previous location; returns whether anything moved
    pub async fn go_back(&self) -> OrbResult<bool> {
        let (moved, cleared) = {
            let mut state = self.inner.state.lock();
            if state.active_provider.is_none() {
                (false, false)
            } else if let Some(entry) = state.history.go_back() {
                (true, state.restore(entry))
            } else {
                (false, false)
            }
        };
        if cleared {
            self.notify_selection();
        }
        if moved {
            self.fetch().await?;
        }
        Ok(moved)
    }

    /// Undo the last [`VirtualFs::go_back`]; returns whether anything moved
    pub async fn go_forward(&self) -> OrbResult<bool> {
        let (moved, cleared) = {
            let mut state = self.inner.state.lock();
            match state.history.go_forward() {
                Some(entry) => (true, state.restore(entry)),
                None => (false, false),
            }
        };
        if cleared {
            self.notify_selection();
        }
        if moved {
            self.fetch().await?;
        }
        Ok(moved)
    }

    // Providers

    pub async fn add_provider(&self, provider: ProviderId, credentials: serde_json::Value) -> OrbResult<()> {
        self.inner.gateway.add_provider(&provider, credentials).await?;
        info!("Added provider {} ({})", provider, provider.kind);
        self.fetch_providers().await
    }

    // File content

    fn require_provider(&self) -> OrbResult<ProviderId> {
        self.active_provider()
            .ok_or_else(|| OrbError::ProviderNotFound("no active provider".into()))
    }

    pub async fn read_file(&self, path: &ObjectId) -> OrbResult<Bytes> {
        let provider = self.require_provider()?;
        self.inner.gateway.read_file(&provider, path).await
    }

    pub async fn write_file(&self, path: &ObjectId, content: Bytes) -> OrbResult<()> {
        let provider = self.require_provider()?;
        self.inner.gateway.write_file(&provider, path, content).await
    }

    // Mutations

    fn targets(&self) -> Targets {
        let state = self.inner.state.lock();
        let indices = state.live_selection();
        match &state.active_provider {
            Some(provider) => Targets::Entries(
                provider.clone(),
                indices.iter().filter_map(|&i| state.files.get(i).cloned()).collect(),
            ),
            None => Targets::Providers(
                indices.iter().filter_map(|&i| state.providers.get(i).cloned()).collect(),
            ),
        }
    }

    fn settle(&self, operation: Operation, targets: Vec<ObjectId>, results: Vec<OrbResult<()>>) -> BatchReport {
        let mut report = BatchReport::default();
        for (target, result) in targets.into_iter().zip(results) {
            match result {
                Ok(()) => report.succeeded.push(target),
                Err(e) => {
                    warn!("{} of {} failed: {}", operation, target, e);
                    self.emit(VfsEvent::MutationFailed {
                        operation,
                        object: target.clone(),
                        error: e.to_string(),
                    });
                    report.failed.push((target, e));
                }
            }
        }
        report
    }

    /// Runs once every request has settled
    async fn finish(&self, mut report: BatchReport, refresh: bool) -> BatchReport {
        self.clear_selection();
        if refresh {
            if let Err(e) = self.fetch().await {
                report.refresh_error = Some(e);
            }
        }
        report
    }

    /// Create `entry` in the current directory
    pub async fn create(&self, entry: GenericObject) -> BatchReport {
        self.create_with_content(entry, None).await
    }

    /// Create an entry from a template, writing its initial content if any
    pub async fn create_from_template(&self, template: &FileTemplate, base_name: &str) -> BatchReport {
        let parent = self.inner.state.lock().path.top().object_id;
        let entry = template.instantiate(&parent, base_name);
        let content = template.content.map(|c| Bytes::from_static(c.as_bytes()));
        self.create_with_content(entry, content).await
    }

    async fn create_with_content(&self, entry: GenericObject, content: Option<Bytes>) -> BatchReport {
        let (provider, parent) = {
            let state = self.inner.state.lock();
            match &state.active_provider {
                Some(provider) => (provider.clone(), state.path.top().object_id),
                None => {
                    debug!("Ignoring create of {} while browsing providers", entry.name);
                    return BatchReport::default();
                }
            }
        };

        let mut result = self.inner.gateway.create(&provider, &parent, &entry).await;
        if result.is_ok() {
            if let Some(content) = content {
                result = self.inner.gateway.write_file(&provider, &entry.id, content).await;
            }
        }
        let report = self.settle(Operation::Create, vec![entry.id], vec![result]);
        self.finish(report, true).await
    }

    /// Open every selected entry; the listing is not refreshed
    pub async fn open(&self) -> BatchReport {
        let Targets::Entries(provider, entries) = self.targets() else {
            return BatchReport::default();
        };
        let ids: Vec<ObjectId> = entries.into_iter().map(|e| e.id).collect();
        let results = join_all(ids.iter().map(|id| self.inner.gateway.open(&provider, id))).await;
        let report = self.settle(Operation::Open, ids, results);
        self.finish(report, false).await
    }

    /// Rename every selected entry to `new_name`
    pub async fn rename(&self, new_name: &str) -> BatchReport {
        let Targets::Entries(provider, entries) = self.targets() else {
            return BatchReport::default();
        };
        let ids: Vec<ObjectId> = entries.into_iter().map(|e| e.id).collect();
        let results = join_all(
            ids.iter()
                .map(|id| self.inner.gateway.rename(&provider, id, new_name)),
        )
        .await;
        let report = self.settle(Operation::Rename, ids, results);
        self.finish(report, true).await
    }

    /// Rename every selected entry by replacing `from` with `to` in its name
    ///
    /// Entries whose name does not change are left alone.
    pub async fn replace_in_names(&self, from: &str, to: &str) -> BatchReport {
        let Targets::Entries(provider, entries) = self.targets() else {
            return BatchReport::default();
        };
        let renames: Vec<(ObjectId, String)> = entries
            .into_iter()
            .filter_map(|e| {
                let renamed = e.name.replace(from, to);
                (renamed != e.name).then_some((e.id, renamed))
            })
            .collect();
        let results = join_all(
            renames
                .iter()
                .map(|(id, name)| self.inner.gateway.rename(&provider, id, name)),
        )
        .await;
        let ids = renames.into_iter().map(|(id, _)| id).collect();
        let report = self.settle(Operation::Rename, ids, results);
        self.finish(report, true).await
    }

    /// Move every selected entry into `new_parent` of `new_provider`
    pub async fn move_to(&self, new_parent: &ObjectId, new_provider: &ProviderId) -> BatchReport {
        let Targets::Entries(provider, entries) = self.targets() else {
            return BatchReport::default();
        };
        let ids: Vec<ObjectId> = entries.into_iter().map(|e| e.id).collect();
        let results = join_all(
            ids.iter()
                .map(|id| self.inner.gateway.move_to(&provider, id, new_parent, new_provider)),
        )
        .await;
        let report = self.settle(Operation::Move, ids, results);
        self.finish(report, true).await
    }

    /// Delete every selected entry, or remove the selected providers when
    /// browsing the provider list
    pub async fn delete(&self) -> BatchReport {
        match self.targets() {
            Targets::Entries(provider, entries) => {
                let ids: Vec<ObjectId> = entries.into_iter().map(|e| e.id).collect();
                let results = join_all(ids.iter().map(|id| self.inner.gateway.delete(&provider, id))).await;
                let report = self.settle(Operation::Delete, ids, results);
                self.finish(report, true).await
            }
            Targets::Providers(providers) => {
                let results = join_all(
                    providers
                        .iter()
                        .map(|p| self.inner.gateway.remove_provider(p)),
                )
                .await;
                let ids = providers.iter().map(|p| ObjectId::directory(&p.id)).collect();
                let report = self.settle(Operation::RemoveProvider, ids, results);
                self.finish(report, true).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_report() {
        let mut report = BatchReport::default();
        assert!(report.is_success());

        report.succeeded.push(ObjectId::plain_text("a"));
        report.failed.push((ObjectId::plain_text("b"), OrbError::Network("reset".into())));
        assert!(!report.is_success());
        assert_eq!(report.attempted(), 2);
    }
}
