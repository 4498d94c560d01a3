// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider host for Orbital Files
//!
//! Keeps the configured providers, persists their settings and serves the
//! command boundary for them. Only the local filesystem has an in-process
//! backend.

pub mod backend;
pub mod config;
mod local;
pub mod opener;
pub mod registry;
pub mod store;

pub use backend::StorageBackend;
pub use config::{RegistryConfig, HOME_PROVIDER_NAME};
pub use local::{mime_for, LocalBackend};
pub use registry::ProviderRegistry;
pub use store::ProviderStore;
