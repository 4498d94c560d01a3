// SPDX-License-Identifier: AGPL-3.0-or-later
//! Backend gateway
//!
//! The controller reaches every provider through [`BackendGateway`]. The
//! stock implementation, [`CommandGateway`], turns each call into a typed
//! [`Command`] sent over an opaque [`CommandTransport`] and validates what
//! comes back.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::{
    error::OrbResult,
    wire::{self, Command},
    GenericObject, ObjectId, ProviderId,
};

/// Typed operations of the remote command boundary
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn list_providers(&self) -> OrbResult<Vec<ProviderId>>;
    async fn add_provider(&self, provider: &ProviderId, credentials: serde_json::Value) -> OrbResult<()>;
    async fn remove_provider(&self, provider: &ProviderId) -> OrbResult<()>;
    async fn list_folder_content(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<Vec<GenericObject>>;
    async fn read_file(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<Bytes>;
    async fn write_file(&self, provider: &ProviderId, path: &ObjectId, content: Bytes) -> OrbResult<()>;
    async fn create(&self, provider: &ProviderId, parent: &ObjectId, entry: &GenericObject) -> OrbResult<()>;
    async fn open(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<()>;
    async fn rename(&self, provider: &ProviderId, path: &ObjectId, new_name: &str) -> OrbResult<()>;
    async fn move_to(
        &self,
        provider: &ProviderId,
        path: &ObjectId,
        new_parent: &ObjectId,
        new_provider: &ProviderId,
    ) -> OrbResult<()>;
    async fn delete(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<()>;
}

/// Request/response channel to whatever hosts the providers
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn invoke(&self, command: Command) -> OrbResult<serde_json::Value>;
}

/// Gateway speaking [`Command`]s over a transport
pub struct CommandGateway<T> {
    transport: T,
}

impl<T: CommandTransport> CommandGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn ack(&self, command: Command) -> OrbResult<()> {
        let name = command.name();
        self.transport.invoke(command).await?;
        debug!("{} acknowledged", name);
        Ok(())
    }
}

#[async_trait]
impl<T: CommandTransport> BackendGateway for CommandGateway<T> {
    async fn list_providers(&self) -> OrbResult<Vec<ProviderId>> {
        let value = self.transport.invoke(Command::ListProviders).await?;
        wire::decode_providers(value)
    }

    async fn add_provider(&self, provider: &ProviderId, credentials: serde_json::Value) -> OrbResult<()> {
        self.ack(Command::AddProvider {
            provider_id: provider.into(),
            credentials,
        })
        .await
    }

    async fn remove_provider(&self, provider: &ProviderId) -> OrbResult<()> {
        self.ack(Command::RemoveProvider {
            provider_id: provider.into(),
        })
        .await
    }

    async fn list_folder_content(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<Vec<GenericObject>> {
        let value = self
            .transport
            .invoke(Command::ListFolderContent {
                provider_id: provider.into(),
                path: path.into(),
            })
            .await?;
        wire::decode_listing(value)
    }

    async fn read_file(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<Bytes> {
        let value = self
            .transport
            .invoke(Command::ReadFile {
                provider_id: provider.into(),
                path: path.into(),
            })
            .await?;
        let content: Vec<u8> = serde_json::from_value(value)?;
        Ok(Bytes::from(content))
    }

    async fn write_file(&self, provider: &ProviderId, path: &ObjectId, content: Bytes) -> OrbResult<()> {
        self.ack(Command::WriteFile {
            provider_id: provider.into(),
            path: path.into(),
            content: content.to_vec(),
        })
        .await
    }

    async fn create(&self, provider: &ProviderId, parent: &ObjectId, entry: &GenericObject) -> OrbResult<()> {
        self.ack(Command::Create {
            provider_id: provider.into(),
            path: parent.into(),
            file: entry.into(),
        })
        .await
    }

    async fn open(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<()> {
        self.ack(Command::Open {
            provider_id: provider.into(),
            path: path.into(),
        })
        .await
    }

    async fn rename(&self, provider: &ProviderId, path: &ObjectId, new_name: &str) -> OrbResult<()> {
        self.ack(Command::Rename {
            provider_id: provider.into(),
            path: path.into(),
            new_name: new_name.to_string(),
        })
        .await
    }

    async fn move_to(
        &self,
        provider: &ProviderId,
        path: &ObjectId,
        new_parent: &ObjectId,
        new_provider: &ProviderId,
    ) -> OrbResult<()> {
        self.ack(Command::MoveTo {
            provider_id: provider.into(),
            path: path.into(),
            new_path: new_parent.into(),
            new_provider_id: new_provider.into(),
        })
        .await
    }

    async fn delete(&self, provider: &ProviderId, path: &ObjectId) -> OrbResult<()> {
        self.ack(Command::Delete {
            provider_id: provider.into(),
            path: path.into(),
        })
        .await
    }
}
