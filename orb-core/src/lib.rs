// SPDX-License-Identifier: AGPL-3.0-or-later
//! Orbital Files Core
//!
//! Object identity, provider identity, listing entries and the typed command
//! boundary every storage backend is reached through.

pub mod entry;
pub mod error;
pub mod gateway;
pub mod object;
pub mod provider;
pub mod wire;

pub use entry::GenericObject;
pub use error::{OrbError, OrbResult};
pub use gateway::{BackendGateway, CommandGateway, CommandTransport};
pub use object::{MimeType, ObjectId};
pub use provider::{ProviderData, ProviderId, ProviderKind};
pub use wire::Command;
