// SPDX-License-Identifier: AGPL-3.0-or-later
//! Data contracts of the command boundary
//!
//! Everything crossing the boundary is one of these shapes. Incoming records
//! are validated here before they reach the rest of the crate; malformed
//! ones are rejected one by one instead of failing the whole response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{OrbError, OrbResult},
    GenericObject, MimeType, ObjectId, ProviderData, ProviderId, ProviderKind,
};

/// Provider reference as sent over the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub id: String,
    pub provider_type: ProviderKind,
    #[serde(default)]
    pub data: ProviderData,
}

impl From<&ProviderId> for ProviderRef {
    fn from(provider: &ProviderId) -> Self {
        Self {
            id: provider.id.clone(),
            provider_type: provider.kind,
            data: provider.data.clone(),
        }
    }
}

impl From<ProviderRef> for ProviderId {
    fn from(r: ProviderRef) -> Self {
        Self {
            id: r.id,
            kind: r.provider_type,
            data: r.data,
        }
    }
}

/// Object reference as sent over the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRef {
    pub path: String,
    pub mime_type: MimeType,
}

impl From<&ObjectId> for PathRef {
    fn from(id: &ObjectId) -> Self {
        Self {
            path: id.path().to_string(),
            mime_type: id.mime_type().clone(),
        }
    }
}

impl From<PathRef> for ObjectId {
    fn from(r: PathRef) -> Self {
        ObjectId::new(r.path, r.mime_type)
    }
}

/// Entry to create, as sent over the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntryRef {
    pub id: String,
    pub name: String,
    pub mime_type: MimeType,
}

impl From<&GenericObject> for NewEntryRef {
    fn from(entry: &GenericObject) -> Self {
        Self {
            id: entry.id.path().to_string(),
            name: entry.name.clone(),
            mime_type: entry.id.mime_type().clone(),
        }
    }
}

/// Listing record as returned by a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl TryFrom<RawEntry> for GenericObject {
    type Error = OrbError;

    fn try_from(raw: RawEntry) -> OrbResult<Self> {
        if raw.name.is_empty() {
            return Err(OrbError::InvalidRecord(format!("entry {:?} has no name", raw.id)));
        }
        let id = ObjectId::new(&raw.id, raw.mime_type.unwrap_or_default());
        Ok(GenericObject {
            id,
            name: raw.name,
            modified_at: raw.modified_at,
            size: raw.size,
        })
    }
}

impl From<&GenericObject> for RawEntry {
    fn from(entry: &GenericObject) -> Self {
        Self {
            id: entry.id.path().to_string(),
            mime_type: Some(entry.id.mime_type().to_string()),
            name: entry.name.clone(),
            modified_at: entry.modified_at,
            size: entry.size,
        }
    }
}

/// Provider record as returned by the provider host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProvider {
    pub id: String,
    pub provider_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TryFrom<RawProvider> for ProviderId {
    type Error = OrbError;

    fn try_from(raw: RawProvider) -> OrbResult<Self> {
        if raw.id.is_empty() {
            return Err(OrbError::InvalidRecord("provider has no id".into()));
        }
        let kind: ProviderKind = raw.provider_type.parse()?;
        Ok(ProviderId::new(raw.id, kind).with_data(raw.data))
    }
}

impl From<&ProviderId> for RawProvider {
    fn from(provider: &ProviderId) -> Self {
        Self {
            id: provider.id.clone(),
            provider_type: provider.kind.as_str().to_string(),
            data: provider.data.0.clone(),
        }
    }
}

/// A request crossing the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    ListProviders,
    AddProvider {
        provider_id: ProviderRef,
        credentials: serde_json::Value,
    },
    RemoveProvider {
        provider_id: ProviderRef,
    },
    ListFolderContent {
        provider_id: ProviderRef,
        path: PathRef,
    },
    ReadFile {
        provider_id: ProviderRef,
        path: PathRef,
    },
    WriteFile {
        provider_id: ProviderRef,
        path: PathRef,
        content: Vec<u8>,
    },
    Create {
        provider_id: ProviderRef,
        path: PathRef,
        file: NewEntryRef,
    },
    Open {
        provider_id: ProviderRef,
        path: PathRef,
    },
    Rename {
        provider_id: ProviderRef,
        path: PathRef,
        new_name: String,
    },
    MoveTo {
        provider_id: ProviderRef,
        path: PathRef,
        new_path: PathRef,
        new_provider_id: ProviderRef,
    },
    Delete {
        provider_id: ProviderRef,
        path: PathRef,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListProviders => "list_providers",
            Command::AddProvider { .. } => "add_provider",
            Command::RemoveProvider { .. } => "remove_provider",
            Command::ListFolderContent { .. } => "list_folder_content",
            Command::ReadFile { .. } => "read_file",
            Command::WriteFile { .. } => "write_file",
            Command::Create { .. } => "create",
            Command::Open { .. } => "open",
            Command::Rename { .. } => "rename",
            Command::MoveTo { .. } => "move_to",
            Command::Delete { .. } => "delete",
        }
    }
}

fn into_records(value: serde_json::Value, what: &str) -> OrbResult<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(items) => Ok(items),
        serde_json::Value::Null => Ok(Vec::new()),
        other => Err(OrbError::InvalidRecord(format!(
            "expected {what} array, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Decode a `list_folder_content` response, skipping malformed records
pub fn decode_listing(value: serde_json::Value) -> OrbResult<Vec<GenericObject>> {
    let records = into_records(value, "listing")?;
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let decoded = serde_json::from_value::<RawEntry>(record)
            .map_err(OrbError::from)
            .and_then(GenericObject::try_from);
        match decoded {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping listing record: {}", e),
        }
    }
    Ok(entries)
}

/// Decode a `list_providers` response, skipping malformed records
pub fn decode_providers(value: serde_json::Value) -> OrbResult<Vec<ProviderId>> {
    let records = into_records(value, "provider")?;
    let mut providers = Vec::with_capacity(records.len());
    for record in records {
        let decoded = serde_json::from_value::<RawProvider>(record)
            .map_err(OrbError::from)
            .and_then(ProviderId::try_from);
        match decoded {
            Ok(provider) => providers.push(provider),
            Err(e) => warn!("Skipping provider record: {}", e),
        }
    }
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_ref_shape() {
        let id = ObjectId::new("/docs/a.txt", "text/plain");
        let value = serde_json::to_value(PathRef::from(&id)).unwrap();
        assert_eq!(value, json!({"path": "docs/a.txt", "mime_type": "text/plain"}));
    }

    #[test]
    fn test_provider_ref_shape() {
        let provider = ProviderId::new("work", ProviderKind::S3).with_data(json!({"bucket": "b"}));
        let value = serde_json::to_value(ProviderRef::from(&provider)).unwrap();
        assert_eq!(
            value,
            json!({"id": "work", "provider_type": "S3", "data": {"bucket": "b"}})
        );
    }

    #[test]
    fn test_command_shape() {
        let provider = ProviderId::new("home", ProviderKind::Native);
        let command = Command::Rename {
            provider_id: (&provider).into(),
            path: (&ObjectId::plain_text("a.txt")).into(),
            new_name: "b.txt".into(),
        };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["command"], "rename");
        assert_eq!(value["args"]["new_name"], "b.txt");
        assert_eq!(value["args"]["provider_id"]["provider_type"], "native_fs");

        let value = serde_json::to_value(Command::ListProviders).unwrap();
        assert_eq!(value, json!({"command": "list_providers"}));
    }

    #[test]
    fn test_decode_listing() {
        let value = json!([
            {"id": "/a", "mime_type": "directory", "name": "Zeta"},
            {"id": "/c", "mime_type": "text/plain", "name": "notes.txt",
             "modified_at": "2024-03-01T10:00:00Z", "size": 12},
        ]);
        let entries = decode_listing(value).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_folder());
        assert_eq!(entries[0].id.path(), "a");
        assert_eq!(entries[1].size, Some(12));
        assert!(entries[1].modified_at.is_some());
    }

    #[test]
    fn test_decode_listing_skips_malformed() {
        let value = json!([
            {"id": "/a", "mime_type": "directory", "name": ""},
            {"id": "/b", "name": 7},
            {"id": "/c", "mime_type": null, "name": "c"},
        ]);
        let entries = decode_listing(value).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "c");
        assert!(!entries[0].is_folder());
    }

    #[test]
    fn test_decode_listing_rejects_non_array() {
        assert!(decode_listing(json!({"id": "a"})).is_err());
        assert!(decode_listing(json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_decode_providers_rejects_unknown_kind() {
        let value = json!([
            {"id": "home", "provider_type": "native_fs"},
            {"id": "box", "provider_type": "Box", "data": {}},
            {"id": "drive", "provider_type": "Google", "data": {"token": "t"}},
        ]);
        let providers = decode_providers(value).unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].kind, ProviderKind::Native);
        assert_eq!(providers[1].data.get_str("token"), Some("t"));
    }
}
