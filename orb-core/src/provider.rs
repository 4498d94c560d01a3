// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OrbError;

/// Kind of storage backend a provider instance talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "Google")]
    GoogleDrive,
    #[serde(rename = "OneDrive")]
    OneDrive,
    #[serde(rename = "S3")]
    S3,
    #[serde(rename = "SQL")]
    Sql,
    #[serde(rename = "native_fs")]
    Native,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::GoogleDrive,
        ProviderKind::OneDrive,
        ProviderKind::S3,
        ProviderKind::Sql,
        ProviderKind::Native,
    ];

    /// Name used on the command boundary and in persisted provider files
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GoogleDrive => "Google",
            ProviderKind::OneDrive => "OneDrive",
            ProviderKind::S3 => "S3",
            ProviderKind::Sql => "SQL",
            ProviderKind::Native => "native_fs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::GoogleDrive => "Google Drive",
            ProviderKind::OneDrive => "OneDrive",
            ProviderKind::S3 => "S3",
            ProviderKind::Sql => "SQL",
            ProviderKind::Native => "Local",
        }
    }

    pub fn is_cloud(&self) -> bool {
        match self {
            ProviderKind::GoogleDrive | ProviderKind::OneDrive | ProviderKind::S3 => true,
            ProviderKind::Sql | ProviderKind::Native => false,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = OrbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| OrbError::InvalidRecord(format!("unknown provider kind: {s}")))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque provider-specific configuration payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderData(pub serde_json::Value);

impl ProviderData {
    pub fn empty() -> Self {
        Self(serde_json::Value::Null)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }
}

/// A configured backend instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderId {
    pub id: String,
    pub kind: ProviderKind,
    pub data: ProviderData,
}

impl ProviderId {
    pub fn new(id: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            id: id.into(),
            kind,
            data: ProviderData::empty(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = ProviderData(data);
        self
    }

    /// Stable key combining instance name and kind, e.g. `work.S3`
    pub fn key(&self) -> String {
        format!("{}.{}", self.id, self.kind.as_str())
    }

    /// Whether both values name the same provider instance, ignoring `data`
    pub fn same_instance(&self, other: &ProviderId) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "Dropbox".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, OrbError::InvalidRecord(_)));
        assert!(serde_json::from_str::<ProviderKind>("\"native\"").is_err());
    }

    #[test]
    fn test_is_cloud() {
        assert!(ProviderKind::GoogleDrive.is_cloud());
        assert!(ProviderKind::S3.is_cloud());
        assert!(!ProviderKind::Native.is_cloud());
        assert!(!ProviderKind::Sql.is_cloud());
    }

    #[test]
    fn test_key() {
        let provider = ProviderId::new("My local files", ProviderKind::Native);
        assert_eq!(provider.key(), "My local files.native_fs");
    }

    #[test]
    fn test_same_instance_ignores_data() {
        let a = ProviderId::new("work", ProviderKind::S3);
        let b = a.clone().with_data(serde_json::json!({"bucket": "b"}));
        assert!(a.same_instance(&b));
        assert_ne!(a, b);
        assert_eq!(b.data.get_str("bucket"), Some("b"));
    }
}
