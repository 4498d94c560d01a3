// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider host configuration

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the built-in provider browsing the home directory
pub const HOME_PROVIDER_NAME: &str = "My local files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Where provider configurations are stored
    pub data_dir: PathBuf,
    /// Root of the built-in local provider; `None` disables it
    pub home_root: Option<PathBuf>,
    pub home_name: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "Orbital", "Files")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".orbital-files"));
        let home_root = UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

        Self {
            data_dir,
            home_root,
            home_name: HOME_PROVIDER_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"data_dir": "/tmp/orb"}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/orb"));
        assert_eq!(config.home_name, HOME_PROVIDER_NAME);
    }
}
