// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration file loading

use directories::ProjectDirs;
use orb_core::{OrbError, OrbResult};
use orb_providers::RegistryConfig;
use orb_vfs::VfsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vfs: VfsConfig,
    pub registry: RegistryConfig,
}

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "Orbital", "Files").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load `path`, or the default location when `None`; a missing file means defaults
pub fn load(path: Option<&Path>) -> OrbResult<Config> {
    let path = match path.map(Path::to_path_buf).or_else(default_path) {
        Some(path) => path,
        None => return Ok(Config::default()),
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };

    debug!("Loading config from {}", path.display());
    parse(&text).map_err(|e| OrbError::Serialization(format!("{}: {e}", path.display())))
}

fn parse(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_vfs::SortKey;

    #[test]
    fn test_parse_tables() {
        let config = parse(
            r#"
            [vfs.sort]
            key = "size"
            ascending = true

            [vfs.filters]
            by_suffix = [".md"]

            [registry]
            data_dir = "/var/lib/orb"
            home_name = "Home"
            "#,
        )
        .unwrap();

        assert_eq!(config.vfs.sort.key, SortKey::Size);
        assert!(config.vfs.filters.dot_files_hidden);
        assert!(config.vfs.filters.by_suffix.contains(".md"));
        assert_eq!(config.registry.data_dir, PathBuf::from("/var/lib/orb"));
        assert_eq!(config.registry.home_name, "Home");
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[vfs\n").unwrap();
        assert!(matches!(load(Some(&path)), Err(OrbError::Serialization(_))));
    }
}
