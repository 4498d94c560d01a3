// SPDX-License-Identifier: AGPL-3.0-or-later
//! Controller configuration

use serde::{Deserialize, Serialize};

use crate::filter::{FilterConfig, SortConfig};

/// Initial listing view and event channel sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VfsConfig {
    pub filters: FilterConfig,
    pub sort: SortConfig,
    /// Buffered events per subscriber before the slowest one lags
    pub event_capacity: usize,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            sort: SortConfig::default(),
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortKey;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: VfsConfig = serde_json::from_str(
            r#"{"sort": {"key": "name", "ascending": true}, "filters": {"dot_files_hidden": false}}"#,
        )
        .unwrap();
        assert_eq!(config.sort.key, SortKey::Name);
        assert!(config.sort.ascending);
        assert!(!config.filters.dot_files_hidden);
        assert!(config.filters.symlinks_hidden);
        assert_eq!(config.event_capacity, 64);
    }
}
