// SPDX-License-Identifier: AGPL-3.0-or-later
//! Listing filter and sort pipeline
//!
//! Pure functions applied to every fresh listing before it is published.

use orb_core::{GenericObject, OrbError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Provider-internal marker entry, never shown
pub const CONTAINER_MARKER: &str = ".thinkdrive.container";

/// Which entries survive filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub folders_only: bool,
    pub dot_files_hidden: bool,
    pub symlinks_hidden: bool,
    /// Keep only names ending with one of these; empty keeps everything
    pub by_suffix: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            folders_only: false,
            dot_files_hidden: true,
            symlinks_hidden: true,
            by_suffix: BTreeSet::new(),
        }
    }
}

impl FilterConfig {
    /// Configuration that only drops the container marker
    pub fn show_all() -> Self {
        Self {
            folders_only: false,
            dot_files_hidden: false,
            symlinks_hidden: false,
            by_suffix: BTreeSet::new(),
        }
    }

    pub fn accepts(&self, entry: &GenericObject) -> bool {
        if entry.name == CONTAINER_MARKER {
            return false;
        }
        if self.folders_only && !entry.is_folder() {
            return false;
        }
        if self.dot_files_hidden && entry.is_hidden() {
            return false;
        }
        if self.symlinks_hidden && entry.is_symlink() {
            return false;
        }
        self.by_suffix.is_empty() || self.by_suffix.iter().any(|s| entry.name.ends_with(s.as_str()))
    }
}

/// Secondary sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Size,
    ModifiedAt,
}

impl FromStr for SortKey {
    type Err = OrbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "size" => Ok(SortKey::Size),
            "modified" | "modified_at" => Ok(SortKey::ModifiedAt),
            other => Err(OrbError::Other(format!("unknown sort key: {other}"))),
        }
    }
}

/// Sort key and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::ModifiedAt,
            ascending: false,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, ascending: bool) -> Self {
        Self { key, ascending }
    }
}

/// Folders first regardless of direction, then the configured key
pub fn compare(a: &GenericObject, b: &GenericObject, sort: &SortConfig) -> Ordering {
    match (a.is_folder(), b.is_folder()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let ordering = match sort.key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::ModifiedAt => a.modified_at.cmp(&b.modified_at),
    };

    if sort.ascending {
        ordering
    } else {
        ordering.reverse()
    }
}

pub fn filter(entries: Vec<GenericObject>, config: &FilterConfig) -> Vec<GenericObject> {
    entries.into_iter().filter(|e| config.accepts(e)).collect()
}

/// Stable sort, so ties keep their listing order
pub fn sort(entries: &mut [GenericObject], config: &SortConfig) {
    entries.sort_by(|a, b| compare(a, b, config));
}

/// Filter then sort
pub fn apply(entries: Vec<GenericObject>, filters: &FilterConfig, sorting: &SortConfig) -> Vec<GenericObject> {
    let mut entries = filter(entries, filters);
    sort(&mut entries, sorting);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use orb_core::ObjectId;

    fn file(name: &str) -> GenericObject {
        GenericObject::new(ObjectId::plain_text(name), name)
    }

    fn folder(name: &str) -> GenericObject {
        GenericObject::new(ObjectId::directory(name), name)
    }

    fn link(name: &str) -> GenericObject {
        GenericObject::new(ObjectId::new(name, "symlink"), name)
    }

    fn names(entries: &[GenericObject]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample() -> Vec<GenericObject> {
        vec![
            file("notes.txt"),
            folder("Zeta"),
            file(".secret"),
            link("latest"),
            file(CONTAINER_MARKER),
            folder(".git"),
            file("report.md"),
        ]
    }

    #[test]
    fn test_default_config() {
        let kept = filter(sample(), &FilterConfig::default());
        assert_eq!(names(&kept), vec!["notes.txt", "Zeta", "report.md"]);
    }

    #[test]
    fn test_folders_only() {
        let config = FilterConfig {
            folders_only: true,
            ..FilterConfig::show_all()
        };
        let kept = filter(sample(), &config);
        assert!(kept.iter().all(|e| e.is_folder()));
        assert_eq!(names(&kept), vec!["Zeta", ".git"]);
    }

    #[test]
    fn test_marker_always_hidden() {
        let configs = [
            FilterConfig::default(),
            FilterConfig::show_all(),
            FilterConfig {
                by_suffix: [".container".to_string()].into_iter().collect(),
                ..FilterConfig::show_all()
            },
        ];
        for config in configs {
            let kept = filter(sample(), &config);
            assert!(kept.iter().all(|e| e.name != CONTAINER_MARKER));
        }
    }

    #[test]
    fn test_by_suffix() {
        let config = FilterConfig {
            by_suffix: [".md".to_string(), ".txt".to_string()].into_iter().collect(),
            ..FilterConfig::default()
        };
        let kept = filter(sample(), &config);
        assert_eq!(names(&kept), vec!["notes.txt", "report.md"]);
    }

    #[test]
    fn test_symlinks_shown_when_allowed() {
        let config = FilterConfig {
            symlinks_hidden: false,
            ..FilterConfig::default()
        };
        assert!(names(&filter(sample(), &config)).contains(&"latest"));
    }

    #[test]
    fn test_folders_first_both_directions() {
        let entries = vec![file("b.txt"), folder("A")];

        let mut asc = entries.clone();
        sort(&mut asc, &SortConfig::new(SortKey::Name, true));
        assert_eq!(names(&asc), vec!["A", "b.txt"]);

        let mut desc = entries;
        sort(&mut desc, &SortConfig::new(SortKey::Name, false));
        assert_eq!(names(&desc), vec!["A", "b.txt"]);
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let mut entries = vec![file("beta"), file("Alpha"), file("gamma")];
        sort(&mut entries, &SortConfig::new(SortKey::Name, true));
        assert_eq!(names(&entries), vec!["Alpha", "beta", "gamma"]);

        sort(&mut entries, &SortConfig::new(SortKey::Name, false));
        assert_eq!(names(&entries), vec!["gamma", "beta", "Alpha"]);
    }

    #[test]
    fn test_sort_by_size() {
        let mut entries = vec![
            file("big").with_size(300),
            file("unknown"),
            file("small").with_size(10),
        ];
        sort(&mut entries, &SortConfig::new(SortKey::Size, true));
        assert_eq!(names(&entries), vec!["unknown", "small", "big"]);
    }

    #[test]
    fn test_sort_by_modified_descending() {
        let older = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut entries = vec![
            file("old").with_modified(older),
            file("new").with_modified(newer),
            folder("dir").with_modified(older),
        ];
        sort(&mut entries, &SortConfig::default());
        assert_eq!(names(&entries), vec!["dir", "new", "old"]);
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let mut entries = vec![file("x").with_size(1), file("y").with_size(1), file("z").with_size(1)];
        sort(&mut entries, &SortConfig::new(SortKey::Size, false));
        assert_eq!(names(&entries), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_apply() {
        let entries = apply(sample(), &FilterConfig::default(), &SortConfig::new(SortKey::Name, true));
        assert_eq!(names(&entries), vec!["Zeta", "notes.txt", "report.md"]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("modified".parse::<SortKey>().unwrap(), SortKey::ModifiedAt);
        assert_eq!("size".parse::<SortKey>().unwrap(), SortKey::Size);
        assert!("color".parse::<SortKey>().is_err());
    }
}
