// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use chrono::{DateTime, Utc};
use console::style;
use orb_core::{CommandGateway, GenericObject, ObjectId, OrbError, OrbResult, ProviderId, ProviderKind};
use orb_providers::ProviderRegistry;
use orb_vfs::{BatchReport, FilterConfig, PathElement, PathStack, SortConfig, SortKey, VfsConfig, VirtualFs};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tabled::{Table, Tabled};

use crate::config::Config;

/// Open the provider registry and a controller over it
pub async fn init(config: &Config, vfs: VfsConfig) -> OrbResult<VirtualFs> {
    let registry = ProviderRegistry::open(&config.registry).await?;
    let gateway = Arc::new(CommandGateway::new(registry));
    Ok(VirtualFs::new(gateway, vfs))
}

/// Path stack for a `/`-separated directory inside a provider
pub fn path_stack(path: &str) -> PathStack {
    let mut stack = PathStack::new();
    let mut prefix = String::new();
    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(seg);
        stack.push(PathElement::new(ObjectId::directory(&prefix), seg));
    }
    stack
}

pub fn find_provider(vfs: &VirtualFs, name: &str) -> OrbResult<ProviderId> {
    vfs.providers()
        .into_iter()
        .find(|p| p.id == name)
        .ok_or_else(|| OrbError::ProviderNotFound(name.to_string()))
}

/// Format a timestamp for display
fn format_time(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format file size
fn format_size(size: Option<u64>, human: bool) -> String {
    match size {
        Some(s) if human => bytesize::ByteSize(s).to_string(),
        Some(s) => s.to_string(),
        None => "-".to_string(),
    }
}

fn format_kind(entry: &GenericObject) -> String {
    if entry.is_folder() {
        style("d").cyan().to_string()
    } else if entry.is_symlink() {
        style("l").magenta().to_string()
    } else {
        "-".to_string()
    }
}

#[derive(Tabled)]
struct LsEntry {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
}

pub fn print_files(files: &[GenericObject], selected: &[usize], human: bool) {
    if files.is_empty() {
        println!("(empty directory)");
        return;
    }

    let rows: Vec<LsEntry> = files
        .iter()
        .enumerate()
        .map(|(index, e)| {
            let name = if selected.contains(&index) {
                style(&e.name).reverse().to_string()
            } else if e.is_folder() {
                style(&e.name).cyan().bold().to_string()
            } else {
                e.name.clone()
            };
            LsEntry {
                index,
                kind: format_kind(e),
                size: format_size(e.size, human),
                modified: format_time(e.modified_at),
                name,
            }
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub fn print_providers(providers: &[ProviderId], selected: &[usize]) {
    if providers.is_empty() {
        println!("(no providers)");
        return;
    }

    let rows: Vec<ProviderRow> = providers
        .iter()
        .enumerate()
        .map(|(index, p)| ProviderRow {
            index,
            name: if selected.contains(&index) {
                style(&p.id).reverse().to_string()
            } else {
                p.id.clone()
            },
            kind: p.kind.display_name().to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub fn print_report(report: &BatchReport) {
    for (object, error) in &report.failed {
        println!("{} {}: {}", style("failed").red(), object, error);
    }
    if let Some(error) = &report.refresh_error {
        println!("{} refresh: {}", style("failed").red(), error);
    }
    if report.attempted() > 0 {
        println!(
            "{} of {} done",
            style(report.succeeded.len()).green(),
            report.attempted()
        );
    }
}

/// List configured providers
pub async fn providers(config: &Config) -> OrbResult<()> {
    let vfs = init(config, config.vfs.clone()).await?;
    vfs.fetch_providers().await?;
    print_providers(&vfs.providers(), &[]);
    Ok(())
}

/// List a directory
pub async fn ls(
    config: &Config,
    provider: &str,
    path: &str,
    all: bool,
    sort: &str,
    desc: bool,
    human: bool,
) -> OrbResult<()> {
    let mut view = config.vfs.clone();
    if all {
        view.filters = FilterConfig::show_all();
    }
    view.sort = SortConfig::new(sort.parse::<SortKey>()?, !desc);

    let vfs = init(config, view).await?;
    vfs.fetch_providers().await?;
    let provider = find_provider(&vfs, provider)?;
    vfs.set_provider(provider).await?;
    if !path.trim_matches('/').is_empty() {
        vfs.set_path(path_stack(path)).await?;
    }

    print_files(&vfs.files(), &[], human);
    Ok(())
}

/// Register a local directory as a provider
pub async fn add_native(config: &Config, id: &str, root: &Path) -> OrbResult<()> {
    let root = root.canonicalize()?;
    let vfs = init(config, config.vfs.clone()).await?;
    let provider = ProviderId::new(id, ProviderKind::Native);
    vfs.add_provider(provider, json!({ "root": root.to_string_lossy() }))
        .await?;
    println!("Added {} at {}", style(id).green(), root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_stack() {
        let stack = path_stack("/docs//2024/");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.as_slice()[1].object_id.path(), "docs/2024");
        assert_eq!(stack.as_slice()[1].name, "2024");
        assert!(stack.top().object_id.is_folder());
        assert!(path_stack("").is_empty());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(Some(2048), false), "2048");
        assert_eq!(format_size(None, true), "-");
    }
}
