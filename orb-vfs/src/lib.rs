// SPDX-License-Identifier: AGPL-3.0-or-later
//! Virtual filesystem controller for Orbital Files
//!
//! Presents one directory-browsing model (navigate, list, select, mutate)
//! over every configured provider, whatever backend sits behind it.

pub mod config;
pub mod controller;
pub mod events;
pub mod filter;
pub mod history;
pub mod path_stack;
pub mod selection;
pub mod templates;

pub use config::VfsConfig;
pub use controller::{BatchReport, VirtualFs};
pub use events::{Operation, VfsEvent};
pub use filter::{FilterConfig, SortConfig, SortKey};
pub use history::{History, HistoryEntry};
pub use path_stack::{PathElement, PathStack};
pub use selection::Selection;
pub use templates::FileTemplate;
