// SPDX-License-Identifier: AGPL-3.0-or-later
//! Templates for newly created entries

use orb_core::{GenericObject, ObjectId};

/// Shape of a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTemplate {
    pub name: &'static str,
    pub suffix: Option<&'static str>,
    pub content: Option<&'static str>,
    pub mime_type: &'static str,
}

pub const DIRECTORY: FileTemplate = FileTemplate {
    name: "directory",
    suffix: None,
    content: None,
    mime_type: "directory",
};

pub const EMPTY_FILE: FileTemplate = FileTemplate {
    name: "empty_file",
    suffix: None,
    content: None,
    mime_type: "text/plain",
};

pub const MARKDOWN: FileTemplate = FileTemplate {
    name: "markdown",
    suffix: Some(".md"),
    content: None,
    mime_type: "text/markdown",
};

pub const PYTHON: FileTemplate = FileTemplate {
    name: "python",
    suffix: Some(".py"),
    content: Some("#!/usr/bin/env python3\n\n\ndef main():\n    pass\n\n\nif __name__ == \"__main__\":\n    main()\n"),
    mime_type: "text/x-python",
};

pub const CSV: FileTemplate = FileTemplate {
    name: "csv",
    suffix: Some(".csv"),
    content: None,
    mime_type: "text/csv",
};

pub static BUILTIN: [FileTemplate; 5] = [DIRECTORY, EMPTY_FILE, MARKDOWN, PYTHON, CSV];

pub fn find(name: &str) -> Option<&'static FileTemplate> {
    BUILTIN.iter().find(|t| t.name == name)
}

impl FileTemplate {
    /// Full entry name with the suffix applied once
    pub fn file_name(&self, base: &str) -> String {
        match self.suffix {
            Some(suffix) if !base.ends_with(suffix) => format!("{base}{suffix}"),
            _ => base.to_string(),
        }
    }

    /// Entry to create inside `parent`
    pub fn instantiate(&self, parent: &ObjectId, base: &str) -> GenericObject {
        let name = self.file_name(base);
        let path = if parent.is_root() {
            name.clone()
        } else {
            format!("{}/{}", parent.path().trim_end_matches('/'), name)
        };
        GenericObject::new(ObjectId::new(path, self.mime_type), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("markdown"), Some(&MARKDOWN));
        assert!(find("rust").is_none());
    }

    #[test]
    fn test_suffix_applied_once() {
        assert_eq!(MARKDOWN.file_name("README"), "README.md");
        assert_eq!(MARKDOWN.file_name("README.md"), "README.md");
        assert_eq!(EMPTY_FILE.file_name("notes"), "notes");
    }

    #[test]
    fn test_instantiate_directory() {
        let entry = DIRECTORY.instantiate(&ObjectId::directory("projects/"), "new");
        assert!(entry.is_folder());
        assert_eq!(entry.id.path(), "projects/new");
        assert_eq!(entry.name, "new");
    }

    #[test]
    fn test_only_python_has_content() {
        let with_content: Vec<_> = BUILTIN.iter().filter(|t| t.content.is_some()).map(|t| t.name).collect();
        assert_eq!(with_content, vec!["python"]);
        assert!(PYTHON.content.unwrap().starts_with("#!/usr/bin/env python3"));
    }

    #[test]
    fn test_instantiate_at_root() {
        let entry = CSV.instantiate(&ObjectId::directory(""), "data");
        assert_eq!(entry.id.path(), "data.csv");
        assert_eq!(entry.id.mime_type().as_str(), "text/csv");
    }
}
