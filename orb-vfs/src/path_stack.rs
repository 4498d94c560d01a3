// SPDX-License-Identifier: AGPL-3.0-or-later
//! Directory drill-down stack

use orb_core::ObjectId;

/// One segment of the navigation stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathElement {
    pub object_id: ObjectId,
    pub name: String,
}

impl PathElement {
    pub fn new(object_id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            object_id,
            name: name.into(),
        }
    }

    /// Element standing for the root of a provider
    pub fn root() -> Self {
        Self::new(ObjectId::directory(""), "")
    }
}

/// Ordered directory segments from the provider root to the current directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack {
    elements: Vec<PathElement>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    /// Current directory, or the synthetic root element when empty
    pub fn top(&self) -> PathElement {
        self.elements.last().cloned().unwrap_or_else(PathElement::root)
    }

    /// Replace the contents with another stack
    pub fn set(&mut self, other: PathStack) {
        self.elements = other.elements;
    }

    /// Keep only the first `depth` segments
    pub fn truncate(&mut self, depth: usize) {
        self.elements.truncate(depth);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }

    /// Segment ids joined with `/`
    pub fn to_id_string(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.object_id.path())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(path: &str) -> PathElement {
        PathElement::new(ObjectId::directory(path), path.rsplit('/').next().unwrap_or(path))
    }

    #[test]
    fn test_top_of_empty_is_root() {
        let stack = PathStack::new();
        let top = stack.top();
        assert_eq!(top, PathElement::root());
        assert!(top.object_id.is_folder());
        assert_eq!(top.object_id.path(), "");
        assert_eq!(top.name, "");
    }

    #[test]
    fn test_push_then_pop_restores() {
        let mut stack = PathStack::from_elements(vec![element("home")]);
        let before = stack.clone();

        stack.push(element("home/docs"));
        assert_eq!(stack.top().name, "docs");
        let popped = stack.pop().unwrap();

        assert_eq!(popped.object_id.path(), "home/docs");
        assert_eq!(stack, before);
    }

    #[test]
    fn test_pop_empty() {
        let mut stack = PathStack::new();
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_set_replaces() {
        let mut stack = PathStack::from_elements(vec![element("a"), element("a/b")]);
        stack.set(PathStack::from_elements(vec![element("x")]));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().object_id.path(), "x");
    }

    #[test]
    fn test_truncate() {
        let mut stack = PathStack::from_elements(vec![element("a"), element("a/b"), element("a/b/c")]);
        stack.truncate(1);
        assert_eq!(stack.as_slice(), &[element("a")]);
        stack.truncate(5);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_to_id_string() {
        let stack = PathStack::from_elements(vec![
            PathElement::new(ObjectId::directory("/root-id"), "Root"),
            PathElement::new(ObjectId::directory("child-id"), "Child"),
        ]);
        assert_eq!(stack.to_id_string(), "root-id/child-id");
        assert_eq!(PathStack::new().to_id_string(), "");
    }
}
