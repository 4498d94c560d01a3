// SPDX-License-Identifier: AGPL-3.0-or-later
//! Change notification

use orb_core::ObjectId;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Mutating operation issued per selected entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Open,
    Rename,
    Move,
    Delete,
    RemoveProvider,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Open => "open",
            Operation::Rename => "rename",
            Operation::Move => "move",
            Operation::Delete => "delete",
            Operation::RemoveProvider => "remove provider",
        };
        f.write_str(name)
    }
}

/// State change or failure broadcast by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum VfsEvent {
    ListingChanged,
    ProvidersChanged,
    SelectionChanged,
    /// The listing was kept as it was
    ListingRefreshFailed { error: String },
    /// The provider list was kept as it was
    ProvidersRefreshFailed { error: String },
    MutationFailed {
        operation: Operation,
        object: ObjectId,
        error: String,
    },
    /// A response arrived after a newer request was issued
    StaleResponseDiscarded { epoch: u64 },
}

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Multicast callback registry
#[derive(Default)]
pub struct Observers {
    callbacks: Mutex<Vec<Callback>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks.lock().push(Arc::new(callback));
    }

    /// Run every callback; the registry lock is released first so callbacks
    /// may register further observers
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = self.callbacks.lock().clone();
        for callback in callbacks {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_all() {
        let observers = Observers::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let count = count.clone();
            observers.register(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        observers.notify();
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(observers.len(), 3);
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::RemoveProvider.to_string(), "remove provider");
        assert_eq!(Operation::Move.to_string(), "move");
    }
}
