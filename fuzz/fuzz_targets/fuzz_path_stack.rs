// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for path stack and history operations

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use orb_core::ObjectId;
use orb_vfs::{History, HistoryEntry, PathElement, PathStack};

#[derive(Debug, Arbitrary)]
enum Op {
    Push(String),
    Pop,
    Truncate(u8),
    Clear,
    Back,
    Forward,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut path = PathStack::new();
    let mut history = History::new();
    history.push(HistoryEntry::snapshot(&path, None));

    for op in ops {
        match op {
            Op::Push(name) => {
                path.push(PathElement::new(ObjectId::directory(&name), name));
                history.push(HistoryEntry::snapshot(&path, None));
            }
            Op::Pop => {
                let before = path.len();
                let popped = path.pop();
                assert_eq!(popped.is_some(), before > 0);
            }
            Op::Truncate(depth) => {
                let before = path.len();
                path.truncate(depth as usize);
                assert_eq!(path.len(), before.min(depth as usize));
            }
            Op::Clear => path.clear(),
            Op::Back => {
                if let Some(entry) = history.go_back() {
                    path.set(entry.path);
                }
            }
            Op::Forward => {
                if let Some(entry) = history.go_forward() {
                    path.set(entry.path);
                }
            }
        }

        // The top of an empty stack is the provider root
        if path.is_empty() {
            assert!(path.top().object_id.is_root());
        }
    }
});
