// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for ObjectId normalization and listing decoding

#![no_main]

use libfuzzer_sys::fuzz_target;
use orb_core::{wire, ObjectId};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (path, mime) = input.split_once('\n').unwrap_or((input, "directory"));
        let id = ObjectId::new(path, mime);

        // Normalizing twice changes nothing
        assert!(!id.path().starts_with('/'));
        assert_eq!(ObjectId::new(id.path(), mime), id);
        let _ = id.is_folder();
        let _ = id.is_symlink();
    }

    // Malformed records are skipped, never panicked on
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = wire::decode_listing(value.clone());
        let _ = wire::decode_providers(value);
    }
});
