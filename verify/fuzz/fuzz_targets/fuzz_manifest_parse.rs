// Licensed under the Apache-2.0 license

#![no_main]

use libfuzzer_sys::fuzz_target;

use bootgate_verify::{digest_file_name, Manifest, MANIFEST_ENTRY_NAME_MAX, MANIFEST_MAX_ENTRIES};

fuzz_target!(|data: &[u8]| {
    let Ok(manifest) = Manifest::parse(data) else {
        return;
    };

    assert!(manifest.len() <= MANIFEST_MAX_ENTRIES);
    for entry in manifest.entries() {
        assert!(!entry.is_empty());
        assert!(!entry.contains('\n'));

        match digest_file_name(entry) {
            Ok(derived) => {
                assert!(entry.len() <= MANIFEST_ENTRY_NAME_MAX);
                assert_eq!(derived.len(), entry.len() + 5);
                assert!(derived.ends_with(".dgst"));
            }
            Err(_) => assert!(entry.len() > MANIFEST_ENTRY_NAME_MAX),
        }
    }
});
