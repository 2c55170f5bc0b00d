#![no_main]

use libfuzzer_sys::fuzz_target;
use toml_arena::number::{recognize_bool, recognize_number};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    match recognize_number(data, 0) {
        Ok(lit) => {
            assert!(lit.end > 0 && lit.end <= data.len());
            // a recognized literal never stops inside an identifier run
            if let Some(&b) = data.get(lit.end) {
                assert!(!b.is_ascii_alphanumeric() && b != b'_' && b != b'-' && b != b'.');
            }
        }
        Err(bad) => assert!(bad.at <= data.len()),
    }
    if let Some(lit) = recognize_bool(data, 0) {
        assert!(&data[..lit.end] == b"true" || &data[..lit.end] == b"false");
    }
});
