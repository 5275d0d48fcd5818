#![no_main]
use libfuzzer_sys::fuzz_target;
use xmldom::parser::{parse_bytes, parse_str_with_options, BuildOptions};

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic, whatever the bytes.
    let _ = parse_bytes(data);
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_str_with_options(s, &BuildOptions::default().max_depth(16));
    }
});
