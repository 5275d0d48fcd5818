#![no_main]
use libfuzzer_sys::fuzz_target;
use xmldom::serial::serialize;
use xmldom::Document;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Whatever parses must serialize to something that parses again and
    // serializes identically.
    if let Ok(doc) = Document::parse_str(s) {
        let first = serialize(&doc);
        let reparsed = match Document::parse_str(&first) {
            Ok(doc) => doc,
            Err(err) => panic!("serializer output rejected: {err}\n{first}"),
        };
        assert_eq!(first, serialize(&reparsed));
    }
});
