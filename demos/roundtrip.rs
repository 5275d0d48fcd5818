//! Parse, inspect and re-serialize a namespaced document.
//!
//! Run with: `cargo run --example roundtrip`
#![allow(clippy::expect_used)]

use xmldom::serial::serialize;
use xmldom::{Document, NodeKind};

fn main() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<developer xmlns="www.jroller.com/santhosh/" xmlns:app='http://example.com/app'>
    <name>Santhosh Kumar Tekuri</name>
    <email>santhosh.tekuri@gmail.com</email>
    <app:note app:lang="en">First &amp; foremost<![CDATA[ <raw> ]]></app:note>
</developer>
"#;

    println!("=== Original XML ===");
    println!("{xml}");

    let doc = Document::parse_str(xml).expect("failed to parse");
    let root = doc.root_element().expect("document has a root element");
    let name = doc.element_name(root).expect("root is an element");
    println!("=== Root element: {} ===", name.expanded());

    for child in doc.children(root) {
        if let NodeKind::Element { name, .. } = doc.kind(child) {
            println!("  {} = {:?}", name.expanded(), doc.text_content(child));
            for attr in doc.attributes(child) {
                println!("    @{} = {:?}", attr.name.expanded(), attr.value);
            }
        }
    }

    let output = serialize(&doc);
    println!("\n=== Serialized ===");
    println!("{output}");

    let doc2 = Document::parse_str(&output).expect("roundtrip parse failed");
    println!("\n=== Roundtrip stable: {} ===", output == serialize(&doc2));
}
