//! Writing a [`Document`](crate::Document) back out as XML text.

mod xml;

pub use xml::{escape, serialize, write, EscapeContext};
