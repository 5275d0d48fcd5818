//! Utility modules for xmldom.
//!
//! Contains lexical `QName` handling shared by the event model and the tree.

pub mod qname;
