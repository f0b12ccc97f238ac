//! XML serialization of the document graph.
//!
//! Tab-indented, newline-terminated, UTF-8. Text content is entity-escaped;
//! fragments that must carry literal markup protect their angle brackets
//! with `{_LESSTHAN_}` / `{_GREATERTHAN_}` placeholders, which are restored
//! after serialization so the payload survives unescaped exactly once.

use super::DocNode;
use crate::error::{ExportError, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Placeholder for a literal `<` inside scalar text.
pub const LESSTHAN: &str = "{_LESSTHAN_}";
/// Placeholder for a literal `>` inside scalar text.
pub const GREATERTHAN: &str = "{_GREATERTHAN_}";

/// Serialize a document to an XML string.
pub fn write_document(root: &DocNode) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    write_node(&mut out, root, 0);
    restore_protected(out)
}

/// Serialize a document and write it to a file.
pub fn write_document_to(path: &Path, root: &DocNode) -> Result<()> {
    std::fs::write(path, write_document(root)).map_err(|e| {
        ExportError::Document(format!("cannot write '{}': {}", path.display(), e))
    })
}

fn write_node(out: &mut String, node: &DocNode, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }

    if node.is_leaf() {
        let text = node.text();
        if text.is_empty() {
            writeln!(out, "<{}/>", node.name()).unwrap();
        } else {
            writeln!(out, "<{}>{}</{}>", node.name(), escape(&text), node.name()).unwrap();
        }
        return;
    }

    writeln!(out, "<{}>", node.name()).unwrap();
    for child in node.children() {
        write_node(out, child, depth + 1);
    }
    for _ in 0..depth {
        out.push('\t');
    }
    writeln!(out, "</{}>", node.name()).unwrap();
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn restore_protected(xml: String) -> String {
    xml.replace(LESSTHAN, "<").replace(GREATERTHAN, ">")
}
