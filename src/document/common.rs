//! Common utilities for document generation.
//!
//! Shared helpers for XML escaping, output filenames, and static assets.

use std::path::Path;

/// Escape special characters for WordprocessingML text nodes.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Build a download filename such as `contract-سارة-أحمد.docx`.
///
/// Arabic letters are kept; whitespace collapses to single dashes and anything
/// a file system would reject is removed.
pub fn contract_filename(student_name: Option<&str>) -> String {
    let cleaned = sanitize_filename::sanitize(student_name.unwrap_or_default().trim());
    let slug = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    if slug.is_empty() {
        "contract.docx".to_string()
    } else {
        format!("contract-{}.docx", slug)
    }
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
