//! Extension to content-type mapping.

use std::collections::HashMap;
use std::path::Path;

/// Content type for extensions missing from the table.
pub const FALLBACK: &str = "application/octet-stream";

const BUILTIN: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml; charset=utf-8"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/markdown; charset=utf-8"),
];

/// Lookup table from lower-case extension to content type.
#[derive(Debug, Clone)]
pub struct MimeTable {
    entries: HashMap<String, String>,
}

impl MimeTable {
    /// Built-in table with `overrides` applied on top.
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let mut entries: HashMap<String, String> = BUILTIN
            .iter()
            .map(|(ext, ty)| (ext.to_string(), ty.to_string()))
            .collect();
        for (ext, ty) in overrides {
            entries.insert(ext.to_ascii_lowercase(), ty.clone());
        }
        Self { entries }
    }

    /// Content type for `path`, by its extension (case-insensitive).
    pub fn content_type(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.entries.get(&ext.to_ascii_lowercase()))
            .map(String::as_str)
            .unwrap_or(FALLBACK)
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::with_overrides(std::iter::empty())
    }
}
