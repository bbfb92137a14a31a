//! Base-name deduplication of PDFs across directories and archives.

use std::collections::HashSet;
use std::path::Path;

/// Names already processed during one run.
#[derive(Debug, Default)]
pub(crate) struct DedupSet {
    seen: HashSet<String>,
}

impl DedupSet {
    /// Record `key`; `false` when it was seen before. Empty keys always pass.
    pub(crate) fn admit(&mut self, key: &str) -> bool {
        key.is_empty() || self.seen.insert(key.to_string())
    }
}

/// Trimmed, lower-cased file name.
pub(crate) fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Key for a file on disk.
pub(crate) fn key_for_path(path: &Path) -> String {
    path.file_name()
        .map(|name| normalize_key(&name.to_string_lossy()))
        .unwrap_or_default()
}

/// Key for a ZIP entry; entry names always use `/`.
pub(crate) fn key_for_entry(name: &str) -> String {
    let name = name.trim_end_matches('/');
    normalize_key(name.rsplit('/').next().unwrap_or(name))
}
