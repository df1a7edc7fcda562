//! Page title derivation from notebook file names.

use std::path::Path;

/// Derive a page title from a notebook path.
///
/// Uses the file stem with its ordering prefix removed:
/// - `01.Introduction.ipynb` -> `"Introduction"`
/// - `2. Linear models.ipynb` -> `"Linear models"`
/// - `scratch.ipynb` -> `"scratch"`
#[must_use]
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(std::ffi::OsStr::to_string_lossy)
        .unwrap_or_default();
    strip_order_prefix(&stem).to_owned()
}

/// Strip a leading `<digits>.` ordering prefix and the whitespace after it.
///
/// The stem is returned unchanged if nothing would remain.
#[must_use]
pub fn strip_order_prefix(stem: &str) -> &str {
    let rest = stem.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == stem.len() {
        return stem;
    }
    match rest.strip_prefix('.').map(str::trim_start) {
        Some(title) if !title.is_empty() => title,
        _ => stem,
    }
}
