//! Navigation manifest building.
//!
//! The manifest is a single flat layer: one entry per listed markdown file of
//! a directory, sorted by file name. Subdirectories are not visited.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::NavError;
use crate::front_matter::FrontMatter;

/// Extensions of markdown pages.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// A navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Page title from front matter.
    pub title: String,
    /// Root-relative page URL (e.g. `/notes/intro.html`).
    pub url: String,
}

/// Ordered navigation entries, serialized as a YAML list of maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavManifest {
    entries: Vec<NavEntry>,
}

impl NavManifest {
    /// Entries in navigation order.
    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Serialize`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, NavError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the manifest to `path`, replacing its content.
    ///
    /// The YAML is fully serialized before the file is opened, so a
    /// serialization failure leaves the file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if serialization or the write fails.
    pub fn write_to(&self, path: &Path) -> Result<(), NavError> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).map_err(|e| NavError::io(path, e))
    }
}

impl From<Vec<NavEntry>> for NavManifest {
    fn from(entries: Vec<NavEntry>) -> Self {
        Self { entries }
    }
}

/// Build the navigation manifest for the markdown pages of `directory`.
///
/// Page URLs are derived from each file's path relative to `relative_to`.
/// Files without front matter and files marked `published: false` are
/// skipped.
///
/// # Errors
///
/// Returns [`NavError::Format`] for malformed front matter (including an
/// unterminated block), [`NavError::Schema`] for front matter without a
/// title, [`NavError::OutsideRoot`] if `directory` is not under
/// `relative_to`, and [`NavError::Io`] for filesystem failures.
pub fn build_manifest(directory: &Path, relative_to: &Path) -> Result<NavManifest, NavError> {
    let directory = fs::canonicalize(directory).map_err(|e| NavError::io(directory, e))?;
    let root = fs::canonicalize(relative_to).map_err(|e| NavError::io(relative_to, e))?;

    let mut entries = Vec::new();
    for path in markdown_files(&directory)? {
        tracing::debug!(path = %path.display(), "Parsing front matter");

        let content = fs::read_to_string(&path).map_err(|e| NavError::io(&path, e))?;
        let front_matter = FrontMatter::parse(&content).map_err(|source| NavError::Format {
            path: path.clone(),
            source,
        })?;

        let Some(front_matter) = front_matter else {
            tracing::debug!(path = %path.display(), "Skipping page without front matter");
            continue;
        };
        if !front_matter.is_published() {
            tracing::debug!(path = %path.display(), "Skipping unpublished page");
            continue;
        }

        let title = front_matter
            .title()
            .ok_or_else(|| NavError::Schema { path: path.clone() })?;
        let url = page_url(&path, &root).ok_or_else(|| NavError::OutsideRoot {
            path: path.clone(),
            root: root.clone(),
        })?;
        entries.push(NavEntry { title, url });
    }

    tracing::info!(
        directory = %directory.display(),
        entries = entries.len(),
        "Built navigation"
    );
    Ok(NavManifest { entries })
}

/// Markdown files directly inside `directory`, sorted by file name.
fn markdown_files(directory: &Path) -> Result<Vec<PathBuf>, NavError> {
    let entries = fs::read_dir(directory).map_err(|e| NavError::io(directory, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| NavError::io(directory, e))?.path();
        if path.is_file() && is_markdown(&path) {
            files.push(path);
        }
    }
    // Same parent, so path order is file name order.
    files.sort();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.iter().any(|md| ext == *md))
}

/// Root-relative `.html` URL of the page at `path`.
///
/// Returns `None` if `path` is not inside `root`.
///
/// Examples (root `/site`):
/// - `/site/intro.md` -> `/intro.html`
/// - `/site/notes/01.Basics.markdown` -> `/notes/01.Basics.html`
pub(crate) fn page_url(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("html");

    let segments: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(format!("/{}", segments.join("/")))
}
