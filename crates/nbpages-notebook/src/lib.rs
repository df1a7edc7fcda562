//! Notebook parsing and markdown page rendering for nbpages.
//!
//! This crate provides:
//! - [`Notebook`]: the cell model deserialized from nbformat JSON
//! - [`render`]: notebook to markdown page with synthesized front matter
//! - [`title_from_path`]: page title from a notebook file name
//!
//! # Example
//!
//! ```
//! use nbpages_notebook::{Notebook, RenderOptions, render};
//!
//! let json = r##"{"cells": [{"cell_type": "markdown", "source": ["# Hello"]}]}"##;
//! let notebook = Notebook::from_json(json)?;
//! let page = render(&notebook, "Hello", &RenderOptions::default());
//! assert!(page.starts_with("---\nlayout: default\ntitle: Hello\nmathjax: true\n---\n"));
//! # Ok::<(), nbpages_notebook::NotebookError>(())
//! ```

mod error;
mod notebook;
mod render;
mod title;

use std::path::Path;

pub use error::NotebookError;
pub use notebook::{Cell, MimeBundle, Notebook, Output, Text};
pub use render::{
    BacktickFences, DEFAULT_LANG, FenceBackend, FenceStyle, LiquidFences, PageRenderer,
    RenderOptions, render,
};
pub use title::{strip_order_prefix, title_from_path};

/// Load the notebook at `path` and render it, titled after its file name.
///
/// # Errors
///
/// Returns [`NotebookError`] if the file can't be read or parsed.
pub fn render_path(path: &Path, options: &RenderOptions) -> Result<String, NotebookError> {
    let notebook = Notebook::load(path)?;
    Ok(render(&notebook, &title_from_path(path), options))
}
