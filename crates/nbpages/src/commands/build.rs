//! `nbpages build` command implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Args;
use nbpages_notebook::{RenderOptions, render_path};

use super::nav::write_navigation;
use super::{PagesArgs, require_dir, require_file};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub pages: PagesArgs,

    /// Directory containing `.ipynb` notebooks (overrides config).
    #[arg(long)]
    pub src_dir: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the navigation file is missing,
    /// or if any notebook fails to render. The run stops at the first failure.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.pages.load_config(self.src_dir)?;
        let pages = &config.pages_resolved;

        require_dir(&pages.source_dir, "Source")?;
        require_dir(&pages.output_dir, "Output")?;
        require_file(&pages.nav_file, "Navigation")?;

        output.step("Converting notebooks to markdown files");
        let rendered = render_notebooks(
            &pages.source_dir,
            &pages.output_dir,
            &pages.render,
            Some(output),
        )?;
        if rendered == 0 {
            output.warning(&format!(
                "No notebooks found in {}",
                pages.source_dir.display()
            ));
        }

        output.step("Creating navigation file");
        let entries = write_navigation(pages)?;
        tracing::info!(notebooks = rendered, entries, "Build finished");

        output.success("Done.");
        Ok(())
    }
}

/// Render every notebook in `source_dir` to a page in `output_dir`.
///
/// Notebooks are processed in file name order. Returns the number of pages
/// written.
pub(crate) fn render_notebooks(
    source_dir: &Path,
    output_dir: &Path,
    options: &RenderOptions,
    output: Option<&Output>,
) -> Result<usize, CliError> {
    let notebooks = list_notebooks(source_dir)?;
    tracing::info!(count = notebooks.len(), dir = %source_dir.display(), "Rendering notebooks");

    for notebook in &notebooks {
        let page = output_dir.join(page_name(notebook));
        tracing::debug!(notebook = %notebook.display(), page = %page.display(), "Rendering");

        let content = render_path(notebook, options).map_err(|source| CliError::Notebook {
            path: notebook.clone(),
            source,
        })?;
        std::fs::write(&page, content).map_err(|source| CliError::Io {
            path: page.clone(),
            source,
        })?;

        if let Some(output) = output {
            output.rendered(notebook, &page);
        }
    }

    Ok(notebooks.len())
}

/// Regular `*.ipynb` files directly inside `dir`, sorted.
fn list_notebooks(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let io_err = |source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut notebooks = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "ipynb") {
            notebooks.push(path);
        }
    }
    notebooks.sort();
    Ok(notebooks)
}

/// `<stem>.md` for a notebook path.
///
/// Appends to the stem instead of using `with_extension`, which would
/// truncate stems that contain dots such as `01.Intro`.
fn page_name(notebook: &Path) -> OsString {
    let mut name = notebook.file_stem().unwrap_or_default().to_os_string();
    name.push(".md");
    name
}
