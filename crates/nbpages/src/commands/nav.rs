//! `nbpages nav` command implementation.

use clap::Args;
use nbpages_config::PagesConfig;
use nbpages_nav::build_manifest;

use super::{PagesArgs, require_dir, require_file};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    pub pages: PagesArgs,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory or navigation file is missing,
    /// or if any page has malformed front matter.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.pages.load_config(None)?;
        let pages = &config.pages_resolved;

        require_dir(&pages.output_dir, "Output")?;
        require_file(&pages.nav_file, "Navigation")?;

        output.step("Creating navigation file");
        write_navigation(pages)?;

        output.success("Done.");
        Ok(())
    }
}

/// Rebuild the navigation file from the pages in the output directory.
///
/// Returns the number of entries written.
pub(crate) fn write_navigation(pages: &PagesConfig) -> Result<usize, CliError> {
    let manifest = build_manifest(&pages.output_dir, &pages.project_dir)?;
    manifest.write_to(&pages.nav_file)?;
    tracing::info!(
        entries = manifest.len(),
        file = %pages.nav_file.display(),
        "Navigation written"
    );
    Ok(manifest.len())
}
