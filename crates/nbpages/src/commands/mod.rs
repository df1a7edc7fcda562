//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod nav;

use std::path::{Path, PathBuf};

use clap::Args;
use nbpages_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use nav::NavArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    /// Path to configuration file (default: auto-discover nbpages.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory rendered pages are written to (overrides config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Navigation file to rewrite (overrides config).
    #[arg(long)]
    nav_file: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,
}

impl PagesArgs {
    /// Load config, letting command line values take precedence.
    pub(crate) fn load_config(&self, source_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir,
            output_dir: self.out_dir.clone(),
            nav_file: self.nav_file.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

pub(crate) fn require_dir(path: &Path, what: &str) -> Result<(), CliError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::Validation(format!(
            "{what} directory does not exist: {}",
            path.display()
        )))
    }
}

pub(crate) fn require_file(path: &Path, what: &str) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::Validation(format!(
            "{what} file does not exist: {}",
            path.display()
        )))
    }
}
