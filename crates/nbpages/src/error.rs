//! CLI error types.

use std::path::PathBuf;

use nbpages_config::ConfigError;
use nbpages_nav::NavError;
use nbpages_notebook::NotebookError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Notebook {
        path: PathBuf,
        #[source]
        source: NotebookError,
    },

    #[error("{0}")]
    Nav(#[from] NavError),

    #[error("{0}")]
    Validation(String),
}
