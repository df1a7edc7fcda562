//! Navigation error types.

use std::path::PathBuf;

use crate::front_matter::FrontMatterError;

/// Error returned while building or writing a navigation manifest.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A directory or file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path of the failed operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Front matter exists but can't be parsed (unterminated block, invalid
    /// YAML, not a mapping).
    #[error("Invalid front matter in {}: {source}", path.display())]
    Format {
        /// Markdown file with the malformed block.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: FrontMatterError,
    },

    /// Front matter parsed but has no usable `title`.
    #[error("Front matter in {} has no title", path.display())]
    Schema {
        /// Markdown file missing the title.
        path: PathBuf,
    },

    /// A page is not located under the URL root.
    #[error("{} is outside of {}", path.display(), root.display())]
    OutsideRoot {
        /// Page path.
        path: PathBuf,
        /// Root the URL is derived against.
        root: PathBuf,
    },

    /// The manifest could not be serialized.
    #[error("Failed to serialize navigation: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl NavError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
