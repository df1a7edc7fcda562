//! Configuration management for nbpages.
//!
//! Parses `nbpages.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [pages]
//! source_dir = "notes"
//! output_dir = "notes"
//! nav_file = "_data/notes.yml"
//! lang = "ru"
//! fence = "backtick"
//! ```
//!
//! ## Path Expansion
//!
//! Path values are expanded with `shellexpand` before resolution:
//!
//! - `~` - the home directory
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Relative paths resolve against the directory of the config file, which is
//! also the project root that navigation URLs are relative to.

use std::path::{Path, PathBuf};

use nbpages_notebook::{DEFAULT_LANG, FenceStyle, RenderOptions};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override notebook source directory.
    pub source_dir: Option<PathBuf>,
    /// Override rendered page output directory.
    pub output_dir: Option<PathBuf>,
    /// Override navigation file path.
    pub nav_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nbpages.toml";

const DEFAULT_SOURCE_DIR: &str = "notes";
const DEFAULT_NAV_FILE: &str = "_data/notes.yml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pages configuration (paths are relative strings from TOML).
    pages: PagesConfigRaw,

    /// Resolved pages configuration (set after loading).
    #[serde(skip)]
    pub pages_resolved: PagesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw pages configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct PagesConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    nav_file: Option<String>,
    lang: Option<String>,
    fence: Option<FenceStyle>,
}

/// Resolved pages configuration with absolute paths.
#[derive(Debug, Default)]
pub struct PagesConfig {
    /// Project root; navigation URLs are relative to it.
    pub project_dir: PathBuf,
    /// Directory containing `.ipynb` notebooks.
    pub source_dir: PathBuf,
    /// Directory rendered `.md` pages are written to.
    pub output_dir: PathBuf,
    /// Navigation manifest file (must already exist).
    pub nav_file: PathBuf,
    /// Page rendering options.
    pub render: RenderOptions,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Path expansion error.
    #[error("Cannot expand {field}: {message}")]
    Expand {
        /// Config field path (e.g., "`pages.source_dir`").
        field: String,
        /// Error message.
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `nbpages.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.pages_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.pages_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(nav_file) = &settings.nav_file {
            self.pages_resolved.nav_file.clone_from(nav_file);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            pages: PagesConfigRaw::default(),
            pages_resolved: PagesConfig {
                project_dir: base.to_path_buf(),
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                output_dir: base.join(DEFAULT_SOURCE_DIR),
                nav_file: base.join(DEFAULT_NAV_FILE),
                render: RenderOptions::default(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages_resolved.render.lang.trim().is_empty() {
            return Err(ConfigError::Validation(
                "pages.lang cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |value: Option<&str>, default: &str, field: &str| {
            expand_path(value.unwrap_or(default), field).map(|path| config_dir.join(path))
        };

        let source_dir = resolve(
            self.pages.source_dir.as_deref(),
            DEFAULT_SOURCE_DIR,
            "pages.source_dir",
        )?;
        // Pages are written next to their notebooks unless told otherwise.
        let output_dir = match self.pages.output_dir.as_deref() {
            Some(dir) => resolve(Some(dir), DEFAULT_SOURCE_DIR, "pages.output_dir")?,
            None => source_dir.clone(),
        };
        let nav_file = resolve(
            self.pages.nav_file.as_deref(),
            DEFAULT_NAV_FILE,
            "pages.nav_file",
        )?;

        self.pages_resolved = PagesConfig {
            project_dir: config_dir.to_path_buf(),
            source_dir,
            output_dir,
            nav_file,
            render: RenderOptions {
                lang: self
                    .pages
                    .lang
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LANG.to_owned()),
                fence: self.pages.fence.unwrap_or_default(),
            },
        };

        Ok(())
    }
}

/// Expand `~` and environment variables in a path value.
fn expand_path(value: &str, field: &str) -> Result<PathBuf, ConfigError> {
    shellexpand::full(value)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| ConfigError::Expand {
            field: field.to_owned(),
            message: e.to_string(),
        })
}
