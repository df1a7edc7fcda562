//! Front matter extraction and navigation manifest building for nbpages.
//!
//! Scans a flat directory of rendered markdown pages and derives the site's
//! navigation menu from their front matter:
//!
//! - [`FrontMatter`]: the YAML block at the head of a page
//! - [`build_manifest`]: one [`NavEntry`] per listed page
//! - [`NavManifest`]: the ordered entries, written out as YAML
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use nbpages_nav::build_manifest;
//!
//! let manifest = build_manifest(Path::new("notes"), Path::new("."))?;
//! manifest.write_to(Path::new("_data/notes.yml"))?;
//! # Ok::<(), nbpages_nav::NavError>(())
//! ```

mod error;
mod front_matter;
mod manifest;

pub use error::NavError;
pub use front_matter::{FrontMatter, FrontMatterError, extract_block};
pub use manifest::{NavEntry, NavManifest, build_manifest};
