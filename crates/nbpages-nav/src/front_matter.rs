//! YAML front matter extraction.
//!
//! A front matter block is the first block of a markdown file, delimited by
//! two `---` lines. Blank lines (and a byte order mark) may precede the
//! opening delimiter; any other content before it means the file has no front
//! matter.
//!
//! Scanning is a small state machine:
//!
//! ```text
//! BeforeBlock --"---"--> InBlock --"---"--> AfterBlock
//!      |                    |
//!   other line            EOF
//!      v                    v
//!  no front matter     Unterminated
//! ```

use serde_yaml::{Mapping, Value};

/// Block delimiter line.
const DELIMITER: &str = "---";

/// Error parsing a front matter block.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// Opening delimiter without a closing one.
    #[error("block opened on line {line} is never closed")]
    Unterminated {
        /// 1-based line of the opening delimiter.
        line: usize,
    },

    /// Block content is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Block content is YAML but not a key-value mapping.
    #[error("expected a key-value mapping")]
    NotMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before the opening delimiter, only blank lines seen.
    BeforeBlock,
    /// After the opening delimiter; `start` is the byte offset of the block
    /// content, `line` the delimiter's line number.
    InBlock { start: usize, line: usize },
    /// Closing delimiter seen; the block spans `start..end`.
    AfterBlock { start: usize, end: usize },
}

/// Locate the raw front matter block of `content`.
///
/// Returns the text between the delimiters (without them), or `None` if the
/// file doesn't start with a block.
///
/// # Errors
///
/// Returns [`FrontMatterError::Unterminated`] if the closing delimiter is
/// missing.
pub fn extract_block(content: &str) -> Result<Option<&str>, FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut state = ScanState::BeforeBlock;
    let mut offset = 0;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();

        state = match state {
            ScanState::BeforeBlock if trimmed == DELIMITER => ScanState::InBlock {
                start: offset,
                line: index + 1,
            },
            ScanState::BeforeBlock if trimmed.is_empty() => ScanState::BeforeBlock,
            ScanState::BeforeBlock => return Ok(None),
            ScanState::InBlock { start, .. } if trimmed == DELIMITER => ScanState::AfterBlock {
                start,
                end: line_start,
            },
            in_block @ ScanState::InBlock { .. } => in_block,
            ScanState::AfterBlock { .. } => break,
        };

        if matches!(state, ScanState::AfterBlock { .. }) {
            break;
        }
    }

    match state {
        ScanState::BeforeBlock => Ok(None),
        ScanState::InBlock { line, .. } => Err(FrontMatterError::Unterminated { line }),
        ScanState::AfterBlock { start, end } => Ok(Some(&content[start..end])),
    }
}

/// Parsed front matter of a markdown page.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Extract and parse the front matter of `content`.
    ///
    /// Returns `None` when there is no block, or the block is blank or a YAML
    /// `null`.
    ///
    /// # Errors
    ///
    /// Returns [`FrontMatterError`] for an unterminated block, invalid YAML,
    /// or YAML that is not a mapping.
    pub fn parse(content: &str) -> Result<Option<Self>, FrontMatterError> {
        let Some(block) = extract_block(content)? else {
            return Ok(None);
        };
        if block.trim().is_empty() {
            return Ok(None);
        }

        match serde_yaml::from_str(block)? {
            Value::Null => Ok(None),
            Value::Mapping(fields) => Ok(Some(Self { fields })),
            _ => Err(FrontMatterError::NotMapping),
        }
    }

    /// Raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Page title.
    ///
    /// Scalar titles (`title: 2024` or `title: true`) are returned as text;
    /// `null` and collection values yield `None`.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        match self.get("title")? {
            Value::String(title) => Some(title.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Whether the page is listed in navigation.
    ///
    /// Only an explicit boolean `published: false` unlists a page.
    #[must_use]
    pub fn is_published(&self) -> bool {
        !matches!(self.get("published"), Some(Value::Bool(false)))
    }
}
