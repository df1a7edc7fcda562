//! Notebook document model.
//!
//! Only the parts of the nbformat document that page rendering consumes are
//! modeled. Cell and output kinds are closed enums; kinds the renderer does not
//! know (`raw` cells, `error` outputs, ...) land in an `Unknown` variant
//! instead of failing the parse.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::NotebookError;

/// A parsed notebook: the ordered cell sequence.
///
/// No notebook-level metadata is read; the top-level `cells` key is the only
/// one consulted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    pub cells: Vec<Cell>,
}

impl Notebook {
    /// Parse a notebook from its JSON serialization.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Format`] if the JSON is malformed or a
    /// required key is missing.
    pub fn from_json(content: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a notebook file.
    ///
    /// The file is read fully into memory before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Io`] if the file can't be read, or
    /// [`NotebookError::Format`] if it can't be parsed.
    pub fn load(path: &Path) -> Result<Self, NotebookError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    /// Prose, already markdown-formatted.
    Markdown {
        /// Cell text.
        source: Text,
    },
    /// Source code with its captured outputs.
    Code {
        /// Execution order; `None` if the cell was never executed.
        #[serde(default)]
        execution_count: Option<u64>,
        /// Cell source code.
        source: Text,
        /// Captured outputs in order.
        outputs: Vec<Output>,
    },
    /// Any other cell kind. Renders as nothing.
    #[serde(other)]
    Unknown,
}

/// A captured code cell output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Captured stdout/stderr text.
    Stream {
        /// Stream text.
        text: Text,
    },
    /// Rich display output (plots, images, ...).
    DisplayData {
        /// MIME-keyed payloads.
        data: MimeBundle,
    },
    /// Value of the cell's last expression.
    ExecuteResult {
        /// MIME-keyed payloads.
        data: MimeBundle,
    },
    /// Any other output kind (e.g. `error`). Renders as nothing.
    #[serde(other)]
    Unknown,
}

/// Multiline text as stored by nbformat.
///
/// nbformat writes text either as a single string or as an array of line
/// fragments; both forms deserialize to the concatenated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "TextRepr")]
pub struct Text(String);

impl Text {
    /// The concatenated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextRepr {
    Single(String),
    Fragments(Vec<String>),
}

impl From<TextRepr> for Text {
    fn from(repr: TextRepr) -> Self {
        match repr {
            TextRepr::Single(text) => Self(text),
            TextRepr::Fragments(fragments) => Self(fragments.concat()),
        }
    }
}

/// Mapping from MIME type to payload, in document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MimeBundle(Map<String, Value>);

impl MimeBundle {
    /// Text payload for `mime`, if present.
    ///
    /// Payloads that are neither a string nor an array of strings (e.g. an
    /// `application/json` object) yield `None`.
    #[must_use]
    pub fn text(&self, mime: &str) -> Option<String> {
        self.0.get(mime).and_then(payload_text)
    }

    /// Payloads whose MIME type starts with `image`, in document order.
    pub fn images(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter(|(mime, _)| mime.starts_with("image"))
            .filter_map(|(mime, value)| payload_text(value).map(|text| (mime.as_str(), text)))
    }
}

impl FromIterator<(String, Value)> for MimeBundle {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn payload_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => items
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.concat()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_markdown_cell() {
        let nb = Notebook::from_json(
            r##"{"cells": [{"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "Body"]}]}"##,
        )
        .unwrap();

        assert_eq!(
            nb.cells,
            vec![Cell::Markdown {
                source: Text::from("# Title\nBody")
            }]
        );
    }

    #[test]
    fn test_parse_source_as_single_string() {
        let nb = Notebook::from_json(r#"{"cells": [{"cell_type": "markdown", "source": "text"}]}"#)
            .unwrap();

        assert_eq!(
            nb.cells,
            vec![Cell::Markdown {
                source: Text::from("text")
            }]
        );
    }

    #[test]
    fn test_parse_code_cell_with_outputs() {
        let nb = Notebook::from_json(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 3,
                "metadata": {},
                "source": ["x = 1\n", "x"],
                "outputs": [
                    {"output_type": "stream", "name": "stdout", "text": ["hi\n"]},
                    {"output_type": "execute_result", "execution_count": 3, "metadata": {},
                     "data": {"text/plain": ["1"]}}
                ]
            }]}"#,
        )
        .unwrap();

        let Cell::Code {
            execution_count,
            source,
            outputs,
        } = &nb.cells[0]
        else {
            panic!("expected code cell, got {:?}", nb.cells[0]);
        };
        assert_eq!(*execution_count, Some(3));
        assert_eq!(source.as_str(), "x = 1\nx");
        assert_eq!(outputs.len(), 2);
        assert_eq!(
            outputs[0],
            Output::Stream {
                text: Text::from("hi\n")
            }
        );
        let Output::ExecuteResult { data } = &outputs[1] else {
            panic!("expected execute_result, got {:?}", outputs[1]);
        };
        assert_eq!(data.text("text/plain"), Some("1".to_owned()));
    }

    #[test]
    fn test_parse_null_and_missing_execution_count() {
        let nb = Notebook::from_json(
            r#"{"cells": [
                {"cell_type": "code", "execution_count": null, "source": [], "outputs": []},
                {"cell_type": "code", "source": [], "outputs": []}
            ]}"#,
        )
        .unwrap();

        for cell in &nb.cells {
            assert!(matches!(
                cell,
                Cell::Code {
                    execution_count: None,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_parse_unknown_kinds() {
        let nb = Notebook::from_json(
            r#"{"cells": [
                {"cell_type": "raw", "source": ["raw text"]},
                {"cell_type": "code", "execution_count": 1, "source": "1/0", "outputs": [
                    {"output_type": "error", "ename": "ZeroDivisionError", "evalue": "", "traceback": []}
                ]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(nb.cells[0], Cell::Unknown);
        let Cell::Code { outputs, .. } = &nb.cells[1] else {
            panic!("expected code cell");
        };
        assert_eq!(outputs, &vec![Output::Unknown]);
    }

    #[test]
    fn test_ignores_other_top_level_keys() {
        let nb = Notebook::from_json(
            r#"{"cells": [], "metadata": {"kernelspec": {"name": "python3"}}, "nbformat": 4, "nbformat_minor": 5}"#,
        )
        .unwrap();
        assert!(nb.cells.is_empty());
    }

    #[test]
    fn test_missing_cells_is_format_error() {
        let err = Notebook::from_json(r#"{"metadata": {}}"#).unwrap_err();
        assert!(matches!(err, NotebookError::Format(_)), "got {err:?}");
        assert!(err.to_string().contains("cells"));
    }

    #[test]
    fn test_missing_cell_type_is_format_error() {
        let err = Notebook::from_json(r#"{"cells": [{"source": ["text"]}]}"#).unwrap_err();
        assert!(matches!(err, NotebookError::Format(_)), "got {err:?}");
        assert!(err.to_string().contains("cell_type"));
    }

    #[test]
    fn test_missing_outputs_is_format_error() {
        let err = Notebook::from_json(r#"{"cells": [{"cell_type": "code", "source": "x"}]}"#)
            .unwrap_err();
        assert!(matches!(err, NotebookError::Format(_)), "got {err:?}");
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = Notebook::from_json("{\"cells\": [").unwrap_err();
        assert!(matches!(err, NotebookError::Format(_)), "got {err:?}");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Notebook::load(&dir.path().join("missing.ipynb")).unwrap_err();
        assert!(matches!(err, NotebookError::Io(_)), "got {err:?}");
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");
        fs::write(&path, r#"{"cells": [{"cell_type": "markdown", "source": "hi"}]}"#).unwrap();

        let nb = Notebook::load(&path).unwrap();
        assert_eq!(nb.cells.len(), 1);
    }

    #[test]
    fn test_mime_bundle_text_forms() {
        let bundle: MimeBundle = [
            ("text/plain".to_owned(), json!("plain")),
            ("text/html".to_owned(), json!(["<b>", "x</b>"])),
            ("application/json".to_owned(), json!({"a": 1})),
        ]
        .into_iter()
        .collect();

        assert_eq!(bundle.text("text/plain"), Some("plain".to_owned()));
        assert_eq!(bundle.text("text/html"), Some("<b>x</b>".to_owned()));
        assert_eq!(bundle.text("application/json"), None);
        assert_eq!(bundle.text("text/markdown"), None);
    }

    #[test]
    fn test_mime_bundle_images_in_document_order() {
        let bundle: MimeBundle = serde_json::from_str(
            r#"{"text/plain": "<Figure>", "image/svg+xml": ["<svg/>"], "image/png": "AAAA"}"#,
        )
        .unwrap();

        let images: Vec<_> = bundle.images().collect();
        assert_eq!(
            images,
            vec![
                ("image/svg+xml", "<svg/>".to_owned()),
                ("image/png", "AAAA".to_owned())
            ]
        );
    }
}
