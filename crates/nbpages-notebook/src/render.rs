//! Notebook to markdown page rendering.
//!
//! A rendered page is a front-matter block (`layout`, `title`, `mathjax`)
//! followed by one rendering per cell:
//!
//! - markdown cells are copied verbatim
//! - code cells become a `python` code block headed by `# In [n]:`, an
//!   `Out [n]:` label, and one block per output
//!
//! Code block syntax is delegated to a [`FenceBackend`], selected at runtime
//! by [`FenceStyle`].

use std::fmt::Write;
use std::marker::PhantomData;

use serde::Deserialize;

use crate::notebook::{Cell, MimeBundle, Notebook, Output};

/// Default content-language tag.
pub const DEFAULT_LANG: &str = "ru";

/// Language of every code cell block.
const CODE_LANG: &str = "python";

/// How code blocks are delimited in the rendered page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceStyle {
    /// CommonMark backtick fences.
    #[default]
    Backtick,
    /// Jekyll Liquid `{% highlight %}` tags.
    Liquid,
}

/// Options for [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Content-language tag of the site. Does not affect the code block
    /// language, which is always `python`.
    pub lang: String,
    /// Code block syntax.
    pub fence: FenceStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_owned(),
            fence: FenceStyle::default(),
        }
    }
}

/// Code block syntax of a rendered page.
pub trait FenceBackend {
    /// Write a code block with an optional language tag.
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);
}

/// CommonMark fenced code blocks.
///
/// The fence is one backtick longer than the longest backtick run inside the
/// content (at least three), so content can't close the block early.
pub struct BacktickFences;

impl FenceBackend for BacktickFences {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        let fence = "`".repeat((longest_backtick_run(content) + 1).max(3));
        let _ = write!(out, "{fence}{}\n{content}\n{fence}\n", lang.unwrap_or(""));
    }
}

/// Jekyll Liquid `highlight` tags.
///
/// Liquid requires a language, so untagged blocks use `text`.
pub struct LiquidFences;

impl FenceBackend for LiquidFences {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        let _ = write!(
            out,
            "{{% highlight {} %}}\n{content}\n{{% endhighlight %}}\n",
            lang.unwrap_or("text")
        );
    }
}

fn longest_backtick_run(content: &str) -> usize {
    content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0)
}

/// Render a notebook into a markdown page.
///
/// Pure function of its inputs: rendering the same notebook twice yields
/// identical text.
#[must_use]
pub fn render(notebook: &Notebook, title: &str, options: &RenderOptions) -> String {
    tracing::debug!(
        title,
        lang = %options.lang,
        cells = notebook.cells.len(),
        "Rendering notebook"
    );
    match options.fence {
        FenceStyle::Backtick => PageRenderer::<BacktickFences>::new().render(notebook, title),
        FenceStyle::Liquid => PageRenderer::<LiquidFences>::new().render(notebook, title),
    }
}

/// Page renderer generic over the code block syntax.
pub struct PageRenderer<B: FenceBackend> {
    output: String,
    _backend: PhantomData<B>,
}

impl<B: FenceBackend> Default for PageRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: FenceBackend> PageRenderer<B> {
    /// Create a renderer with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::new(),
            _backend: PhantomData,
        }
    }

    /// Render `notebook` as a page titled `title`, consuming the renderer.
    #[must_use]
    pub fn render(mut self, notebook: &Notebook, title: &str) -> String {
        self.front_matter(title);
        for cell in &notebook.cells {
            self.cell(cell);
            self.output.push('\n');
        }
        self.output
    }

    fn front_matter(&mut self, title: &str) {
        let _ = write!(
            self.output,
            "---\nlayout: default\ntitle: {}\nmathjax: true\n---\n\n",
            yaml_scalar(title)
        );
    }

    fn cell(&mut self, cell: &Cell) {
        match cell {
            Cell::Markdown { source } => {
                self.output.push_str(source.as_str());
                self.output.push('\n');
            }
            Cell::Code {
                execution_count,
                source,
                outputs,
            } => {
                let count = execution_count
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();

                let mut code = format!("# In [{count}]:\n");
                code.push_str(source.as_str());
                B::code_block(Some(CODE_LANG), &code, &mut self.output);

                let _ = write!(self.output, "\nOut [{count}]:\n");
                for output in outputs {
                    self.cell_output(output);
                }
            }
            // Unknown cell kinds contribute only the separator.
            Cell::Unknown => {}
        }
    }

    fn cell_output(&mut self, output: &Output) {
        match output {
            Output::Stream { text } => B::code_block(None, text.as_str(), &mut self.output),
            Output::DisplayData { data } => self.images(data),
            Output::ExecuteResult { data } => self.execute_result(data),
            Output::Unknown => {}
        }
    }

    fn images(&mut self, data: &MimeBundle) {
        for (mime, payload) in data.images() {
            // Payload is embedded as base64 as-is; line breaks would split the URI.
            let payload: String = payload.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
            let _ = writeln!(
                self.output,
                r#"<p><img src="data:{mime};base64,{payload}"></p>"#
            );
        }
    }

    fn execute_result(&mut self, data: &MimeBundle) {
        if let Some(html) = data.text("text/html") {
            let _ = writeln!(self.output, "<p>{html}</p>");
        } else if let Some(text) = data.text("text/plain") {
            B::code_block(None, &text, &mut self.output);
        }
    }
}

/// Format `value` as a YAML scalar, quoting it only when a plain scalar would
/// be read back differently.
fn yaml_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(yaml) => yaml.trim_end_matches('\n').to_owned(),
        Err(_) => value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FRONT_MATTER: &str = "---\nlayout: default\ntitle: Intro\nmathjax: true\n---\n\n";

    fn notebook(json: &str) -> Notebook {
        Notebook::from_json(json).unwrap()
    }

    fn render_default(json: &str) -> String {
        render(&notebook(json), "Intro", &RenderOptions::default())
    }

    #[test]
    fn test_empty_notebook_is_front_matter_only() {
        assert_eq!(render_default(r#"{"cells": []}"#), FRONT_MATTER);
    }

    #[test]
    fn test_markdown_cells() {
        let page = render_default(
            r##"{"cells": [
                {"cell_type": "markdown", "source": ["# Title\n", "Some text"]},
                {"cell_type": "markdown", "source": ["$$x^2$$"]}
            ]}"##,
        );

        assert_eq!(
            page,
            format!("{FRONT_MATTER}# Title\nSome text\n\n$$x^2$$\n\n")
        );
    }

    #[test]
    fn test_front_matter_has_exactly_three_keys() {
        let page = render_default(r#"{"cells": [{"cell_type": "markdown", "source": "a: b"}]}"#);

        let block = page
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("\n---\n"))
            .map(|(block, _)| block)
            .unwrap();
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(block).unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping["layout"], "default");
        assert_eq!(mapping["title"], "Intro");
        assert_eq!(mapping["mathjax"], true);
    }

    #[test]
    fn test_code_cell_with_stream_output() {
        let page = render_default(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 1,
                "source": ["x = 1\n", "print(x)"],
                "outputs": [{"output_type": "stream", "name": "stdout", "text": ["1\n"]}]
            }]}"#,
        );

        assert_eq!(
            page,
            format!(
                "{FRONT_MATTER}```python\n# In [1]:\nx = 1\nprint(x)\n```\n\nOut [1]:\n```\n1\n\n```\n\n"
            )
        );
    }

    #[test]
    fn test_code_cell_without_outputs_keeps_label() {
        let page = render_default(
            r#"{"cells": [{"cell_type": "code", "execution_count": 7, "source": "pass", "outputs": []}]}"#,
        );

        assert_eq!(
            page,
            format!("{FRONT_MATTER}```python\n# In [7]:\npass\n```\n\nOut [7]:\n\n")
        );
    }

    #[test]
    fn test_missing_execution_count_renders_empty_placeholder() {
        let page = render_default(
            r#"{"cells": [{"cell_type": "code", "execution_count": null, "source": "x", "outputs": []}]}"#,
        );

        assert!(page.contains("# In []:\nx"));
        assert!(page.contains("Out []:\n"));
    }

    #[test]
    fn test_display_data_renders_only_images() {
        let page = render_default(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 2,
                "source": "plot()",
                "outputs": [{"output_type": "display_data", "metadata": {},
                             "data": {"image/png": "AAAA", "text/plain": "x"}}]
            }]}"#,
        );

        assert_eq!(page.matches("<img").count(), 1);
        assert!(page.contains("<p><img src=\"data:image/png;base64,AAAA\"></p>\n"));
        assert!(!page.contains("```\nx\n```"));
    }

    #[test]
    fn test_display_data_joins_image_fragments() {
        let page = render_default(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 2,
                "source": "plot()",
                "outputs": [{"output_type": "display_data",
                             "data": {"image/jpeg": ["AA\n", "BB\n"], "image/gif": "CC"}}]
            }]}"#,
        );

        assert!(page.contains("data:image/jpeg;base64,AABB\""));
        assert!(page.contains("data:image/gif;base64,CC\""));
    }

    #[test]
    fn test_execute_result_prefers_html() {
        let page = render_default(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 3,
                "source": "df",
                "outputs": [{"output_type": "execute_result", "execution_count": 3, "metadata": {},
                             "data": {"text/plain": ["   a\n0  1"], "text/html": ["<table></table>"]}}]
            }]}"#,
        );

        assert!(page.ends_with("Out [3]:\n<p><table></table></p>\n\n"));
        assert!(!page.contains("   a\n0  1"));
    }

    #[test]
    fn test_execute_result_plain_text() {
        let page = render_default(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 4,
                "source": "1 + 1",
                "outputs": [{"output_type": "execute_result", "data": {"text/plain": "2"}}]
            }]}"#,
        );

        assert!(page.ends_with("Out [4]:\n```\n2\n```\n\n"));
    }

    #[test]
    fn test_execute_result_without_known_mime_renders_nothing() {
        let page = render_default(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 5,
                "source": "obj",
                "outputs": [{"output_type": "execute_result", "data": {"application/json": {"a": 1}}}]
            }]}"#,
        );

        assert!(page.ends_with("Out [5]:\n\n"));
    }

    #[test]
    fn test_unknown_kinds_render_only_separator() {
        let page = render_default(
            r#"{"cells": [
                {"cell_type": "raw", "source": "raw"},
                {"cell_type": "code", "execution_count": 1, "source": "1/0",
                 "outputs": [{"output_type": "error", "ename": "ZeroDivisionError"}]}
            ]}"#,
        );

        assert_eq!(
            page,
            format!("{FRONT_MATTER}\n```python\n# In [1]:\n1/0\n```\n\nOut [1]:\n\n")
        );
    }

    #[test]
    fn test_fence_is_lengthened_for_backticks_in_content() {
        let page = render_default(
            r#"{"cells": [{"cell_type": "code", "execution_count": 1,
                "source": "s = \"```\"", "outputs": []}]}"#,
        );

        assert!(page.contains("````python\n# In [1]:\ns = \"```\"\n````\n"));
    }

    #[test]
    fn test_liquid_fences() {
        let options = RenderOptions {
            fence: FenceStyle::Liquid,
            ..RenderOptions::default()
        };
        let nb = notebook(
            r#"{"cells": [{
                "cell_type": "code",
                "execution_count": 1,
                "source": "print(1)",
                "outputs": [{"output_type": "stream", "text": "1"}]
            }]}"#,
        );

        assert_eq!(
            render(&nb, "Intro", &options),
            format!(
                "{FRONT_MATTER}{{% highlight python %}}\n# In [1]:\nprint(1)\n{{% endhighlight %}}\n\nOut [1]:\n{{% highlight text %}}\n1\n{{% endhighlight %}}\n\n"
            )
        );
    }

    #[test]
    fn test_title_is_quoted_when_needed() {
        let nb = notebook(r#"{"cells": []}"#);
        let page = render(&nb, "Part 1: Basics", &RenderOptions::default());

        assert!(page.contains("title: 'Part 1: Basics'\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let nb = notebook(
            r#"{"cells": [
                {"cell_type": "markdown", "source": "text"},
                {"cell_type": "code", "execution_count": 1, "source": "x",
                 "outputs": [{"output_type": "display_data", "data": {"image/png": "AA", "image/svg+xml": "BB"}}]}
            ]}"#,
        );
        let options = RenderOptions::default();

        assert_eq!(
            render(&nb, "Intro", &options),
            render(&nb, "Intro", &options)
        );
    }

    #[test]
    fn test_lang_does_not_change_output() {
        let nb = notebook(
            r#"{"cells": [{"cell_type": "code", "execution_count": 1, "source": "x", "outputs": []}]}"#,
        );
        let en = RenderOptions {
            lang: "en".to_owned(),
            ..RenderOptions::default()
        };

        assert_eq!(
            render(&nb, "Intro", &en),
            render(&nb, "Intro", &RenderOptions::default())
        );
    }

    #[test]
    fn test_longest_backtick_run() {
        assert_eq!(longest_backtick_run("no ticks"), 0);
        assert_eq!(longest_backtick_run("a `b` c"), 1);
        assert_eq!(longest_backtick_run("```\n````"), 4);
    }
}
