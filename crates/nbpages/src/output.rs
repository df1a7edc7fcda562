//! Colored progress output on stderr.

use std::path::Path;

use console::{Style, Term};

/// Progress reporter for a build run.
pub(crate) struct Output {
    term: Term,
    step: Style,
    dim: Style,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            step: Style::new().cyan().bold(),
            dim: Style::new().dim(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }

    /// Announce a phase of the run, e.g. "Creating navigation file".
    pub(crate) fn step(&self, msg: &str) {
        self.line(&self.step, &format!("{msg} ..."));
    }

    /// Report one notebook rendered to a page.
    pub(crate) fn rendered(&self, notebook: &Path, page: &Path) {
        let name = |path: &Path| {
            path.file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
        };
        self.line(
            &self.dim,
            &format!("  {} -> {}", name(notebook), name(page)),
        );
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.done, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.fail, msg);
    }

    fn line(&self, style: &Style, msg: &str) {
        // Nothing useful to do if stderr is gone.
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
