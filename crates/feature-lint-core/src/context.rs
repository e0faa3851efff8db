//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::classify::{self, FeatureIdentity};
use crate::directive::ImportDirective;
use crate::types::{Location, Span};

/// Context provided to import rules.
///
/// Holds the current file's identity, computed once per file and shared by
/// every rule evaluated against that file's directives.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the analyzed root, as reported.
    pub relative_path: PathBuf,
    /// Path relative to the project root with `/` separators, as handed to
    /// the classifier.
    pub classified_path: String,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Whether this file lives under a `core/` directory.
    pub is_core: bool,
    /// Feature this file belongs to, if any.
    pub feature: Option<FeatureIdentity>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context where the analyzed root is the project root.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        Self::within(path, content, root, root)
    }

    /// Creates a file context for a file under `root`, itself somewhere
    /// inside `project_root`.
    #[must_use]
    pub fn within(path: &'a Path, content: &'a str, root: &Path, project_root: &Path) -> Self {
        let relative_path = relative_to(path, root);
        let classified_path = relative_to(path, project_root)
            .to_string_lossy()
            .replace('\\', "/");

        Self {
            path,
            content,
            is_test: classify::is_test_file(&classified_path),
            is_core: classify::is_core_module(&classified_path),
            feature: classify::classify(&classified_path),
            relative_path,
            classified_path,
        }
    }

    /// Location of a directive's URI literal.
    #[must_use]
    pub fn uri_location(&self, directive: &ImportDirective) -> Location {
        Location::new(self.relative_path.clone(), directive.line, directive.column)
            .with_span(directive.uri_span)
    }

    /// Location of a whole directive statement.
    #[must_use]
    pub fn statement_location(&self, directive: &ImportDirective) -> Location {
        let (line, column) = self.line_col(directive.statement_span.start);
        Location::new(self.relative_path.clone(), line, column)
            .with_span(directive.statement_span)
    }

    /// Text covered by `span`, if it lies within the file.
    #[must_use]
    pub fn text(&self, span: Span) -> Option<&'a str> {
        span.slice(self.content)
    }

    /// 1-indexed line and column of a byte offset.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let before = &self.content.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);
        (line, offset - line_start + 1)
    }

    /// 1-indexed line of a byte offset.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_col(offset).0
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
