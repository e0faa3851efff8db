//! Import-like directives as plain data.
//!
//! Rules never see a syntax tree. A [`DirectiveExtractor`] turns a source file
//! into [`ImportDirective`] records and rules work on those alone.

use crate::types::Span;

/// Kind of directive that references another file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `import '...';`
    Import,
    /// `export '...';`
    Export,
    /// `part '...';`
    Part,
}

impl DirectiveKind {
    /// Source keyword of this directive.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
            Self::Part => "part",
        }
    }
}

impl std::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single directive with the spans needed for diagnostics and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    /// Directive kind.
    pub kind: DirectiveKind,
    /// Referenced URI, or `None` when it cannot be resolved statically.
    pub uri: Option<String>,
    /// Span of the quoted URI literal, quotes included.
    pub uri_span: Span,
    /// Span of the whole statement, keyword through `;`.
    pub statement_span: Span,
    /// Line of the URI literal (1-indexed).
    pub line: usize,
    /// Column of the URI literal (1-indexed).
    pub column: usize,
}

impl ImportDirective {
    /// Creates an `import` directive.
    #[must_use]
    pub fn import(uri: impl Into<String>, uri_span: Span, statement_span: Span) -> Self {
        Self {
            kind: DirectiveKind::Import,
            uri: Some(uri.into()),
            uri_span,
            statement_span,
            line: 1,
            column: 1,
        }
    }

    /// Sets the line/column position.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// True for `import` and `export`; a `part` belongs to its library.
    #[must_use]
    pub fn is_dependency(&self) -> bool {
        matches!(self.kind, DirectiveKind::Import | DirectiveKind::Export)
    }

    /// Non-empty URI, if resolvable.
    #[must_use]
    pub fn resolved_uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|u| !u.is_empty())
    }
}

/// Language-specific extraction of directives from source text.
pub trait DirectiveExtractor: Send + Sync {
    /// Language identifier (e.g., `"dart"`).
    fn language_id(&self) -> &'static str;

    /// File extensions handled, with leading dot (e.g., `&[".dart"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// File marking the root of a project in this language, if any.
    ///
    /// Current-file identity is classified relative to the nearest ancestor
    /// holding it, so analyzing a subdirectory sees the same paths as
    /// analyzing the whole project.
    fn project_manifest(&self) -> Option<&'static str> {
        None
    }

    /// Extracts every import-like directive, in source order.
    fn extract(&self, source: &str) -> Vec<ImportDirective>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_uri_skips_empty_and_missing() {
        let d = ImportDirective::import("", Span::new(7, 2), Span::new(0, 10));
        assert_eq!(d.resolved_uri(), None);

        let mut d = ImportDirective::import("a.dart", Span::new(7, 8), Span::new(0, 16));
        assert_eq!(d.resolved_uri(), Some("a.dart"));
        d.uri = None;
        assert_eq!(d.resolved_uri(), None);
    }

    #[test]
    fn keyword_matches_kind() {
        assert_eq!(DirectiveKind::Export.to_string(), "export");
        assert_eq!(DirectiveKind::Part.keyword(), "part");
    }
}
