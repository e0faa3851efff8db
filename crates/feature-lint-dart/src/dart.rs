//! Dart directive extractor.
//!
//! Recognizes top-level `import`, `export` and `part` directives. Comments are
//! masked first, so commented-out directives are ignored and spans stay valid
//! in the original text.

use feature_lint_core::{DirectiveExtractor, DirectiveKind, ImportDirective, Span};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::scan::{self, LineIndex, Masked};

static DIRECTIVE_KEYWORD: Lazy<Regex> = Lazy::new(directive_keyword);

#[allow(clippy::expect_used)] // literal pattern
fn directive_keyword() -> Regex {
    Regex::new(r"(?m)^[ \t]*(import|export|part)\b").expect("directive pattern must compile")
}

/// Extracts import-like directives from Dart source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DartExtractor;

impl DartExtractor {
    /// Creates a new Dart extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveExtractor for DartExtractor {
    fn language_id(&self) -> &'static str {
        "dart"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".dart"]
    }

    fn project_manifest(&self) -> Option<&'static str> {
        Some("pubspec.yaml")
    }

    fn extract(&self, source: &str) -> Vec<ImportDirective> {
        let masked = scan::mask_comments(source);
        let lines = LineIndex::new(source);

        let directives: Vec<_> = DIRECTIVE_KEYWORD
            .captures_iter(&masked.text)
            .filter_map(|caps| caps.get(1))
            .filter(|keyword| !masked.in_long_string(keyword.start()))
            .filter_map(|keyword| {
                let kind = match keyword.as_str() {
                    "import" => DirectiveKind::Import,
                    "export" => DirectiveKind::Export,
                    _ => DirectiveKind::Part,
                };
                directive_at(source, &masked, &lines, kind, keyword.start(), keyword.end())
            })
            .collect();

        trace!("extracted {} directives", directives.len());
        directives
    }
}

/// Parses the directive whose keyword spans `start..after_keyword`.
fn directive_at(
    source: &str,
    masked: &Masked,
    lines: &LineIndex,
    kind: DirectiveKind,
    start: usize,
    after_keyword: usize,
) -> Option<ImportDirective> {
    let bytes = masked.text.as_bytes();
    let mut pos = skip_whitespace(bytes, after_keyword);

    if kind == DirectiveKind::Part && is_word_at(bytes, pos, "of") {
        return None;
    }

    let raw = bytes.get(pos) == Some(&b'r');
    if raw {
        pos += 1;
    }
    if !matches!(bytes.get(pos), Some(b'\'' | b'"')) {
        return None;
    }

    let literal = scan::string_literal(bytes, pos, raw);
    if !literal.terminated {
        return None;
    }

    let content = source.get(literal.content())?;
    let uri = (raw || !content.contains('$')).then(|| content.to_string());
    let end = statement_end(bytes, literal.end);
    let (line, column) = lines.line_col(literal.start);

    Some(ImportDirective {
        kind,
        uri,
        uri_span: Span::new(literal.start, literal.end - literal.start),
        statement_span: Span::new(start, end - start),
        line,
        column,
    })
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

fn is_word_at(bytes: &[u8], pos: usize, word: &str) -> bool {
    bytes[pos..].starts_with(word.as_bytes())
        && !bytes
            .get(pos + word.len())
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

/// Offset just past the `;` ending the statement, skipping string literals in
/// conditional imports. Falls back to `from` when no `;` follows.
fn statement_end(bytes: &[u8], from: usize) -> usize {
    let mut k = from;
    while k < bytes.len() {
        match bytes[k] {
            b';' => return k + 1,
            b'\'' | b'"' => {
                k = scan::string_literal(bytes, k, scan::is_raw_prefix(bytes, k)).end;
                continue;
            }
            _ => {}
        }
        k += 1;
    }
    from
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(src: &str) -> Vec<ImportDirective> {
        DartExtractor::new().extract(src)
    }

    fn slice(src: &str, span: Span) -> &str {
        span.slice(src).unwrap()
    }

    #[test]
    fn extracts_import_export_part() {
        let src = "\
library app;

import 'package:flutter/material.dart';
export \"src/api.dart\";
part 'app.g.dart';
";
        let found = extract(src);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].kind, DirectiveKind::Import);
        assert_eq!(found[0].uri.as_deref(), Some("package:flutter/material.dart"));
        assert_eq!(found[1].kind, DirectiveKind::Export);
        assert_eq!(found[1].uri.as_deref(), Some("src/api.dart"));
        assert_eq!(found[2].kind, DirectiveKind::Part);
    }

    #[test]
    fn spans_cover_literal_and_statement() {
        let src = "// header\n  import 'a/b.dart' as b;\n";
        let d = &extract(src)[0];
        assert_eq!(slice(src, d.uri_span), "'a/b.dart'");
        assert_eq!(slice(src, d.statement_span), "import 'a/b.dart' as b;");
        assert_eq!((d.line, d.column), (2, 10));
    }

    #[test]
    fn skips_part_of() {
        assert!(extract("part of 'lib.dart';\npart of my.lib;\n").is_empty());
        assert_eq!(extract("part 'offline.dart';\n").len(), 1);
    }

    #[test]
    fn ignores_commented_directives() {
        let src = "\
// import 'package:a/feature_x/data/x.dart';
/* import 'package:a/feature_y/data/y.dart';
   /* nested */ import 'package:a/feature_z/data/z.dart'; */
/// import 'doc.dart';
import 'real.dart'; // import 'trailing.dart';
";
        let found = extract(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uri.as_deref(), Some("real.dart"));
        assert_eq!(found[0].line, 5);
    }

    #[test]
    fn ignores_directives_inside_multiline_strings() {
        let src = "const sample = '''\nimport 'package:a/feature_x/data/x.dart';\n''';\n";
        assert!(extract(src).is_empty());
    }

    #[test]
    fn conditional_import_uses_first_uri() {
        let src = "import 'stub.dart'\n    if (dart.library.io) 'io.dart'\n    if (dart.library.html) 'web.dart';\n";
        let d = &extract(src)[0];
        assert_eq!(d.uri.as_deref(), Some("stub.dart"));
        assert_eq!(slice(src, d.statement_span), src.trim_end());
    }

    #[test]
    fn multiline_show_clause() {
        let src = "import 'package:a/feature_x/ui/w.dart'\n    show A, B;\nvoid main() {}\n";
        let d = &extract(src)[0];
        assert_eq!(
            slice(src, d.statement_span),
            "import 'package:a/feature_x/ui/w.dart'\n    show A, B;"
        );
    }

    #[test]
    fn interpolated_uri_is_unresolvable() {
        let d = &extract("import 'package:a/$name.dart';\n")[0];
        assert_eq!(d.uri, None);
        assert_eq!(d.resolved_uri(), None);

        let d = &extract("import r'package:a/$name.dart';\n")[0];
        assert_eq!(d.uri.as_deref(), Some("package:a/$name.dart"));
        assert_eq!(slice("import r'package:a/$name.dart';\n", d.uri_span), "'package:a/$name.dart'");
    }

    #[test]
    fn empty_uri_is_kept_but_unresolved() {
        let d = &extract("import '';\n")[0];
        assert_eq!(d.uri.as_deref(), Some(""));
        assert_eq!(d.resolved_uri(), None);
    }

    #[test]
    fn ignores_identifiers_and_non_directives() {
        let src = "importer();\nexported = 1;\nimport_x();\nvoid f() { import; }\n";
        assert!(extract(src).is_empty());
    }

    #[test]
    fn unterminated_literal_is_skipped() {
        assert_eq!(extract("import 'broken\nimport 'ok.dart';\n").len(), 1);
    }

    #[test]
    fn offsets_survive_multibyte_text() {
        let src = "// Ünïcödé ✓\nimport 'package:a/feature_x/data/x.dart';\n";
        let d = &extract(src)[0];
        assert_eq!(slice(src, d.uri_span), "'package:a/feature_x/data/x.dart'");
        assert_eq!(d.line, 2);
    }
}
