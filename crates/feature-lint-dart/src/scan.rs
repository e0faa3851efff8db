//! Lexical helpers for Dart source: comment masking and string literal bounds.
//!
//! Everything here works on bytes and never changes offsets, so spans found in
//! the masked text are valid in the original source.

use std::ops::Range;

/// Source text with comments blanked out.
#[derive(Debug, Clone)]
pub struct Masked {
    /// Same length as the source; comment bytes replaced by spaces, newlines kept.
    pub text: String,
    /// Byte ranges of triple-quoted string literals.
    pub long_strings: Vec<Range<usize>>,
}

impl Masked {
    /// True if `offset` falls inside a triple-quoted string literal.
    #[must_use]
    pub fn in_long_string(&self, offset: usize) -> bool {
        self.long_strings.iter().any(|r| r.contains(&offset))
    }
}

/// Bounds of a string literal starting at a quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLiteral {
    /// Offset of the opening quote.
    pub start: usize,
    /// Offset just past the closing quote, or where scanning stopped.
    pub end: usize,
    /// Quote character (`'` or `"`).
    pub quote: u8,
    /// Whether the literal uses `'''` / `"""`.
    pub triple: bool,
    /// Whether the closing quote was found.
    pub terminated: bool,
}

impl StringLiteral {
    /// Range of the text between the quotes.
    #[must_use]
    pub fn content(&self) -> Range<usize> {
        let width = if self.triple { 3 } else { 1 };
        let close = if self.terminated { width } else { 0 };
        (self.start + width)..(self.end - close).max(self.start + width)
    }
}

/// Blanks out `//` and (nested) `/* */` comments, skipping string literals.
#[must_use]
pub fn mask_comments(source: &str) -> Masked {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut long_strings = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = bytes[i..]
                    .iter()
                    .position(|b| *b == b'\n')
                    .map_or(bytes.len(), |p| i + p);
                blank(&mut out, i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = block_comment_end(bytes, i);
                blank(&mut out, i..end);
                i = end;
            }
            b'\'' | b'"' => {
                let literal = string_literal(bytes, i, is_raw_prefix(bytes, i));
                if literal.triple {
                    long_strings.push(literal.start..literal.end);
                }
                i = literal.end;
            }
            _ => i += 1,
        }
    }

    // Only whole comments were blanked, and they start and end on ASCII bytes.
    let text = String::from_utf8(out).unwrap_or_else(|_| source.to_string());
    Masked { text, long_strings }
}

fn blank(out: &mut [u8], range: Range<usize>) {
    for b in &mut out[range] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

fn block_comment_end(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut j = start;
    while j < bytes.len() {
        if bytes[j] == b'/' && bytes.get(j + 1) == Some(&b'*') {
            depth += 1;
            j += 2;
        } else if bytes[j] == b'*' && bytes.get(j + 1) == Some(&b'/') {
            depth -= 1;
            j += 2;
            if depth == 0 {
                return j;
            }
        } else {
            j += 1;
        }
    }
    bytes.len()
}

/// True when the quote at `quote_at` is preceded by a standalone `r`.
#[must_use]
pub fn is_raw_prefix(bytes: &[u8], quote_at: usize) -> bool {
    quote_at > 0
        && bytes[quote_at - 1] == b'r'
        && (quote_at < 2 || !is_ident_byte(bytes[quote_at - 2]))
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Scans the string literal whose opening quote is at `start`.
#[must_use]
pub fn string_literal(bytes: &[u8], start: usize, raw: bool) -> StringLiteral {
    let quote = bytes[start];
    let triple = bytes.get(start + 1) == Some(&quote) && bytes.get(start + 2) == Some(&quote);
    let mut j = start + if triple { 3 } else { 1 };

    while j < bytes.len() {
        let b = bytes[j];
        if !raw && b == b'\\' {
            j += 2;
            continue;
        }
        if !raw && b == b'$' && bytes.get(j + 1) == Some(&b'{') {
            j = interpolation_end(bytes, j);
            continue;
        }
        if b == quote {
            if !triple {
                return StringLiteral { start, end: j + 1, quote, triple, terminated: true };
            }
            if bytes.get(j + 1) == Some(&quote) && bytes.get(j + 2) == Some(&quote) {
                return StringLiteral { start, end: j + 3, quote, triple, terminated: true };
            }
        }
        if b == b'\n' && !triple {
            return StringLiteral { start, end: j, quote, triple, terminated: false };
        }
        j += 1;
    }

    StringLiteral { start, end: bytes.len(), quote, triple, terminated: false }
}

fn interpolation_end(bytes: &[u8], start: usize) -> usize {
    let mut depth = 1usize;
    let mut k = start + 2;
    while k < bytes.len() {
        match bytes[k] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return k + 1;
                }
            }
            b'\'' | b'"' => {
                k = string_literal(bytes, k, is_raw_prefix(bytes, k)).end;
                continue;
            }
            _ => {}
        }
        k += 1;
    }
    bytes.len()
}

/// Maps byte offsets to 1-indexed line and column.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Indexes the line starts of `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-indexed line and column (in bytes) of `offset`.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|s| *s <= offset).max(1);
        (line, offset - self.starts[line - 1] + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_line_and_block_comments() {
        let src = "a // x\nb /* y\nz */ c";
        let masked = mask_comments(src);
        assert_eq!(masked.text, "a     \nb     \n     c");
        assert_eq!(masked.text.len(), src.len());
    }

    #[test]
    fn masks_nested_block_comments() {
        let src = "/* a /* b */ c */d";
        assert_eq!(mask_comments(src).text, "                 d");
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let src = "'http://x' \"/*\" r'\\' // gone";
        let masked = mask_comments(src);
        assert_eq!(masked.text, "'http://x' \"/*\" r'\\'        ");
    }

    #[test]
    fn masks_multibyte_comments_without_shifting() {
        let src = "// héllo wörld\nimport 'a.dart';";
        let masked = mask_comments(src);
        assert_eq!(masked.text.len(), src.len());
        assert!(masked.text.ends_with("\nimport 'a.dart';"));
    }

    #[test]
    fn records_triple_quoted_strings() {
        let src = "var s = '''\nimport 'x.dart';\n''';";
        let masked = mask_comments(src);
        assert_eq!(masked.long_strings, vec![8..32]);
        assert!(masked.in_long_string(12));
        assert!(!masked.in_long_string(33));
    }

    #[test]
    fn string_literal_handles_escapes_and_interpolation() {
        let src = br#"'it\'s ${a['k']} done' tail"#;
        let lit = string_literal(src, 0, false);
        assert!(lit.terminated);
        assert_eq!(&src[lit.content()], br#"it\'s ${a['k']} done"#);
    }

    #[test]
    fn unterminated_literal_stops_at_newline() {
        let src = b"'abc\nimport";
        let lit = string_literal(src, 0, false);
        assert!(!lit.terminated);
        assert_eq!(lit.end, 4);
        assert_eq!(lit.content(), 1..4);
    }

    #[test]
    fn line_index_positions() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(4), (2, 2));
        assert_eq!(index.line_col(6), (3, 1));
        assert_eq!(index.line_col(8), (4, 2));
    }
}
