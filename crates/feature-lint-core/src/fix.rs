//! Applying fix replacements to file contents.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::types::{Replacement, Span};

/// Errors raised while applying edits.
#[derive(Debug, Error)]
pub enum FixError {
    /// An edit points outside the file or splits a UTF-8 character.
    #[error("edit {start}..{end} is out of range for {len} bytes")]
    OutOfRange {
        /// Start offset.
        start: usize,
        /// End offset.
        end: usize,
        /// File length.
        len: usize,
    },

    /// Two edits touch the same bytes.
    #[error("edits {first:?} and {second:?} overlap")]
    Overlap {
        /// Earlier span.
        first: Span,
        /// Later span.
        second: Span,
    },

    /// Reading or writing the file failed.
    #[error("failed to rewrite {path}: {source}")]
    Io {
        /// File being rewritten.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Applies every replacement to `content`, all or nothing.
///
/// Edits may be given in any order. Identical duplicates are applied once.
///
/// # Errors
///
/// Returns [`FixError`] if any span is out of range or two spans overlap; no
/// edit is applied in that case.
pub fn apply_replacements(content: &str, replacements: &[Replacement]) -> Result<String, FixError> {
    let mut edits: Vec<&Replacement> = replacements.iter().collect();
    edits.sort_by_key(|r| (r.span().start, r.span().length));
    edits.dedup_by(|a, b| a.span() == b.span() && a.new_text == b.new_text);

    for edit in &edits {
        let span = edit.span();
        if span.slice(content).is_none() {
            return Err(FixError::OutOfRange {
                start: span.start,
                end: span.end(),
                len: content.len(),
            });
        }
    }
    for pair in edits.windows(2) {
        let (first, second) = (pair[0].span(), pair[1].span());
        if second.start < first.end() {
            return Err(FixError::Overlap { first, second });
        }
    }

    let mut output = content.to_string();
    for edit in edits.iter().rev() {
        let span = edit.span();
        output.replace_range(span.start..span.end(), &edit.new_text);
    }
    Ok(output)
}

/// Rewrites `path` in place with the given replacements.
///
/// Returns the number of edits applied.
///
/// # Errors
///
/// Returns [`FixError`] on IO failure or invalid edits; the file is left
/// untouched when an edit is invalid.
pub fn apply_to_file(path: &Path, replacements: &[Replacement]) -> Result<usize, FixError> {
    let io_err = |source| FixError::Io {
        path: path.to_path_buf(),
        source,
    };
    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let fixed = apply_replacements(&content, replacements)?;
    if fixed == content {
        debug!("No changes for {}", path.display());
        return Ok(0);
    }
    std::fs::write(path, fixed).map_err(io_err)?;
    info!("Applied {} fix(es) to {}", replacements.len(), path.display());
    Ok(replacements.len())
}
