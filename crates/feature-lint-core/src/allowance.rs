//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // feature-lint: allow(no-internal-cross-feature-import) reason="migration in progress"
//! import 'package:app/feature_auth/data/token_store.dart';
//! ```
//!
//! The directive applies to the line it is on (as a trailing comment) and to
//! the line directly below it. Rules may be named by name, by code, or `all`.

use std::collections::HashSet;

const MARKER: &str = "feature-lint:";

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names or codes that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, keys: &[&str]) -> bool {
        self.rules.contains("all") || keys.iter().any(|k| self.rules.contains(*k))
    }
}

/// Checks `line` (1-indexed) and the line above it for an allow directive
/// naming any of `rule_keys`.
#[must_use]
pub fn check_allow(content: &str, line: usize, rule_keys: &[&str]) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.covers(rule_keys) {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line holding a `//` comment.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let marker_at = line.find(MARKER)?;
    if !line[..marker_at].trim_end().ends_with("//") {
        return None;
    }

    let directive = line[marker_at + MARKER.len()..].trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .and_then(|r| r.trim().strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()))
        .filter(|r| !r.trim().is_empty());

    Some(AllowDirective { rules, reason })
}
