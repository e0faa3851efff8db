//! Rule to keep `core/` free of feature dependencies.
//!
//! # Rationale
//!
//! Core modules are shared by every feature. A core file that imports a
//! feature creates a cycle in the dependency graph and couples all features to
//! that one.
//!
//! # Detected Patterns
//!
//! ```dart
//! // lib/core/network/client.dart
//! import 'package:myapp/feature_auth/auth.dart'; // flagged, even the barrel
//! ```
//!
//! The check is deliberately loose: any URI mentioning `feature_` or
//! `features/` is reported, even when no feature name can be extracted.
//!
//! # Fix
//!
//! There is no mechanical rewrite that removes the dependency.
//! [`CommentOutFeatureImport`] disables the import and leaves a marker so the
//! dependency gets moved out of core by hand.

use feature_lint_core::classify;
use feature_lint_core::{
    FileContext, ImportDirective, ImportFix, ImportRule, Replacement, Severity, Violation,
};

/// Rule code for core-independence.
pub const CODE: &str = "FL002";

/// Rule name for core-independence.
pub const NAME: &str = "core-independence";

/// Fix id for commenting out the import.
pub const FIX_ID: &str = "comment-out-feature-import";

/// Marker line inserted above a disabled import.
pub const DISABLED_MARKER: &str =
    "// FIXME(core-independence): core must not depend on features. Move this dependency out of core.";

/// Argument used when the URI mentions a feature but none can be extracted.
const UNNAMED_FEATURE: &str = "feature";

/// Forbids `core/` files from importing any feature.
#[derive(Debug, Clone)]
pub struct CoreIndependence {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for CoreIndependence {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreIndependence {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl ImportRule for CoreIndependence {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids core modules from depending on any feature"
    }

    fn message_template(&self) -> &'static str {
        "Core modules must not depend on feature '{0}'."
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, ctx: &FileContext, directive: &ImportDirective) -> Option<Violation> {
        if !ctx.is_core || !directive.is_dependency() {
            return None;
        }

        let uri = directive.resolved_uri()?;
        if !classify::contains_feature_pattern(uri) {
            return None;
        }

        let feature = classify::classify(uri)
            .map_or_else(|| UNNAMED_FEATURE.to_string(), |f| f.feature_dir);

        let mut violation = self.violation(ctx, directive, [feature]);
        violation.location = ctx.statement_location(directive);
        Some(violation)
    }
}

/// Comments out a feature import inside core, with a marker line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentOutFeatureImport;

impl ImportFix for CommentOutFeatureImport {
    fn id(&self) -> &'static str {
        FIX_ID
    }

    fn rule_code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Comment out feature import"
    }

    fn compute(&self, ctx: &FileContext, directive: &ImportDirective) -> Option<Replacement> {
        directive.resolved_uri()?;
        let statement = ctx.text(directive.statement_span)?;

        let mut new_text = String::from(DISABLED_MARKER);
        for line in statement.lines() {
            new_text.push_str("\n// ");
            new_text.push_str(line);
        }

        Some(Replacement::new(ctx.statement_location(directive), new_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_lint_core::{apply_replacements, DirectiveKind, Span};
    use std::path::Path;

    fn import_line(uri: &str) -> (String, ImportDirective) {
        let content = format!("import '{uri}';\n");
        let directive = ImportDirective::import(
            uri,
            Span::new(7, uri.len() + 2),
            Span::new(0, uri.len() + 10),
        )
        .at(1, 8);
        (content, directive)
    }

    fn check(current: &str, uri: &str) -> Option<Violation> {
        let (content, directive) = import_line(uri);
        let ctx = FileContext::new(Path::new(current), &content, Path::new("."));
        CoreIndependence::new().evaluate(&ctx, &directive)
    }

    #[test]
    fn flags_feature_import_from_core() {
        let v = check(
            "lib/core/network/client.dart",
            "package:myapp/feature_auth/auth.dart",
        )
        .unwrap();
        assert_eq!(v.code, CODE);
        assert_eq!(v.arguments, vec!["feature_auth"]);
        assert_eq!(v.message, "Core modules must not depend on feature 'feature_auth'.");
        assert_eq!(v.location.span(), Span::new(0, 46));
        assert_eq!((v.location.line, v.location.column), (1, 1));
    }

    #[test]
    fn slash_style_argument() {
        let v = check("lib/core/a.dart", "../features/profile/profile.dart").unwrap();
        assert_eq!(v.arguments, vec!["features/profile"]);
    }

    #[test]
    fn unnamed_feature_falls_back() {
        let v = check("lib/core/a.dart", "package:myapp/my_feature_flags/flags.dart").unwrap();
        assert_eq!(v.arguments, vec!["feature"]);
        assert_eq!(v.message, "Core modules must not depend on feature 'feature'.");
    }

    #[test]
    fn reports_iff_core_and_feature_mention() {
        let cases = [
            ("lib/core/a.dart", "package:myapp/feature_auth/auth.dart", true),
            ("lib/core/a.dart", "package:myapp/shared/util.dart", false),
            ("lib/feature_auth/a.dart", "package:myapp/feature_cart/cart.dart", false),
            ("lib/main.dart", "package:myapp/feature_cart/cart.dart", false),
            ("packages/core/lib/x.dart", "features/a/b.dart", true),
        ];
        for (current, uri, expected) in cases {
            assert_eq!(check(current, uri).is_some(), expected, "{current} -> {uri}");
        }
    }

    #[test]
    fn part_and_unresolved_directives_are_skipped() {
        let (content, mut directive) = import_line("feature_auth/auth.dart");
        let ctx = FileContext::new(Path::new("lib/core/a.dart"), &content, Path::new("."));
        directive.kind = DirectiveKind::Part;
        assert!(CoreIndependence::new().evaluate(&ctx, &directive).is_none());

        directive.kind = DirectiveKind::Export;
        assert!(CoreIndependence::new().evaluate(&ctx, &directive).is_some());

        directive.uri = None;
        assert!(CoreIndependence::new().evaluate(&ctx, &directive).is_none());
        assert!(CommentOutFeatureImport.compute(&ctx, &directive).is_none());
    }

    #[test]
    fn fix_comments_out_statement() {
        let uri = "package:myapp/feature_auth/auth.dart";
        let (content, directive) = import_line(uri);
        let ctx = FileContext::new(Path::new("lib/core/a.dart"), &content, Path::new("."));
        let r = CommentOutFeatureImport.compute(&ctx, &directive).unwrap();

        let mut lines = r.new_text.lines();
        assert_eq!(lines.next(), Some(DISABLED_MARKER));
        assert_eq!(lines.next(), Some(format!("// import '{uri}';").as_str()));
        assert_eq!(lines.next(), None);

        let fixed = apply_replacements(&content, &[r]).unwrap();
        assert!(fixed.ends_with(&format!("// import '{uri}';\n")));
        assert!(!fixed.lines().any(|l| l.starts_with("import")));
    }

    #[test]
    fn fix_comments_every_line_of_multiline_statement() {
        let content = "import 'package:a/feature_x/x.dart'\n    show X;\n";
        let directive = ImportDirective::import(
            "package:a/feature_x/x.dart",
            Span::new(7, 28),
            Span::new(0, 47),
        );
        let ctx = FileContext::new(Path::new("lib/core/a.dart"), content, Path::new("."));
        let r = CommentOutFeatureImport.compute(&ctx, &directive).unwrap();
        assert_eq!(
            r.new_text,
            format!("{DISABLED_MARKER}\n// import 'package:a/feature_x/x.dart'\n//     show X;")
        );
    }
}
