//! Rule to forbid importing another feature's internal layers.
//!
//! # Rationale
//!
//! A feature's `data/`, `domain/`, `ui/`, ... directories are private. Code
//! outside the feature should only depend on the feature's barrel file
//! (`feature_auth/auth.dart`), which is the feature's stable public surface.
//!
//! # Detected Patterns
//!
//! ```dart
//! // lib/feature_billing/ui/invoice_page.dart
//! import 'package:myapp/feature_auth/domain/session.dart'; // flagged
//! ```
//!
//! # Allowed Patterns
//!
//! - imports of the barrel file (`package:myapp/feature_auth/auth.dart`)
//! - internal imports within the same feature
//! - any import from a test file (unless `allow_in_tests = false`)
//!
//! # Fix
//!
//! [`ReplaceWithBarrelImport`] rewrites the URI to the barrel file, keeping
//! the caller's `package:` or relative addressing.
//!
//! # Configuration
//!
//! - `allow_in_tests`: skip test files (default: true)
//! - `layers`: internal layer directory names

use feature_lint_core::classify::{self, DEFAULT_INTERNAL_LAYERS};
use feature_lint_core::{
    FileContext, ImportDirective, ImportFix, ImportRule, Replacement, Severity, Violation,
};
use tracing::debug;

/// Rule code for no-internal-cross-feature-import.
pub const CODE: &str = "FL001";

/// Rule name for no-internal-cross-feature-import.
pub const NAME: &str = "no-internal-cross-feature-import";

/// Fix id for the barrel rewrite.
pub const FIX_ID: &str = "replace-with-barrel-import";

/// Forbids importing another feature's internals.
#[derive(Debug, Clone)]
pub struct NoInternalCrossFeatureImport {
    /// Whether test files are exempt.
    pub allow_in_tests: bool,
    /// Directory names treated as feature-private.
    pub layers: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoInternalCrossFeatureImport {
    fn default() -> Self {
        Self::new()
    }
}

impl NoInternalCrossFeatureImport {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_in_tests: true,
            layers: DEFAULT_INTERNAL_LAYERS.iter().map(|l| (*l).to_string()).collect(),
            severity: Severity::Error,
        }
    }

    /// Sets whether test files are exempt.
    #[must_use]
    pub fn allow_in_tests(mut self, allow: bool) -> Self {
        self.allow_in_tests = allow;
        self
    }

    /// Replaces the internal layer names.
    #[must_use]
    pub fn layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl ImportRule for NoInternalCrossFeatureImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids importing another feature's internal layers; use its barrel file"
    }

    fn message_template(&self) -> &'static str {
        "Import of '{0}' internals from outside the feature. Import the barrel file '{1}' instead."
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, ctx: &FileContext, directive: &ImportDirective) -> Option<Violation> {
        if !directive.is_dependency() || (self.allow_in_tests && ctx.is_test) {
            return None;
        }

        let uri = directive.resolved_uri()?;
        let imported = classify::classify(uri)?;

        if ctx
            .feature
            .as_ref()
            .is_some_and(|current| current.feature_dir == imported.feature_dir)
        {
            return None;
        }

        if !classify::is_internal_layer_in(uri, &self.layers) {
            return None;
        }

        debug!("{} reaches into {}", ctx.classified_path, imported.feature_dir);
        let barrel = imported.barrel_path();
        Some(self.violation(ctx, directive, [imported.feature_dir, barrel]))
    }
}

/// Rewrites an internal import to the feature's barrel file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceWithBarrelImport;

impl ImportFix for ReplaceWithBarrelImport {
    fn id(&self) -> &'static str {
        FIX_ID
    }

    fn rule_code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Replace with barrel import"
    }

    fn compute(&self, ctx: &FileContext, directive: &ImportDirective) -> Option<Replacement> {
        let uri = directive.resolved_uri()?;
        let target = classify::barrel_target(uri)?;
        let literal = ctx.text(directive.uri_span)?;
        let quote = literal
            .chars()
            .next()
            .filter(|c| matches!(c, '\'' | '"'))
            .unwrap_or('\'');

        Some(Replacement::new(
            ctx.uri_location(directive),
            format!("{quote}{}{quote}", target.barrel_uri()),
        ))
    }
}
