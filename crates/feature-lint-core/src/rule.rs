//! Rule and fix traits.

use crate::context::FileContext;
use crate::directive::ImportDirective;
use crate::types::{Replacement, Severity, Violation};

/// A boundary rule evaluated once per directive.
///
/// Rules are pure: they hold no mutable state, and the outcome for one
/// directive never depends on another, so they may run in any order.
///
/// # Example
///
/// ```ignore
/// use feature_lint_core::{FileContext, ImportDirective, ImportRule, Violation};
///
/// pub struct NoDartMirrors;
///
/// impl ImportRule for NoDartMirrors {
///     fn name(&self) -> &'static str { "no-dart-mirrors" }
///     fn code(&self) -> &'static str { "FL100" }
///     fn message_template(&self) -> &'static str { "'{0}' is not available in Flutter" }
///
///     fn evaluate(&self, ctx: &FileContext, d: &ImportDirective) -> Option<Violation> {
///         let uri = d.resolved_uri()?;
///         (uri == "dart:mirrors").then(|| self.violation(ctx, d, [uri]))
///     }
/// }
/// ```
pub trait ImportRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "FL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Message with positional slots `{0}`, `{1}`, ...
    fn message_template(&self) -> &'static str;

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Evaluates a single directive of the current file.
    fn evaluate(&self, ctx: &FileContext, directive: &ImportDirective) -> Option<Violation>;

    /// Builds a violation at the directive's URI from template arguments.
    fn violation<I, S>(&self, ctx: &FileContext, directive: &ImportDirective, args: I) -> Violation
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let arguments: Vec<String> = args.into_iter().map(Into::into).collect();
        Violation::new(
            self.code(),
            self.name(),
            self.default_severity(),
            ctx.uri_location(directive),
            format_message(self.message_template(), &arguments),
        )
        .with_arguments(arguments)
    }
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn ImportRule>;

/// A quick fix attached to a rule.
pub trait ImportFix: Send + Sync {
    /// Stable identifier (e.g., "replace-with-barrel-import").
    fn id(&self) -> &'static str;

    /// Code of the rule this fix resolves.
    fn rule_code(&self) -> &'static str;

    /// Human-readable action name.
    fn title(&self) -> &'static str;

    /// Computes the edit for a directive the rule flagged.
    ///
    /// Returns `None` when no correct rewrite exists for this directive.
    fn compute(&self, ctx: &FileContext, directive: &ImportDirective) -> Option<Replacement>;
}

/// Type alias for boxed fix trait objects.
pub type FixBox = Box<dyn ImportFix>;

/// Fills `{0}`, `{1}`, ... in `template` with `args`.
///
/// Slots without a matching argument are left untouched.
#[must_use]
pub fn format_message<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match slot {
            Some((arg, close)) => {
                message.push_str(arg.as_ref());
                rest = &after[close + 1..];
            }
            None => {
                message.push('{');
                rest = after;
            }
        }
    }
    message.push_str(rest);
    message
}
