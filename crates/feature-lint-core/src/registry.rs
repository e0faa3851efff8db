//! Registration table mapping rules to their fixes.
//!
//! The table is assembled once through [`RegistryBuilder`] and is read-only
//! afterwards. Malformed registrations are rejected by
//! [`RegistryBuilder::build`] instead of being dropped.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::rule::{FixBox, ImportFix, ImportRule, RuleBox};

/// Errors detected while assembling a [`Registry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A rule was registered without a code or name.
    #[error("rule #{index} is missing its identity (code: {code:?}, name: {name:?})")]
    MissingIdentity {
        /// Registration order of the rule.
        index: usize,
        /// Code as given.
        code: String,
        /// Name as given.
        name: String,
    },

    /// Two rules share a code or a name.
    #[error("duplicate rule identifier '{0}'")]
    DuplicateRule(String),

    /// A fix was registered without an id.
    #[error("fix for rule '{rule}' is missing its id")]
    MissingFixId {
        /// Rule code the fix targets.
        rule: String,
    },

    /// A fix targets a rule that is not registered.
    #[error("fix '{fix}' targets unknown rule '{rule}'")]
    UnknownRule {
        /// Fix id.
        fix: String,
        /// Rule code the fix targets.
        rule: String,
    },

    /// The same fix id was registered twice for one rule.
    #[error("fix '{fix}' registered twice for rule '{rule}'")]
    DuplicateFix {
        /// Fix id.
        fix: String,
        /// Rule code.
        rule: String,
    },
}

/// A registered rule together with its fixes.
pub struct RuleEntry {
    /// The rule.
    pub rule: RuleBox,
    /// Fixes in registration order.
    pub fixes: Vec<FixBox>,
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("rule", &self.rule.code())
            .field("fixes", &self.fixes.iter().map(|x| x.id()).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    rules: Vec<RuleBox>,
    fixes: Vec<FixBox>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    #[must_use]
    pub fn rule<R: ImportRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Registers a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers a fix for the rule named by [`ImportFix::rule_code`].
    #[must_use]
    pub fn fix<F: ImportFix + 'static>(mut self, fix: F) -> Self {
        self.fixes.push(Box::new(fix));
        self
    }

    /// Registers a boxed fix.
    #[must_use]
    pub fn fix_box(mut self, fix: FixBox) -> Self {
        self.fixes.push(fix);
        self
    }

    /// Validates every registration and freezes the table.
    ///
    /// # Errors
    ///
    /// Returns the first malformed registration found.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut seen = HashSet::new();
        let mut entries: Vec<RuleEntry> = Vec::with_capacity(self.rules.len());

        for (index, rule) in self.rules.into_iter().enumerate() {
            let (code, name) = (rule.code(), rule.name());
            if code.trim().is_empty() || name.trim().is_empty() {
                return Err(RegistryError::MissingIdentity {
                    index,
                    code: code.to_string(),
                    name: name.to_string(),
                });
            }
            for key in [code, name] {
                if !seen.insert(key) {
                    return Err(RegistryError::DuplicateRule(key.to_string()));
                }
            }
            entries.push(RuleEntry {
                rule,
                fixes: Vec::new(),
            });
        }

        for fix in self.fixes {
            let rule_code = fix.rule_code();
            if fix.id().trim().is_empty() {
                return Err(RegistryError::MissingFixId {
                    rule: rule_code.to_string(),
                });
            }
            let Some(entry) = entries
                .iter_mut()
                .find(|e| e.rule.code() == rule_code || e.rule.name() == rule_code)
            else {
                return Err(RegistryError::UnknownRule {
                    fix: fix.id().to_string(),
                    rule: rule_code.to_string(),
                });
            };
            if entry.fixes.iter().any(|f| f.id() == fix.id()) {
                return Err(RegistryError::DuplicateFix {
                    fix: fix.id().to_string(),
                    rule: rule_code.to_string(),
                });
            }
            debug!("Registered fix {} for {}", fix.id(), entry.rule.code());
            entry.fixes.push(fix);
        }

        Ok(Registry { entries })
    }
}

/// Immutable table of rules and their fixes.
#[derive(Debug)]
pub struct Registry {
    entries: Vec<RuleEntry>,
}

impl Registry {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Iterates over the registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn ImportRule> {
        self.entries.iter().map(|e| e.rule.as_ref())
    }

    /// Looks up an entry by rule code or name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RuleEntry> {
        self.entries
            .iter()
            .find(|e| e.rule.code() == key || e.rule.name() == key)
    }

    /// Looks up a rule by code or name.
    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&dyn ImportRule> {
        self.get(key).map(|e| e.rule.as_ref())
    }

    /// Fixes registered for a rule code or name.
    #[must_use]
    pub fn fixes_for(&self, key: &str) -> &[FixBox] {
        self.get(key).map_or(&[], |e| e.fixes.as_slice())
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
