//! # feature-lint-core
//!
//! Core framework for enforcing module boundaries in feature-oriented
//! codebases.
//!
//! This crate provides:
//!
//! - [`classify`] for turning import URIs and file paths into feature identities
//! - [`ImportRule`] and [`ImportFix`] traits for boundary rules and quick fixes
//! - [`Registry`] for the immutable rule/fix registration table
//! - [`Analyzer`] for walking a source tree and evaluating rules
//! - [`apply_replacements`] for applying fix edits atomically
//!
//! ## Example
//!
//! ```ignore
//! use feature_lint_core::{Analyzer, Registry};
//!
//! let registry = Registry::builder()
//!     .rule(MyRule::new())
//!     .fix(MyFix)
//!     .build()?;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./lib")
//!     .registry(registry)
//!     .extractor(MyExtractor)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod allowance;
mod analyzer;
pub mod classify;
mod config;
mod context;
mod directive;
mod fix;
mod registry;
mod rule;
mod types;

pub use allowance::AllowCheck;
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use classify::{FeatureIdentity, NamingStyle, PathProfile, PathRole};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use directive::{DirectiveExtractor, DirectiveKind, ImportDirective};
pub use fix::{apply_replacements, apply_to_file, FixError};
pub use registry::{Registry, RegistryBuilder, RegistryError, RuleEntry};
pub use rule::{format_message, FixBox, ImportFix, ImportRule, RuleBox};
pub use types::{
    LintResult, Location, Replacement, Severity, Span, Suggestion, Violation, ViolationDiagnostic,
};
