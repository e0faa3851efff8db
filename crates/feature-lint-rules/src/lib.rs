//! # feature-lint-rules
//!
//! Built-in boundary rules and quick fixes for feature-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Fix | Description |
//! |------|------|-----|-------------|
//! | FL001 | `no-internal-cross-feature-import` | `replace-with-barrel-import` | Forbids importing another feature's internal layers |
//! | FL002 | `core-independence` | `comment-out-feature-import` | Forbids `core/` from depending on any feature |
//!
//! ## Usage
//!
//! ```ignore
//! use feature_lint_core::Analyzer;
//! use feature_lint_rules::default_registry;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./lib")
//!     .registry(default_registry()?)
//!     .extractor(DartExtractor::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core_independence;
pub mod no_internal_cross_feature_import;
mod presets;

pub use core_independence::{CommentOutFeatureImport, CoreIndependence};
pub use no_internal_cross_feature_import::{NoInternalCrossFeatureImport, ReplaceWithBarrelImport};
pub use presets::{
    all_rules, default_registry, recommended_rules, registry_for, strict_rules, Preset,
};

/// Re-export core types for convenience.
pub use feature_lint_core::{ImportFix, ImportRule, Registry, Severity, Violation};
