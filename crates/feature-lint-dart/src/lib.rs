//! # feature-lint-dart
//!
//! Dart host adapter for feature-lint.
//!
//! Turns Dart source into the plain [`ImportDirective`] records the rules
//! consume. No Dart toolchain is needed: the extractor masks comments and
//! recognizes directives lexically.
//!
//! - [`DartExtractor`] implements [`DirectiveExtractor`] for `.dart` files
//! - [`scan`] holds the byte-level helpers it is built on
//!
//! [`ImportDirective`]: feature_lint_core::ImportDirective
//! [`DirectiveExtractor`]: feature_lint_core::DirectiveExtractor

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dart;
pub mod scan;

pub use dart::DartExtractor;
