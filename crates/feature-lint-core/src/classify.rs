//! Path classification: maps import URIs and file paths to feature identities.
//!
//! Two naming conventions are recognized, tried in this order:
//!
//! 1. underscore style: `feature_<name>` (e.g. `lib/feature_auth/...`)
//! 2. slash style: `features/<name>` (e.g. `lib/features/auth/...`)
//!
//! A token only matches at the start of a path segment: at the start of the
//! string, after a separator, or after the `:` of a `package:` URI. `<name>` is
//! the maximal run of non-separator characters following the token.
//!
//! The boolean predicates are plain substring tests on a normalized path
//! (backslashes turned into `/`, leading `/` ensured), so `core/x.dart` and
//! `lib/core/x.dart` are treated alike.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Layer directory names considered private to a feature.
pub const DEFAULT_INTERNAL_LAYERS: &[&str] = &[
    "data",
    "ui",
    "models",
    "exceptions",
    "extensions",
    "domain",
    "presentation",
    "application",
    "infrastructure",
];

/// Directory segments that mark test sources.
const TEST_SEGMENTS: &[&str] = &["/test/", "/test_driver/", "/integration_test/"];

/// File name suffix of Dart test files.
const TEST_FILE_SUFFIX: &str = "_test.dart";

/// Extension used when building barrel file names.
const BARREL_EXTENSION: &str = ".dart";

static UNDERSCORE_TOKEN: Lazy<Regex> = Lazy::new(|| token_regex(r"(?:^|[/\\:])(feature_([^/\\]+))"));

static SLASH_TOKEN: Lazy<Regex> =
    Lazy::new(|| token_regex(r"(?:^|[/\\:])(features[/\\]([^/\\]+))"));

#[allow(clippy::expect_used)] // patterns are string literals covered by tests
fn token_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("feature token pattern must compile")
}

/// Which naming convention a feature path uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    /// `feature_<name>`
    Underscore,
    /// `features/<name>`
    Slash,
}

impl NamingStyle {
    /// Builds the canonical directory token for a feature name.
    #[must_use]
    pub fn feature_dir(self, name: &str) -> String {
        match self {
            Self::Underscore => format!("feature_{name}"),
            Self::Slash => format!("features/{name}"),
        }
    }
}

impl std::fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Underscore => write!(f, "underscore"),
            Self::Slash => write!(f, "slash"),
        }
    }
}

/// Feature a path belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureIdentity {
    /// Canonical directory token (`feature_auth` or `features/auth`).
    pub feature_dir: String,
    /// Short feature name (`auth`).
    pub feature_name: String,
    /// Naming convention that matched.
    pub style: NamingStyle,
}

impl FeatureIdentity {
    /// Creates an identity for `name` in the given style.
    #[must_use]
    pub fn new(name: impl Into<String>, style: NamingStyle) -> Self {
        let feature_name = name.into();
        Self {
            feature_dir: style.feature_dir(&feature_name),
            feature_name,
            style,
        }
    }

    /// Barrel file path relative to the feature's parent directory,
    /// e.g. `feature_auth/auth.dart`.
    #[must_use]
    pub fn barrel_path(&self) -> String {
        format!(
            "{}/{}{BARREL_EXTENSION}",
            self.feature_dir, self.feature_name
        )
    }
}

/// A feature token located inside a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMatch {
    /// The classified feature.
    pub identity: FeatureIdentity,
    /// Byte range of the token (`feature_auth`, `features/auth`) in the input.
    pub range: Range<usize>,
}

/// Decomposition of an import URI as `<prefix><feature_token>/<rest>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrelTarget<'a> {
    /// Everything before the feature token (`package:app/`, `../../`, or empty).
    pub prefix: &'a str,
    /// The feature the URI points into.
    pub identity: FeatureIdentity,
    /// Non-empty remainder after `<feature_token>/`.
    pub rest: &'a str,
}

impl BarrelTarget<'_> {
    /// Rebuilds the URI so it points at the feature barrel, keeping the prefix.
    #[must_use]
    pub fn barrel_uri(&self) -> String {
        format!("{}{}", self.prefix, self.identity.barrel_path())
    }
}

/// Locates the feature token in `path`, preferring the underscore style.
#[must_use]
pub fn locate(path: &str) -> Option<FeatureMatch> {
    locate_with(&UNDERSCORE_TOKEN, path, NamingStyle::Underscore)
        .or_else(|| locate_with(&SLASH_TOKEN, path, NamingStyle::Slash))
}

fn locate_with(pattern: &Regex, path: &str, style: NamingStyle) -> Option<FeatureMatch> {
    let caps = pattern.captures(path)?;
    let token = caps.get(1)?;
    let name = caps.get(2)?;
    Some(FeatureMatch {
        identity: FeatureIdentity::new(name.as_str(), style),
        range: token.start()..name.end(),
    })
}

/// Classifies a path or URI into a feature identity.
///
/// Returns `None` when the path is not feature-scoped.
#[must_use]
pub fn classify(path: &str) -> Option<FeatureIdentity> {
    locate(path).map(|m| m.identity)
}

/// Splits `uri` into prefix, feature and remainder.
///
/// Returns `None` when no feature token is found or when nothing follows the
/// token (the URI already points at the feature root).
#[must_use]
pub fn barrel_target(uri: &str) -> Option<BarrelTarget<'_>> {
    let found = locate(uri)?;
    let after = &uri[found.range.end..];
    let rest = after
        .strip_prefix('/')
        .or_else(|| after.strip_prefix('\\'))?;
    if rest.is_empty() {
        return None;
    }
    Some(BarrelTarget {
        prefix: &uri[..found.range.start],
        identity: found.identity,
        rest,
    })
}

fn normalize(path: &str) -> Cow<'_, str> {
    let needs_slashes = path.contains('\\');
    let needs_root = !path.starts_with('/') && !path.starts_with('\\');
    match (needs_slashes, needs_root) {
        (false, false) => Cow::Borrowed(path),
        (true, true) => Cow::Owned(format!("/{}", path.replace('\\', "/"))),
        (true, false) => Cow::Owned(path.replace('\\', "/")),
        (false, true) => Cow::Owned(format!("/{path}")),
    }
}

/// Returns true for files under a test directory or named `*_test.dart`.
#[must_use]
pub fn is_test_file(path: &str) -> bool {
    let path = normalize(path);
    TEST_SEGMENTS.iter().any(|s| path.contains(s)) || path.ends_with(TEST_FILE_SUFFIX)
}

/// Returns true if the path passes through one of the default internal layers.
#[must_use]
pub fn is_internal_layer(path: &str) -> bool {
    internal_layer(path).is_some()
}

/// Returns true if the path passes through one of `layers`.
#[must_use]
pub fn is_internal_layer_in<S: AsRef<str>>(path: &str, layers: &[S]) -> bool {
    let path = normalize(path);
    layers
        .iter()
        .any(|layer| path.contains(&format!("/{}/", layer.as_ref())))
}

/// Returns the first default internal layer the path passes through.
#[must_use]
pub fn internal_layer(path: &str) -> Option<&'static str> {
    let path = normalize(path);
    DEFAULT_INTERNAL_LAYERS
        .iter()
        .copied()
        .find(|layer| path.contains(&format!("/{layer}/")))
}

/// Returns true for paths under a `core` directory.
#[must_use]
pub fn is_core_module(path: &str) -> bool {
    normalize(path).contains("/core/")
}

/// Cheap pre-filter: true if the raw path mentions `feature_` or `features/`.
///
/// Looser than [`classify`]; a match here does not guarantee a feature identity.
#[must_use]
pub fn contains_feature_pattern(path: &str) -> bool {
    path.contains("feature_") || path.contains("features/")
}

/// Returns true if the path is a feature's barrel file (`feature_x/x.dart`).
#[must_use]
pub fn is_barrel_file(path: &str) -> bool {
    let Some(identity) = classify(path) else {
        return false;
    };
    normalize(path).ends_with(&format!("/{}", identity.barrel_path()))
}

/// Architectural role of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "role")]
pub enum PathRole {
    /// The public barrel file of a feature.
    Barrel,
    /// A file inside one of a feature's private layers.
    FeatureInternal {
        /// Layer directory name.
        layer: &'static str,
    },
    /// Other feature-scoped file.
    Feature,
    /// Shared core module.
    Core,
    /// Not feature-scoped, not core.
    Unscoped,
}

impl std::fmt::Display for PathRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Barrel => write!(f, "barrel"),
            Self::FeatureInternal { layer } => write!(f, "feature-internal ({layer})"),
            Self::Feature => write!(f, "feature"),
            Self::Core => write!(f, "core"),
            Self::Unscoped => write!(f, "unscoped"),
        }
    }
}

/// Everything the classifier knows about a single path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathProfile {
    /// Feature identity, if feature-scoped.
    pub feature: Option<FeatureIdentity>,
    /// First default internal layer on the path.
    pub layer: Option<&'static str>,
    /// Whether the path is a barrel file.
    pub is_barrel: bool,
    /// Whether the path is under `core/`.
    pub is_core: bool,
    /// Whether the path is a test file.
    pub is_test: bool,
}

impl PathProfile {
    /// Classifies `path` with every predicate.
    #[must_use]
    pub fn of(path: &str) -> Self {
        Self {
            feature: classify(path),
            layer: internal_layer(path),
            is_barrel: is_barrel_file(path),
            is_core: is_core_module(path),
            is_test: is_test_file(path),
        }
    }

    /// Collapses the profile into a single role.
    #[must_use]
    pub fn role(&self) -> PathRole {
        match (&self.feature, self.layer) {
            _ if self.is_barrel => PathRole::Barrel,
            (Some(_), Some(layer)) => PathRole::FeatureInternal { layer },
            (Some(_), None) => PathRole::Feature,
            (None, _) if self.is_core => PathRole::Core,
            (None, _) => PathRole::Unscoped,
        }
    }
}
