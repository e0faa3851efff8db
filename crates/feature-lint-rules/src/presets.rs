//! Rule presets and the default registration table.

use std::str::FromStr;

use crate::core_independence::{CommentOutFeatureImport, CoreIndependence};
use crate::no_internal_cross_feature_import::{
    self as cross_feature, NoInternalCrossFeatureImport, ReplaceWithBarrelImport,
};
use feature_lint_core::{Config, ConfigError, Registry, RegistryError, RuleBox};

/// Preset configurations for feature-lint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// Both rules; test files may reach into feature internals.
    #[default]
    Recommended,
    /// Both rules; test files are checked like any other file.
    Strict,
}

impl Preset {
    /// Preset name as used in `feature-lint.toml`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
        }
    }

    /// Resolves the preset named in `config`, defaulting to recommended.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] for an unrecognized name.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config
            .preset
            .as_deref()
            .map_or(Ok(Self::default()), str::parse)
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
        }
    }

    fn cross_feature_rule(self) -> NoInternalCrossFeatureImport {
        match self {
            Self::Recommended => NoInternalCrossFeatureImport::new(),
            Self::Strict => NoInternalCrossFeatureImport::new().allow_in_tests(false),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `no-internal-cross-feature-import` (FL001), test files exempt
/// - `core-independence` (FL002)
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(Preset::Recommended.cross_feature_rule()),
        Box::new(CoreIndependence::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Same rules as recommended, but FL001 also checks test files.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(Preset::Strict.cross_feature_rule()),
        Box::new(CoreIndependence::new()),
    ]
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    recommended_rules()
}

/// Registry with both rules and both fixes, default settings.
///
/// # Errors
///
/// Returns an error if the built-in registration table is inconsistent.
pub fn default_registry() -> Result<Registry, RegistryError> {
    registry_for(Preset::Recommended, &Config::default())
}

/// Registry for `preset`, with rule options taken from `config`.
///
/// Reads `allow_in_tests` and `layers` for FL001. Enablement and severity
/// overrides are applied by the analyzer, not here.
///
/// # Errors
///
/// Returns an error if the registration table is inconsistent.
pub fn registry_for(preset: Preset, config: &Config) -> Result<Registry, RegistryError> {
    let mut cross = preset.cross_feature_rule();
    if let Some(options) = config.rule(cross_feature::NAME, cross_feature::CODE) {
        let allow = options.get_bool("allow_in_tests", cross.allow_in_tests);
        cross = cross.allow_in_tests(allow);
        if let Some(layers) = options.get_str_array("layers") {
            cross = cross.layers(layers);
        }
    }

    Registry::builder()
        .rule(cross)
        .fix(ReplaceWithBarrelImport)
        .rule(CoreIndependence::new())
        .fix(CommentOutFeatureImport)
        .build()
}
