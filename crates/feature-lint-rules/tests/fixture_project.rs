//! Integration test: both rules and fixes end-to-end over a fixture Flutter app.
//!
//! Uses the Dart tree under `tests/fixtures/app/`, analyzed through the real
//! `DartExtractor`, to check detection, suppression, presets and the fix round
//! trip.

use feature_lint_core::{apply_to_file, Analyzer, Config, LintResult, Severity};
use feature_lint_dart::DartExtractor;
use feature_lint_rules::{default_registry, registry_for, Preset};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/app")
}

fn analyze(root: &Path, preset: Preset, config: Config) -> LintResult {
    let registry = registry_for(preset, &config).expect("registry should build");
    Analyzer::builder()
        .root(root)
        .registry(registry)
        .extractor(DartExtractor::new())
        .config(config)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

fn summary(result: &LintResult) -> Vec<(String, usize, &str, Severity)> {
    result
        .violations
        .iter()
        .map(|v| {
            (
                v.location.file.to_string_lossy().replace('\\', "/"),
                v.location.line,
                v.code.as_str(),
                v.severity,
            )
        })
        .collect()
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

// ── Detection ──

#[test]
fn recommended_preset_detects_boundary_violations() {
    let result = analyze(&fixture_root(), Preset::Recommended, Config::default());

    assert_eq!(
        summary(&result),
        vec![
            ("lib/core/http_client.dart".to_string(), 3, "FL002", Severity::Error),
            ("lib/core/logging.dart".to_string(), 1, "FL002", Severity::Error),
            ("lib/core/session.dart".to_string(), 1, "FL002", Severity::Error),
            ("lib/core/session.dart".to_string(), 1, "FL001", Severity::Error),
            ("lib/feature_billing/ui/invoice_page.dart".to_string(), 1, "FL001", Severity::Error),
            ("lib/features/settings/settings.dart".to_string(), 2, "FL001", Severity::Warning),
            ("lib/features/settings/ui/settings_page.dart".to_string(), 1, "FL001", Severity::Error),
        ],
        "{:#?}",
        result.violations
    );
    assert_eq!(result.count_by_severity(), (6, 1, 0));
    assert_eq!(result.fixable_count(), 6);
}

#[test]
fn message_arguments_name_feature_and_barrel() {
    let result = analyze(&fixture_root(), Preset::Recommended, Config::default());
    let args: Vec<Vec<String>> = result.violations.iter().map(|v| v.arguments.clone()).collect();

    assert_eq!(args[0], vec!["feature_auth"]);
    assert_eq!(args[1], vec!["feature"]);
    assert_eq!(args[2], vec!["feature_auth"]);
    assert_eq!(args[3], vec!["feature_auth", "feature_auth/auth.dart"]);
    assert_eq!(args[4], vec!["feature_auth", "feature_auth/auth.dart"]);
    assert_eq!(args[6], vec!["features/profile", "features/profile/profile.dart"]);
    assert_eq!(
        result.violations[4].message,
        "Import of 'feature_auth' internals from outside the feature. \
         Import the barrel file 'feature_auth/auth.dart' instead."
    );
}

#[test]
fn allow_without_reason_is_downgraded_to_warning() {
    let result = analyze(&fixture_root(), Preset::Recommended, Config::default());
    let warning = &result.violations[5];
    assert!(warning.message.contains("missing required reason"));
    assert!(warning.primary_fix().is_none());
}

#[test]
fn strict_preset_checks_test_files() {
    let result = analyze(&fixture_root(), Preset::Strict, Config::default());
    let last = summary(&result).pop().unwrap();
    assert_eq!(result.violations.len(), 8);
    assert_eq!(
        last,
        ("test/feature_billing/invoice_test.dart".to_string(), 1, "FL001", Severity::Error)
    );
}

#[test]
fn generated_files_are_excluded_by_default() {
    let result = analyze(&fixture_root(), Preset::Recommended, Config::default());
    assert!(result
        .violations
        .iter()
        .all(|v| !v.location.file.to_string_lossy().ends_with(".g.dart")));
}

#[test]
fn subdirectory_root_keeps_project_identity() {
    let root = fixture_root();

    let auth = analyze(&root.join("lib/feature_auth"), Preset::Recommended, Config::default());
    assert!(auth.violations.is_empty(), "{:#?}", auth.violations);

    let core = analyze(&root.join("lib/core"), Preset::Recommended, Config::default());
    assert_eq!(
        summary(&core),
        vec![
            ("http_client.dart".to_string(), 3, "FL002", Severity::Error),
            ("logging.dart".to_string(), 1, "FL002", Severity::Error),
            ("session.dart".to_string(), 1, "FL002", Severity::Error),
            ("session.dart".to_string(), 1, "FL001", Severity::Error),
        ]
    );
}

#[test]
fn same_feature_import_is_not_flagged() {
    let result = analyze(&fixture_root(), Preset::Strict, Config::default());
    assert!(result
        .violations
        .iter()
        .all(|v| !v.location.file.starts_with("lib/feature_auth")));
}

// ── Configuration ──

#[test]
fn disabled_rule_does_not_run() {
    let config = Config::parse("[rules.core-independence]\nenabled = false\n").unwrap();
    let result = analyze(&fixture_root(), Preset::Recommended, config);
    assert_eq!(result.violations.len(), 4);
    assert!(result.violations.iter().all(|v| v.code == "FL001"));
}

#[test]
fn severity_override_applies() {
    let config = Config::parse("[rules.FL001]\nseverity = \"warning\"\n").unwrap();
    let result = analyze(&fixture_root(), Preset::Recommended, config);
    assert_eq!(result.count_by_severity(), (3, 4, 0));
}

#[test]
fn strict_test_option_can_be_relaxed_per_rule() {
    let config = Config::parse("[rules.no-internal-cross-feature-import]\nallow_in_tests = true\n")
        .unwrap();
    let result = analyze(&fixture_root(), Preset::Strict, config);
    assert_eq!(result.violations.len(), 7);
}

// ── Fixes ──

#[test]
fn applying_fixes_resolves_every_fixable_violation() {
    let tmp = TempDir::new().unwrap();
    copy_tree(&fixture_root(), tmp.path());

    let before = analyze(tmp.path(), Preset::Recommended, Config::default());
    let plan = before.fix_plan();
    assert_eq!(plan.len(), 5);
    assert_eq!(plan[Path::new("lib/core/session.dart")].len(), 1);

    for (file, replacements) in &plan {
        apply_to_file(&tmp.path().join(file), replacements).unwrap();
    }

    let after = analyze(tmp.path(), Preset::Recommended, Config::default());
    assert_eq!(
        summary(&after),
        vec![("lib/features/settings/settings.dart".to_string(), 2, "FL001", Severity::Warning)]
    );

    let read = |rel: &str| fs::read_to_string(tmp.path().join(rel)).unwrap();
    assert!(read("lib/feature_billing/ui/invoice_page.dart")
        .starts_with("import 'package:app/feature_auth/auth.dart';\n"));
    assert!(read("lib/features/settings/ui/settings_page.dart")
        .starts_with("import \"package:app/features/profile/profile.dart\" show Avatar;\n"));
    assert_eq!(
        read("lib/core/http_client.dart").lines().take(4).collect::<Vec<_>>(),
        vec![
            "import 'dart:io';",
            "",
            "// FIXME(core-independence): core must not depend on features. Move this dependency out of core.",
            "// import 'package:app/feature_auth/auth.dart';",
        ]
    );
    assert!(read("lib/core/session.dart").starts_with(
        "// FIXME(core-independence): core must not depend on features. Move this dependency out of core.\n\
         // import 'package:app/feature_auth/data/auth_service.dart';\n"
    ));
    assert!(after.fix_plan().is_empty());
}

#[test]
fn default_registry_matches_recommended_preset() {
    let registry = default_registry().unwrap();
    let codes: Vec<&str> = registry.rules().map(|r| r.code()).collect();
    assert_eq!(codes, vec!["FL001", "FL002"]);
}
