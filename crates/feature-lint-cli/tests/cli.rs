//! End-to-end tests for the `feature-lint` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn feature_lint(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_feature-lint"))
        .args(args)
        .current_dir(cwd)
        .env("FEATURE_LINT_CONFIG_DIR", cwd.join(".no-global-config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Small app with one violation per rule.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "pubspec.yaml", "name: shop\n");
    write(root, "lib/feature_cart/cart.dart", "export 'data/cart_repo.dart';\n");
    write(root, "lib/feature_cart/data/cart_repo.dart", "class CartRepo {}\n");
    write(
        root,
        "lib/feature_checkout/ui/checkout_page.dart",
        "import 'package:shop/feature_cart/data/cart_repo.dart';\n\nclass CheckoutPage {}\n",
    );
    write(
        root,
        "lib/core/session.dart",
        "import 'package:shop/feature_cart/cart.dart';\n",
    );
    tmp
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_reports_violations_as_json_and_fails() {
    let tmp = project();
    let output = feature_lint(&["check", ".", "--format", "json"], tmp.path());

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let codes: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["FL002", "FL001"]);
    assert_eq!(json["files_checked"], 4);
}

#[test]
fn check_with_fix_leaves_a_clean_tree() {
    let tmp = project();
    let output = feature_lint(&["check", ".", "--fix", "--format", "compact"], tmp.path());

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(stdout(&output).is_empty());

    let page = fs::read_to_string(tmp.path().join("lib/feature_checkout/ui/checkout_page.dart"))
        .unwrap();
    assert!(page.starts_with("import 'package:shop/feature_cart/cart.dart';"));
    let session = fs::read_to_string(tmp.path().join("lib/core/session.dart")).unwrap();
    assert!(session.starts_with("// FIXME(core-independence)"));
}

#[test]
fn rules_filter_and_config_file_are_honored() {
    let tmp = project();
    let only_core = feature_lint(&["check", ".", "--rules", "FL002", "--format", "compact"], tmp.path());
    let lines = stdout(&only_core);
    assert_eq!(lines.lines().count(), 1);
    assert!(lines.contains("[FL002]"));

    write(
        tmp.path(),
        "feature-lint.toml",
        "fail_on = \"error\"\n\n[rules.FL001]\nseverity = \"warning\"\n\n[rules.FL002]\nenabled = false\n",
    );
    let relaxed = feature_lint(&["check", ".", "--format", "compact"], tmp.path());
    assert_eq!(relaxed.status.code(), Some(0));
    assert!(stdout(&relaxed).contains("warning [FL001]"));
}

fn codes(output: &Output) -> Vec<String> {
    let json: serde_json::Value = serde_json::from_str(&stdout(output)).unwrap();
    json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["code"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn subdirectory_check_classifies_from_package_root() {
    let tmp = project();
    write(
        tmp.path(),
        "lib/feature_cart/ui/cart_page.dart",
        "import 'package:shop/feature_cart/data/cart_repo.dart';\n",
    );

    let cart = feature_lint(&["check", "lib/feature_cart", "--format", "json"], tmp.path());
    assert_eq!(cart.status.code(), Some(0), "{}", stdout(&cart));
    assert!(codes(&cart).is_empty());

    let core = feature_lint(&["check", "lib/core", "--format", "json"], tmp.path());
    assert_eq!(core.status.code(), Some(1));
    assert_eq!(codes(&core), vec!["FL002"]);
}

#[test]
fn fix_handles_core_import_of_feature_internals() {
    let tmp = project();
    write(
        tmp.path(),
        "lib/core/cache.dart",
        "import 'package:shop/feature_cart/data/cart_repo.dart';\n",
    );

    let before = feature_lint(&["check", ".", "--format", "json"], tmp.path());
    assert_eq!(codes(&before), vec!["FL002", "FL001", "FL002", "FL001"]);

    let output = feature_lint(&["check", ".", "--fix", "--format", "compact"], tmp.path());
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));

    let cache = fs::read_to_string(tmp.path().join("lib/core/cache.dart")).unwrap();
    assert!(cache.ends_with("// import 'package:shop/feature_cart/data/cart_repo.dart';\n"));
    let page = fs::read_to_string(tmp.path().join("lib/feature_checkout/ui/checkout_page.dart"))
        .unwrap();
    assert!(page.starts_with("import 'package:shop/feature_cart/cart.dart';"));
}

#[test]
fn list_rules_shows_codes_and_fixes() {
    let tmp = TempDir::new().unwrap();
    let output = feature_lint(&["list-rules"], tmp.path());
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("FL001"));
    assert!(text.contains("core-independence"));
    assert!(text.contains("replace-with-barrel-import"));
}

#[test]
fn classify_prints_json_profile() {
    let tmp = TempDir::new().unwrap();
    let output = feature_lint(
        &["classify", "--json", "../../features/auth/data/repo.dart"],
        tmp.path(),
    );
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["feature"]["feature_dir"], "features/auth");
    assert_eq!(json[0]["barrel_uri"], "../../features/auth/auth.dart");
}

#[test]
fn init_writes_config_once() {
    let tmp = TempDir::new().unwrap();
    assert!(feature_lint(&["init"], tmp.path()).status.success());
    assert!(tmp.path().join("feature-lint.toml").is_file());
    assert!(!feature_lint(&["init"], tmp.path()).status.success());
    assert!(feature_lint(&["init", "--force"], tmp.path()).status.success());
}
