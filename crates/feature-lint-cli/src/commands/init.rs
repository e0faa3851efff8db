//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# feature-lint configuration

# "recommended" (default) or "strict" (test files are checked too)
preset = "recommended"

# Exit non-zero when a violation at this severity or above remains
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/.dart_tool/**",
    "**/*.g.dart",
    "**/*.freezed.dart",
]

# Respect .gitignore files
respect_gitignore = true

# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled, have its severity overridden and
# point at a project document shown with its violations (doc = "...")

[rules.no-internal-cross-feature-import]
enabled = true
# severity = "warning"
allow_in_tests = true
# layers = ["data", "ui", "models", "exceptions", "extensions", "domain", "presentation", "application", "infrastructure"]

[rules.core-independence]
enabled = true
# doc = "ARCHITECTURE.md#core"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("feature-lint.toml"), force)?;

    println!("Created feature-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit feature-lint.toml to configure rules");
    println!("  2. Run: feature-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
