//! List rules command implementation.

use anyhow::{Context, Result};
use feature_lint_rules::default_registry;

/// Runs the list-rules command.
pub fn run() -> Result<()> {
    let registry = default_registry().context("Failed to register rules")?;

    println!("Available rules:\n");
    println!("{:<8} {:<36} Description", "Code", "Name");
    println!("{}", "-".repeat(96));

    for entry in registry.entries() {
        let rule = entry.rule.as_ref();
        println!(
            "{:<8} {:<36} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
        println!("{:<8} {:<36} message: {}", "", "", rule.message_template());
        for fix in &entry.fixes {
            println!("{:<8} {:<36} fix: {} ({})", "", "", fix.id(), fix.title());
        }
    }

    println!("\nPresets:");
    println!("  recommended  - FL001, FL002; test files may import feature internals (default)");
    println!("  strict       - FL001, FL002; test files are checked too");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  feature-lint check --rules core-independence");
    println!("  feature-lint check --rules FL001");

    Ok(())
}
