//! Check command implementation.

use anyhow::{Context, Result};
use feature_lint_core::{apply_to_file, Analyzer, Config, LintResult};
use feature_lint_dart::DartExtractor;
use feature_lint_rules::{registry_for, Preset};
use std::path::Path;
use tracing::{error, info, warn};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Apply fixes in place before reporting.
    pub fix: bool,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = load_config(source)?;
    let fail_on = config.fail_on();
    let analyzer = build_analyzer(path, options, config)?;

    info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let mut result = analyzer.analyze().context("Analysis failed")?;

    if options.fix {
        let (applied, files) = apply_fixes(analyzer.root(), &result);
        info!("Applied {applied} fix(es) in {files} file(s)");
        if applied > 0 {
            result = analyzer
                .analyze()
                .context("Analysis after applying fixes failed")?;
        }
    }

    super::output::print(&result, options.format, analyzer.root())?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    if let (true, Some(p)) = (source.is_global(), source.path()) {
        info!("Using global config: {}", p.display());
    }
    source.load().with_context(|| match source.path() {
        Some(p) => format!("Failed to load config: {}", p.display()),
        None => "Failed to load default config".to_string(),
    })
}

fn build_analyzer(path: &Path, options: &CheckOptions, config: Config) -> Result<Analyzer> {
    let preset = Preset::from_config(&config)?;
    let registry = registry_for(preset, &config).context("Failed to register rules")?;

    let mut builder = Analyzer::builder().root(path);

    if let Some(filter) = &options.rules {
        let names: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        for name in names.iter().filter(|n| registry.get(n).is_none()) {
            warn!("Unknown rule: {}", name);
        }
        builder = builder.only_rules(names);
    }

    for pattern in &options.exclude {
        builder = builder.exclude(pattern.as_str());
    }

    builder
        .registry(registry)
        .extractor(DartExtractor::new())
        .config(config)
        .build()
        .context("Failed to build analyzer")
}

/// Applies the first fix of every fixable violation, file by file.
///
/// A file whose edits cannot be applied is left untouched and reported;
/// the remaining files are still fixed. Returns the number of edits applied
/// and the number of files rewritten.
fn apply_fixes(root: &Path, result: &LintResult) -> (usize, usize) {
    let mut applied = 0;
    let mut files = 0;
    for (file, replacements) in &result.fix_plan() {
        let target = root.join(file);
        match apply_to_file(&target, replacements) {
            Ok(count) => {
                applied += count;
                files += usize::from(count > 0);
            }
            Err(e) => error!("Failed to apply fixes to {}: {}", target.display(), e),
        }
    }
    (applied, files)
}
