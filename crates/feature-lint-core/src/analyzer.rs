//! Core analyzer for orchestrating lint execution.

use crate::allowance::check_allow;
use crate::config::Config;
use crate::context::FileContext;
use crate::directive::{DirectiveExtractor, ImportDirective};
use crate::registry::{Registry, RuleEntry};
use crate::types::{LintResult, Severity, Suggestion, Violation};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk failed.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A required builder component was not supplied.
    #[error("Analyzer is missing a {0}")]
    Incomplete(&'static str),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    project_root: Option<PathBuf>,
    registry: Option<Registry>,
    extractor: Option<Box<dyn DirectiveExtractor>>,
    exclude_patterns: Vec<String>,
    only_rules: Option<HashSet<String>>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the project root that current-file identity is classified
    /// against. Defaults to the nearest ancestor of the root holding the
    /// extractor's project manifest, or the root itself.
    #[must_use]
    pub fn project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Sets the rule/fix registration table.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the language extractor.
    #[must_use]
    pub fn extractor<E: DirectiveExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Restricts evaluation to the named rules (names or codes).
    #[must_use]
    pub fn only_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry or extractor is missing, or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let registry = self.registry.ok_or(AnalyzerError::Incomplete("registry"))?;
        let extractor = self
            .extractor
            .ok_or(AnalyzerError::Incomplete("directive extractor"))?;
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let project_root = match self.project_root {
            Some(p) if p.is_absolute() => p,
            Some(p) => std::env::current_dir()?.join(p),
            None => find_project_root(&root, extractor.project_manifest()),
        };
        if project_root != root {
            debug!("Classifying paths relative to {}", project_root.display());
        }

        let mut raw_patterns = self.exclude_patterns;
        raw_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = raw_patterns
            .into_iter()
            .map(ExcludePattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            project_root,
            registry,
            extractor,
            exclude,
            only_rules: self.only_rules,
            config,
        })
    }
}

/// Nearest ancestor of `root` (itself included) holding `manifest`.
fn find_project_root(root: &Path, manifest: Option<&str>) -> PathBuf {
    manifest
        .and_then(|name| root.ancestors().find(|dir| dir.join(name).is_file()))
        .unwrap_or(root)
        .to_path_buf()
}

/// Exclude pattern: a glob, or a plain substring when it has no wildcards.
#[derive(Debug)]
struct ExcludePattern {
    raw: String,
    glob: glob::Pattern,
}

impl ExcludePattern {
    fn new(raw: String) -> Result<Self, glob::PatternError> {
        let glob = glob::Pattern::new(&raw)?;
        Ok(Self { raw, glob })
    }

    fn matches(&self, relative: &str) -> bool {
        if self.glob.matches(relative) {
            return true;
        }
        let has_wildcards = self.raw.contains(['*', '?', '[']);
        !has_wildcards && !self.raw.is_empty() && relative.contains(self.raw.as_str())
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    project_root: PathBuf,
    registry: Registry,
    extractor: Box<dyn DirectiveExtractor>,
    exclude: Vec<ExcludePattern>,
    only_rules: Option<HashSet<String>>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the project root paths are classified against.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the registration table.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the number of rules that will run.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry
            .entries()
            .iter()
            .filter(|e| self.is_enabled(e))
            .count()
    }

    fn is_enabled(&self, entry: &RuleEntry) -> bool {
        let (name, code) = (entry.rule.name(), entry.rule.code());
        let selected = self
            .only_rules
            .as_ref()
            .map_or(true, |only| only.contains(name) || only.contains(code));
        selected && self.config.is_rule_enabled(name, code)
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// Files that cannot be read are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let workers = self
            .config
            .analyzer
            .parallelism
            .unwrap_or(1)
            .clamp(1, files.len().max(1));

        let mut result = if workers > 1 {
            let chunk_size = files.len().div_ceil(workers);
            std::thread::scope(|scope| {
                let handles: Vec<_> = files
                    .chunks(chunk_size)
                    .map(|chunk| scope.spawn(move || self.analyze_files(chunk)))
                    .collect();
                let mut merged = LintResult::new();
                for handle in handles {
                    match handle.join() {
                        Ok(partial) => merged.extend(partial),
                        Err(_) => warn!("An analysis worker panicked; its files were skipped"),
                    }
                }
                merged
            })
        } else {
            self.analyze_files(&files)
        };

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    fn analyze_files(&self, files: &[PathBuf]) -> LintResult {
        let mut result = LintResult::new();
        for path in files {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    result.violations.extend(self.analyze_source(path, &content));
                    result.files_checked += 1;
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        result
    }

    /// Analyzes one in-memory file.
    ///
    /// Every enabled rule is evaluated against every directive on its own;
    /// a directive that yields nothing never stops the ones after it.
    #[must_use]
    pub fn analyze_source(&self, path: &Path, content: &str) -> Vec<Violation> {
        debug!("Analyzing: {}", path.display());

        let ctx = FileContext::within(path, content, &self.root, &self.project_root);
        let directives = self.extractor.extract(content);
        let mut violations = Vec::new();

        for directive in &directives {
            for entry in self.registry.entries() {
                if !self.is_enabled(entry) {
                    continue;
                }
                violations.extend(self.evaluate_entry(entry, &ctx, directive));
            }
        }

        violations
    }

    fn evaluate_entry(
        &self,
        entry: &RuleEntry,
        ctx: &FileContext,
        directive: &ImportDirective,
    ) -> Option<Violation> {
        let rule = entry.rule.as_ref();
        let mut violation = rule.evaluate(ctx, directive)?;
        debug!(
            "{} flagged {:?} in {}",
            rule.code(),
            directive.uri,
            ctx.classified_path
        );

        if let Some(severity) = self.config.rule_severity(rule.name(), rule.code()) {
            violation.severity = severity;
        }
        if let Some(doc) = self.config.rule_doc(rule.name(), rule.code()) {
            violation = violation.with_doc_ref(doc);
        }

        let allow = check_allow(ctx.content, directive.line, &[rule.name(), rule.code()]);
        if allow.is_allowed() {
            if rule.requires_allow_reason() && allow.reason().is_none() {
                return Some(
                    Violation::new(
                        rule.code(),
                        rule.name(),
                        Severity::Warning,
                        violation.location,
                        format!("Allow directive for '{}' is missing required reason", rule.name()),
                    )
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
                );
            }
            debug!("{} allowed by directive", rule.code());
            return None;
        }

        for fix in &entry.fixes {
            if let Some(replacement) = fix.compute(ctx, directive) {
                violation =
                    violation.with_suggestion(Suggestion::with_fix(fix.id(), fix.title(), replacement));
            }
        }

        Some(violation)
    }

    /// Discovers all source files handled by the extractor.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let extensions = self.extractor.extensions();

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let has_extension = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext)));
            if !has_extension {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        self.exclude.iter().any(|p| p.matches(&relative))
    }
}
