//! Batch runner: applies a rule set to every serialized tree under a directory.

use crate::config::{Config, ConfigError, DEFAULT_SUFFIX};
use crate::context::Report;
use crate::engine::run_rules;
use crate::rule::{Rule, RuleBox};
use crate::tree::{Node, Position, TreeError};

use miette::Diagnostic;
use serde::Serialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a batch run.
#[derive(Debug, Error, Diagnostic)]
pub enum BatchError {
    /// IO error reading a directory or a tree file.
    #[error("IO error at {path}: {source}")]
    #[diagnostic(code(treelint::batch::io))]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A tree file does not hold a valid syntax tree.
    #[error("Malformed tree in {path}: {source}")]
    #[diagnostic(
        code(treelint::batch::parse),
        help("pass --keep-going to skip malformed files")
    )]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Deserialization error.
        source: TreeError,
    },

    /// An exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    #[diagnostic(code(treelint::batch::pattern))]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Glob parse error.
        source: glob::PatternError,
    },

    /// The discovery glob could not be built from the root and suffix.
    #[error("Invalid discovery glob: {0}")]
    #[diagnostic(code(treelint::batch::glob))]
    Glob(#[from] glob::PatternError),

    /// The input root is not a directory.
    #[error("Not a directory: {path}")]
    #[diagnostic(code(treelint::batch::not_a_directory))]
    NotADirectory {
        /// The configured root.
        path: PathBuf,
    },

    /// The tree-file suffix is empty.
    #[error("Tree file suffix must not be empty")]
    #[diagnostic(code(treelint::batch::suffix))]
    EmptySuffix,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    #[diagnostic(code(treelint::batch::config))]
    Config(#[from] ConfigError),
}

/// A point in an external result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    /// Line number, as reported by the parser.
    pub line: u32,
    /// Column number, omitted when the parser reported none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl From<Position> for Point {
    fn from(pos: Position) -> Self {
        Self {
            line: pos.line,
            col: pos.column,
        }
    }
}

/// A report tied to the original source file it was found in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Identifier of what was found.
    pub check_id: String,
    /// Original file path, relative to the batch root, `/`-separated.
    pub path: String,
    /// Start of the reported node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    /// End of the reported node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    /// Payload the rule attached, passed through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl Finding {
    /// Converts a report into a finding for the file at `path`.
    #[must_use]
    pub fn from_report(report: &Report<'_>, path: impl Into<String>) -> Self {
        let loc = report.node.loc.as_ref();
        Self {
            check_id: report.check_id.clone(),
            path: path.into(),
            start: loc.and_then(|l| l.start).map(Point::from),
            end: loc.and_then(|l| l.end).map(Point::from),
            extra: report.extra.clone().filter(|v| !v.is_null()),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(start) = self.start {
            write!(f, ":{}", start.line)?;
            if let Some(col) = start.col {
                write!(f, ":{col}")?;
            }
        }
        write!(f, ": {}", self.check_id)
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    /// All findings, in discovery order.
    pub results: Vec<Finding>,
    /// Number of tree files checked.
    #[serde(skip)]
    pub files_checked: usize,
    /// Number of malformed tree files skipped under `keep_going`.
    #[serde(skip)]
    pub files_skipped: usize,
}

impl BatchReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any rule reported anything.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Builder for configuring a [`BatchRunner`].
#[derive(Default)]
pub struct BatchRunnerBuilder {
    root: Option<PathBuf>,
    suffix: Option<String>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    keep_going: Option<bool>,
}

impl BatchRunnerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory to scan.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the tree-file suffix (default: `.ast.json`).
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern, matched against root-relative paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether malformed tree files are skipped (default: false).
    #[must_use]
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = Some(keep_going);
        self
    }

    /// Builds the runner.
    ///
    /// Builder settings take precedence over the configuration's `[runner]`
    /// table; exclude patterns from both are merged. Rules the configuration
    /// disables are dropped here.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a readable directory, the suffix
    /// is empty, or an exclude pattern is invalid.
    pub fn build(self) -> Result<BatchRunner, BatchError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.runner.root.clone());
        let root = root.canonicalize().map_err(|e| BatchError::Io {
            path: root.clone(),
            source: e,
        })?;
        if !root.is_dir() {
            return Err(BatchError::NotADirectory { path: root });
        }

        let suffix = self.suffix.unwrap_or_else(|| config.runner.suffix.clone());
        if suffix.is_empty() {
            return Err(BatchError::EmptySuffix);
        }

        let mut exclude_patterns = Vec::new();
        for pattern in self
            .exclude_patterns
            .into_iter()
            .chain(config.runner.exclude.iter().cloned())
        {
            let compiled = glob::Pattern::new(&pattern)
                .map_err(|source| BatchError::Pattern { pattern, source })?;
            exclude_patterns.push(compiled);
        }

        let rules = self
            .rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        Ok(BatchRunner {
            root,
            suffix,
            rules,
            exclude_patterns,
            keep_going: self.keep_going.unwrap_or(config.runner.keep_going),
        })
    }
}

/// Runs a rule set over every tree file under a root directory.
///
/// Use [`BatchRunner::builder()`] to construct an instance.
pub struct BatchRunner {
    root: PathBuf,
    suffix: String,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<glob::Pattern>,
    keep_going: bool,
}

impl BatchRunner {
    /// Creates a new builder for configuring a runner.
    #[must_use]
    pub fn builder() -> BatchRunnerBuilder {
        BatchRunnerBuilder::new()
    }

    /// Returns the canonical root directory being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the tree-file suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the number of enabled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Checks every tree file and returns the findings.
    ///
    /// Each file gets its own context and fresh visitors.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or reading fails, or if a tree file is
    /// malformed and `keep_going` is off.
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        info!("Starting batch at {}", self.root.display());

        let mut report = BatchReport::new();
        let files = self.discover_files()?;

        info!("Found {} tree files to check", files.len());

        for file_path in &files {
            match self.check_file(file_path) {
                Ok(findings) => {
                    report.results.extend(findings);
                    report.files_checked += 1;
                }
                Err(BatchError::Parse { path, source }) if self.keep_going => {
                    warn!("Skipping malformed tree {}: {}", path.display(), source);
                    report.files_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Batch complete: {} findings in {} files ({} skipped)",
            report.results.len(),
            report.files_checked,
            report.files_skipped
        );

        Ok(report)
    }

    /// Checks a single tree file.
    fn check_file(&self, path: &Path) -> Result<Vec<Finding>, BatchError> {
        debug!("Checking: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| BatchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let tree = Node::from_json_str(&content).map_err(|e| BatchError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let original = self.original_path(path);
        let context = run_rules(&tree, &self.rules);

        Ok(context
            .reports()
            .iter()
            .map(|r| Finding::from_report(r, original.as_str()))
            .collect())
    }

    /// Discovers every tree file under the root, hidden paths included.
    fn discover_files(&self) -> Result<Vec<PathBuf>, BatchError> {
        let pattern = format!(
            "{}/**/*{}",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            glob::Pattern::escape(&self.suffix)
        );
        let options = glob::MatchOptions {
            require_literal_leading_dot: false,
            ..glob::MatchOptions::new()
        };

        let mut files = Vec::new();
        for entry in glob::glob_with(&pattern, options)? {
            let path = entry.map_err(|e| BatchError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;

            if !path.is_file() {
                continue;
            }
            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }

    /// Checks if a path matches any exclude pattern.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.relative_path(path);
        let options = glob::MatchOptions {
            require_literal_separator: false,
            require_literal_leading_dot: false,
            ..glob::MatchOptions::new()
        };
        self.exclude_patterns
            .iter()
            .any(|p| p.matches_with(&relative, options))
    }

    /// Path of `path` relative to the root, joined with `/`.
    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Recovers the original file path from a tree file path.
    fn original_path(&self, path: &Path) -> String {
        let mut relative = self.relative_path(path);
        if let Some(idx) = relative.rfind(&self.suffix) {
            relative.truncate(idx);
        }
        relative
    }
}

/// Runs `rules` over every `.ast.json` file under `input_root`.
///
/// # Errors
///
/// Returns an error if the root cannot be scanned or a tree file cannot be
/// read or parsed.
pub fn check_all_asts<I>(rules: I, input_root: impl AsRef<Path>) -> Result<Vec<Finding>, BatchError>
where
    I: IntoIterator<Item = RuleBox>,
{
    let runner = BatchRunner::builder()
        .root(input_root.as_ref())
        .suffix(DEFAULT_SUFFIX)
        .rules(rules)
        .build()?;
    Ok(runner.run()?.results)
}
