//! YAML fixture suites.
//!
//! Every fixture file holds one case. The name of the directory that holds
//! the file picks the suite and therefore the shape of the case:
//!
//! ```yaml
//! # transformation/alternation.yaml
//! expression: mice/rats
//! expected_regex: ^(?:mice|rats)$
//! ```
//!
//! | suite            | fields                                                   |
//! |------------------|----------------------------------------------------------|
//! | `transformation` | `expression`, `expected_regex`                           |
//! | `tokenizer`      | `expression`, `expected_tokens` or `exception`           |
//! | `parser`         | `expression`, `expected_ast` or `exception`              |
//! | `matching`       | `expression`, `text`, `expected_args` or `exception`     |
//!
//! A null `expected_args` means the text must not match.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use cukex::fixtures::{run_all, FixtureConfig};
//!
//! let config = FixtureConfig::default();
//! let results = run_all(&config);
//! if results.iter().any(|r| r.outcome.is_failure()) {
//!     std::process::exit(1);
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ast::{Node, Token};
use crate::expression::{CucumberExpression, Expression, ExpressionFactory};
use crate::parameters::{ParameterTypeRegistry, Value};
use crate::syntax::{parse, tokenize};
use crate::{err_ctx, err_src, ErrorContext, ExpressionError};

// =============================================================================
// CONFIGURATION
// =============================================================================

pub const DEFAULT_FIXTURE_ROOT: &str = "testdata/cucumber-expression";

/// Where fixtures live and how results are shown.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub root: PathBuf,
    pub use_colors: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_FIXTURE_ROOT),
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

// =============================================================================
// CASES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Transformation,
    Tokenizer,
    Parser,
    Matching,
}

impl Suite {
    /// The suite of a fixture file, from the name of its directory.
    pub fn of(path: &Path) -> Option<Suite> {
        let dir = path.parent()?.file_name()?.to_str()?;
        match dir {
            "transformation" => Some(Suite::Transformation),
            "tokenizer" => Some(Suite::Tokenizer),
            "parser" => Some(Suite::Parser),
            "matching" => Some(Suite::Matching),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Transformation => "transformation",
            Suite::Tokenizer => "tokenizer",
            Suite::Parser => "parser",
            Suite::Matching => "matching",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformationCase {
    pub expression: String,
    pub expected_regex: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerCase {
    pub expression: String,
    pub expected_tokens: Option<Vec<Token>>,
    pub exception: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserCase {
    pub expression: String,
    pub expected_ast: Option<Node>,
    pub exception: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingCase {
    pub expression: String,
    pub text: String,
    #[serde(default)]
    pub expected_args: Option<serde_yaml::Value>,
    pub exception: Option<String>,
}

// =============================================================================
// OUTCOMES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOutcome {
    Pass,
    /// Both sides rendered as YAML (or as plain messages for exceptions).
    Fail { expected: String, actual: String },
    /// The file could not be read or did not fit its suite.
    Broken { error: String },
    Skipped { reason: String },
}

impl FixtureOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FixtureOutcome::Fail { .. } | FixtureOutcome::Broken { .. })
    }

    fn compare(expected: String, actual: String) -> Self {
        if expected == actual {
            FixtureOutcome::Pass
        } else {
            FixtureOutcome::Fail { expected, actual }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixtureResult {
    pub path: PathBuf,
    pub suite: Option<Suite>,
    pub outcome: FixtureOutcome,
}

// =============================================================================
// DISCOVERY AND LOADING
// =============================================================================

/// All YAML files below `root`, sorted by path.
pub fn discover_fixture_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Reads and deserializes one fixture file.
pub fn load_case<T: DeserializeOwned>(path: &Path) -> Result<T, ExpressionError> {
    let content = fs::read_to_string(path).map_err(|e| {
        err_src!(
            Io,
            format!("Failed to read {}", path.display()),
            ErrorContext::none(),
            e
        )
    })?;
    serde_yaml::from_str(&content).map_err(|e| {
        let source = crate::diagnostics::to_error_source(&path.display().to_string(), &content);
        let ctx = ErrorContext::with_source(source).help(e.to_string());
        err_ctx!(Fixture, format!("Failed to parse YAML in {}", path.display()), ctx)
    })
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Runs the fixture at `path` with a fresh built-in registry.
pub fn run_fixture(path: &Path) -> Result<FixtureOutcome, ExpressionError> {
    let Some(suite) = Suite::of(path) else {
        return Ok(FixtureOutcome::Skipped {
            reason: "not inside a known suite directory".to_string(),
        });
    };
    debug!(path = %path.display(), %suite, "running fixture");
    let registry = ParameterTypeRegistry::new();
    match suite {
        Suite::Transformation => {
            let case: TransformationCase = load_case(path)?;
            let actual = match CucumberExpression::new(&case.expression, &registry) {
                Ok(expression) => expression.regex_source().to_string(),
                Err(err) => err.to_string(),
            };
            Ok(FixtureOutcome::compare(case.expected_regex, actual))
        }
        Suite::Tokenizer => {
            let case: TokenizerCase = load_case(path)?;
            let actual = tokenize(&case.expression);
            expect(path, case.expected_tokens, case.exception, actual)
        }
        Suite::Parser => {
            let case: ParserCase = load_case(path)?;
            let actual = parse(&case.expression);
            expect(path, case.expected_ast, case.exception, actual)
        }
        Suite::Matching => {
            let case: MatchingCase = load_case(path)?;
            let actual = match_values(&registry, &case.expression, &case.text);
            let expected = case.expected_args.unwrap_or(serde_yaml::Value::Null);
            let expected = (case.exception.is_none()).then_some(expected);
            expect(path, expected, case.exception, actual)
        }
    }
}

/// Discovers and runs every fixture under `config.root`.
pub fn run_all(config: &FixtureConfig) -> Vec<FixtureResult> {
    let files = discover_fixture_files(&config.root);
    if files.is_empty() {
        warn!(root = %config.root.display(), "no fixture files found");
    }
    files
        .into_iter()
        .map(|path| {
            let outcome = run_fixture(&path).unwrap_or_else(|err| FixtureOutcome::Broken {
                error: err.to_string(),
            });
            if let FixtureOutcome::Skipped { reason } = &outcome {
                warn!(path = %path.display(), reason = %reason, "skipping fixture");
            }
            FixtureResult {
                suite: Suite::of(&path),
                path,
                outcome,
            }
        })
        .collect()
}

/// Counts of passed, failed (including broken) and skipped fixtures.
pub fn summarize(results: &[FixtureResult]) -> (usize, usize, usize) {
    let passed = results
        .iter()
        .filter(|r| r.outcome == FixtureOutcome::Pass)
        .count();
    let failed = results.iter().filter(|r| r.outcome.is_failure()).count();
    let skipped = results.len() - passed - failed;
    (passed, failed, skipped)
}

// =============================================================================
// INTERNAL HELPERS
// =============================================================================

fn match_values(
    registry: &ParameterTypeRegistry,
    expression: &str,
    text: &str,
) -> Result<serde_yaml::Value, ExpressionError> {
    let expression = ExpressionFactory::new(registry).create_expression(expression)?;
    let Some(args) = expression.match_text(text, &[])? else {
        return Ok(serde_yaml::Value::Null);
    };
    let values = args
        .iter()
        .map(|arg| arg.value())
        .collect::<Result<Vec<Value>, _>>()?;
    to_yaml_value(&values)
}

/// Compares a result with either an expected value or an expected error
/// message.
fn expect<T: Serialize>(
    path: &Path,
    expected: Option<T>,
    exception: Option<String>,
    actual: Result<T, ExpressionError>,
) -> Result<FixtureOutcome, ExpressionError> {
    let outcome = match (expected, exception, actual) {
        (Some(expected), None, Ok(actual)) => {
            let expected = to_yaml_value(&expected)?;
            let actual = to_yaml_value(&actual)?;
            if expected == actual {
                FixtureOutcome::Pass
            } else {
                FixtureOutcome::Fail {
                    expected: to_yaml_string(&expected)?,
                    actual: to_yaml_string(&actual)?,
                }
            }
        }
        (None, Some(exception), Err(err)) => FixtureOutcome::compare(exception, err.to_string()),
        (Some(expected), None, Err(err)) => FixtureOutcome::Fail {
            expected: to_yaml_string(&expected)?,
            actual: err.to_string(),
        },
        (None, Some(exception), Ok(actual)) => FixtureOutcome::Fail {
            expected: exception,
            actual: to_yaml_string(&actual)?,
        },
        _ => {
            return Err(crate::err_msg!(
                Fixture,
                "{} must have exactly one expected result or exception",
                path.display()
            ))
        }
    };
    Ok(outcome)
}

fn to_yaml_value<T: Serialize + ?Sized>(value: &T) -> Result<serde_yaml::Value, ExpressionError> {
    serde_yaml::to_value(value)
        .map_err(|e| err_src!(Fixture, "Failed to convert a result to YAML", ErrorContext::none(), e))
}

fn to_yaml_string<T: Serialize + ?Sized>(value: &T) -> Result<String, ExpressionError> {
    serde_yaml::to_string(value)
        .map_err(|e| err_src!(Fixture, "Failed to render a result as YAML", ErrorContext::none(), e))
}
