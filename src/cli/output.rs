//! Handles all user-facing output for the CLI.
//!
//! Plain-text rendering with `termcolor`, JSON rendering with `serde_json`,
//! and expected/actual diffs for failed fixtures.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use miette::{IntoDiagnostic, Report};
use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::ast::{Node, Token};
use crate::cli::{ArgumentSummary, TypeSummary};
use crate::fixtures::{summarize, FixtureOutcome, FixtureResult};
use crate::generator::GeneratedExpression;

// ============================================================================
// JSON
// ============================================================================

pub fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), Report> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    writeln!(out, "{json}").into_diagnostic()
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

pub fn print_regex<W: WriteColor>(out: &mut W, source: &str) -> io::Result<()> {
    writeln!(out, "{source}")
}

pub fn print_tokens<W: WriteColor>(out: &mut W, tokens: &[Token]) -> io::Result<()> {
    for token in tokens {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{:<16}", token.token_type.as_str())?;
        out.reset()?;
        writeln!(out, " {:>3}..{:<3} {:?}", token.start, token.end, token.text)?;
    }
    Ok(())
}

pub fn print_ast<W: WriteColor>(out: &mut W, ast: &Node) -> io::Result<()> {
    write!(out, "{}", ast.pretty())
}

pub fn print_arguments<W: WriteColor>(out: &mut W, arguments: Option<&[ArgumentSummary]>) -> io::Result<()> {
    let Some(arguments) = arguments else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "no match")?;
        return out.reset();
    };
    for (i, argument) in arguments.iter().enumerate() {
        write!(out, "{i}: ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "{}", argument.value)?;
        out.reset()?;
        writeln!(out, " ({{{}}})", argument.parameter_type)?;
    }
    Ok(())
}

pub fn print_generated<W: WriteColor>(out: &mut W, generated: &[GeneratedExpression]) -> io::Result<()> {
    for expression in generated {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "{}", expression.source())?;
        out.reset()?;
        let names = expression.parameter_names();
        if names.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "  ({})", names.join(", "))?;
        }
    }
    Ok(())
}

pub fn print_types<W: WriteColor>(out: &mut W, types: &[TypeSummary]) -> io::Result<()> {
    for summary in types {
        let name = if summary.anonymous {
            "{}".to_string()
        } else {
            format!("{{{}}}", summary.name)
        };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "{name:<14}")?;
        out.reset()?;
        write!(out, " {:<8}", summary.type_name)?;
        let mut flags = Vec::new();
        if summary.use_for_snippets {
            flags.push("snippets");
        }
        if summary.prefer_for_regexp_match {
            flags.push("preferential");
        }
        writeln!(out, " /{}/ [{}]", summary.regexps.join("/, /"), flags.join(", "))?;
    }
    Ok(())
}

/// Fixture outcome as printed by `cukex fixtures --json`.
#[derive(Debug, Serialize)]
pub struct FixtureSummary {
    pub path: String,
    pub suite: Option<&'static str>,
    pub status: &'static str,
    pub detail: Option<String>,
}

impl FixtureSummary {
    pub fn of(result: &FixtureResult) -> Self {
        let (status, detail) = match &result.outcome {
            FixtureOutcome::Pass => ("pass", None),
            FixtureOutcome::Fail { actual, .. } => ("fail", Some(actual.clone())),
            FixtureOutcome::Broken { error } => ("broken", Some(error.clone())),
            FixtureOutcome::Skipped { reason } => ("skipped", Some(reason.clone())),
        };
        Self {
            path: result.path.display().to_string(),
            suite: result.suite.map(|s| s.as_str()),
            status,
            detail,
        }
    }
}

pub fn print_fixture_results<W: WriteColor>(out: &mut W, results: &[FixtureResult]) -> io::Result<()> {
    for result in results {
        match &result.outcome {
            FixtureOutcome::Pass => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(out, "✓")?;
                out.reset()?;
                writeln!(out, " {}", result.path.display())?;
            }
            FixtureOutcome::Fail { expected, actual } => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                write!(out, "✗")?;
                out.reset()?;
                writeln!(out, " {}", result.path.display())?;
                let changeset = Changeset::new(expected, actual, "\n");
                print_diff(out, &changeset.diffs)?;
            }
            FixtureOutcome::Broken { error } => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(out, "!")?;
                out.reset()?;
                writeln!(out, " {}: {error}", result.path.display())?;
            }
            FixtureOutcome::Skipped { reason } => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                write!(out, "-")?;
                out.reset()?;
                writeln!(out, " {} ({reason})", result.path.display())?;
            }
        }
    }

    let (passed, failed, skipped) = summarize(results);
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "Fixture Summary")?;
    out.reset()?;
    writeln!(out, "passed: {passed}, failed: {failed}, skipped: {skipped}")
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                writeln!(out, " {x}")?;
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(out, "+{x}")?;
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "-{x}")?;
            }
        }
    }
    out.reset()
}
