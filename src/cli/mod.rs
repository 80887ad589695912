//! The cukex Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use miette::{IntoDiagnostic, MietteHandlerOpts, Report};
use serde::Serialize;
use termcolor::{ColorChoice, StandardStream};
use tracing::Level;

use crate::cli::args::{Command, CukexArgs, GlobalOptions};
use crate::fixtures::{run_all, summarize, FixtureConfig};
use crate::parameters::{NumberFormat, ParameterType, ParameterTypeRegistry, TypeHint, Value};
use crate::syntax::{parse, tokenize};
use crate::{CucumberExpression, CucumberExpressionGenerator, Expression, ExpressionFactory};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = CukexArgs::parse();
    init_tracing(args.global.verbose);
    if args.global.no_color {
        let _ = miette::set_hook(Box::new(|_| {
            Box::new(MietteHandlerOpts::new().color(false).build())
        }));
    }

    match dispatch(&args.global, args.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(report) => {
            eprintln!("{report:?}");
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs one subcommand. `Ok(false)` means the command ran but reported
/// failures.
fn dispatch(options: &GlobalOptions, command: Command) -> Result<bool, Report> {
    let grouping_separator = options
        .grouping_separator
        .unwrap_or_else(|| NumberFormat::grouping_for(options.decimal_separator));
    let number_format = NumberFormat::new(options.decimal_separator, grouping_separator)?;
    let registry = ParameterTypeRegistry::with_number_format(number_format);
    let mut stdout = StandardStream::stdout(color_choice(options.no_color));

    match command {
        Command::Compile { expression } => {
            let expression = CucumberExpression::new(&expression, &registry)?;
            if options.json {
                output::print_json(&mut stdout, &expression.regex_source())?;
            } else {
                output::print_regex(&mut stdout, expression.regex_source()).into_diagnostic()?;
            }
        }

        Command::Tokens { expression } => {
            let tokens = tokenize(&expression)?;
            if options.json {
                output::print_json(&mut stdout, &tokens)?;
            } else {
                output::print_tokens(&mut stdout, &tokens).into_diagnostic()?;
            }
        }

        Command::Ast { expression } => {
            let ast = parse(&expression)?;
            if options.json {
                output::print_json(&mut stdout, &ast)?;
            } else {
                output::print_ast(&mut stdout, &ast).into_diagnostic()?;
            }
        }

        Command::Match {
            expression,
            text,
            hints,
        } => {
            let hints = hints
                .iter()
                .map(|hint| TypeHint::from_str(hint))
                .collect::<Result<Vec<_>, _>>()?;
            let matched = match_arguments(&registry, &expression, &text, &hints)?;
            if options.json {
                output::print_json(&mut stdout, &matched)?;
            } else {
                output::print_arguments(&mut stdout, matched.as_deref()).into_diagnostic()?;
            }
        }

        Command::Generate { text } => {
            let generated = CucumberExpressionGenerator::new(&registry).generate_expressions(&text)?;
            if options.json {
                let summaries: Vec<_> = generated.iter().map(|g| g.summary()).collect();
                output::print_json(&mut stdout, &summaries)?;
            } else {
                output::print_generated(&mut stdout, &generated).into_diagnostic()?;
            }
        }

        Command::Types => {
            let types: Vec<TypeSummary> = registry.parameter_types().map(|t| TypeSummary::of(t)).collect();
            if options.json {
                output::print_json(&mut stdout, &types)?;
            } else {
                output::print_types(&mut stdout, &types).into_diagnostic()?;
            }
        }

        Command::Fixtures { path } => {
            return run_fixtures(options, path);
        }
    }
    Ok(true)
}

fn run_fixtures(options: &GlobalOptions, root: PathBuf) -> Result<bool, Report> {
    let config = FixtureConfig {
        root,
        ..FixtureConfig::default()
    };
    let mut stdout = StandardStream::stdout(color_choice(options.no_color || !config.use_colors));
    let results = run_all(&config);
    let (_, failed, _) = summarize(&results);
    if options.json {
        let summaries: Vec<_> = results.iter().map(output::FixtureSummary::of).collect();
        output::print_json(&mut stdout, &summaries)?;
    } else {
        output::print_fixture_results(&mut stdout, &results).into_diagnostic()?;
    }
    Ok(failed == 0)
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color || !atty::is(atty::Stream::Stdout) {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

// ============================================================================
// SERIALIZABLE VIEWS
// ============================================================================

/// One matched argument, as printed by `cukex match`.
#[derive(Debug, Serialize)]
pub struct ArgumentSummary {
    pub parameter_type: String,
    pub text: Option<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub value: Value,
}

/// A parameter type, as printed by `cukex types`.
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub regexps: Vec<String>,
    pub type_name: String,
    pub use_for_snippets: bool,
    pub prefer_for_regexp_match: bool,
    pub anonymous: bool,
}

impl TypeSummary {
    fn of(parameter_type: &ParameterType) -> Self {
        Self {
            name: parameter_type.name().to_string(),
            regexps: parameter_type.regexps().to_vec(),
            type_name: parameter_type.type_name().to_string(),
            use_for_snippets: parameter_type.use_for_snippets(),
            prefer_for_regexp_match: parameter_type.prefer_for_regexp_match(),
            anonymous: parameter_type.is_anonymous(),
        }
    }
}

fn match_arguments(
    registry: &ParameterTypeRegistry,
    expression: &str,
    text: &str,
    hints: &[TypeHint],
) -> Result<Option<Vec<ArgumentSummary>>, Report> {
    let expression = ExpressionFactory::new(registry).create_expression(expression)?;
    let Some(arguments) = expression.match_text(text, hints)? else {
        return Ok(None);
    };
    let mut summaries = Vec::with_capacity(arguments.len());
    for argument in &arguments {
        let group = argument.group();
        summaries.push(ArgumentSummary {
            parameter_type: argument.parameter_type().name().to_string(),
            text: group.value.clone(),
            start: group.start,
            end: group.end,
            value: argument.value()?,
        });
    }
    Ok(Some(summaries))
}
