//! Defines the command-line arguments and subcommands for the cukex CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::fixtures::DEFAULT_FIXTURE_ROOT;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "cukex",
    version,
    about = "Compile, match and generate Cucumber Expressions."
)]
pub struct CukexArgs {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Decimal separator used by {float} and {double}.
    #[arg(long, global = true, default_value_t = '.')]
    pub decimal_separator: char,

    /// Grouping (thousands) separator used by {float} and {double}.
    /// Defaults to `.` when the decimal separator is `,`, else `,`.
    #[arg(long, global = true)]
    pub grouping_separator: Option<char>,

    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the regular expression a Cucumber Expression compiles to.
    Compile {
        /// The Cucumber Expression to compile.
        #[arg(required = true)]
        expression: String,
    },
    /// Print the tokens of a Cucumber Expression.
    Tokens {
        #[arg(required = true)]
        expression: String,
    },
    /// Show the Abstract Syntax Tree (AST) for a Cucumber Expression.
    Ast {
        #[arg(required = true)]
        expression: String,
    },
    /// Match text against a Cucumber or regular expression and print the arguments.
    Match {
        /// A Cucumber Expression, `^...$` or `/.../` regular expression.
        #[arg(required = true)]
        expression: String,
        /// The step text to match.
        #[arg(required = true)]
        text: String,
        /// Target type for the argument at the same position (repeatable).
        #[arg(long = "hint")]
        hints: Vec<String>,
    },
    /// Suggest Cucumber Expressions for a piece of step text.
    Generate {
        #[arg(required = true)]
        text: String,
    },
    /// List the built-in parameter types.
    Types,
    /// Discover and run the YAML fixture suites in a directory.
    Fixtures {
        #[arg(default_value = DEFAULT_FIXTURE_ROOT)]
        path: PathBuf,
    },
}
