//! Syntax module for Cucumber Expressions
//!
//! Tokenizing and parsing, plus the builders for the syntax problems both
//! stages (and the compiler) report.

pub mod error;
pub mod parser;
pub mod tokenizer;

pub use parser::parse;
pub use tokenizer::tokenize;
