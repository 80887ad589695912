//! Unified, `miette`-based diagnostics for cukex.
//!
//! Every failure produced by tokenizing, parsing, compiling, matching,
//! transforming or running fixtures is an [`ExpressionError`]. The `Display`
//! text of an error is the exact user-facing message (Cucumber Expression
//! syntax errors keep the familiar column pointer layout), while the attached
//! [`ErrorContext`] feeds `miette` with a named source, a labelled span and a
//! help line.
//!
//! # Error Construction Macros
//!
//! - `err_msg!(Registry, "There is already a parameter type with name {}", name)`
//!   for message-only errors.
//! - `err_ctx!(Syntax, message, ctx)` when a prepared [`ErrorContext`] exists.
//! - `err_src!(Transform, message, ctx, cause)` to chain an underlying error.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::ast::Span;

pub type SourceArc = Arc<NamedSource<String>>;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type-safe error classification that mirrors the [`ExpressionError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Tokenizer, parser and compiler problems in a Cucumber Expression
    Syntax,
    /// `{name}` refers to a parameter type nobody registered
    UndefinedParameterType,
    /// A regular expression group matches several parameter types
    AmbiguousParameterType,
    /// A parameter type name was registered twice
    DuplicateTypeName,
    /// Other registry rule violations
    Registry,
    /// A transformer could not produce a value
    Transform,
    /// Capture groups and parameter types disagree in number
    CaptureGroupMismatch,
    /// The regex engine rejected a pattern
    Regex,
    /// A file could not be read
    Io,
    /// Fixture files that cannot be understood
    Fixture,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "Syntax",
            ErrorType::UndefinedParameterType => "UndefinedParameterType",
            ErrorType::AmbiguousParameterType => "AmbiguousParameterType",
            ErrorType::DuplicateTypeName => "DuplicateTypeName",
            ErrorType::Registry => "Registry",
            ErrorType::Transform => "Transform",
            ErrorType::CaptureGroupMismatch => "CaptureGroupMismatch",
            ErrorType::Regex => "Regex",
            ErrorType::Io => "Io",
            ErrorType::Fixture => "Fixture",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The source the span points into (if any).
    pub source: Option<SourceArc>,
    /// Primary span, as byte offsets.
    pub span: Option<Span>,
    /// Text for the primary label; falls back to the message.
    pub label: Option<String>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source(source: SourceArc) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Context for a problem inside a Cucumber Expression. `span` is in
    /// characters and is converted to bytes here.
    pub fn for_expression(expression: &str, span: Span, label: &str, help: &str) -> Self {
        Self {
            source: Some(to_error_source("expression", expression)),
            span: Some(char_span_to_bytes(expression, span)),
            label: Some(label.to_string()),
            help: Some(help.to_string()),
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Unified error type for all cukex failure modes.
#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("{message}")]
    Syntax {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    UndefinedParameterType {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    AmbiguousParameterType {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    DuplicateTypeName {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    Registry {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    Transform {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    CaptureGroupMismatch {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Invalid regular expression: {message}")]
    Regex {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Fixture error: {message}")]
    Fixture {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl ExpressionError {
    fn parts(&self) -> (&str, &ErrorContext) {
        match self {
            ExpressionError::Syntax { message, ctx, .. }
            | ExpressionError::UndefinedParameterType { message, ctx, .. }
            | ExpressionError::AmbiguousParameterType { message, ctx, .. }
            | ExpressionError::DuplicateTypeName { message, ctx, .. }
            | ExpressionError::Registry { message, ctx, .. }
            | ExpressionError::Transform { message, ctx, .. }
            | ExpressionError::CaptureGroupMismatch { message, ctx, .. }
            | ExpressionError::Regex { message, ctx, .. }
            | ExpressionError::Io { message, ctx, .. }
            | ExpressionError::Fixture { message, ctx, .. } => (message, ctx),
        }
    }

    /// The raw message, without the variant prefix some variants display.
    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ExpressionError::Syntax { .. } => ErrorType::Syntax,
            ExpressionError::UndefinedParameterType { .. } => ErrorType::UndefinedParameterType,
            ExpressionError::AmbiguousParameterType { .. } => ErrorType::AmbiguousParameterType,
            ExpressionError::DuplicateTypeName { .. } => ErrorType::DuplicateTypeName,
            ExpressionError::Registry { .. } => ErrorType::Registry,
            ExpressionError::Transform { .. } => ErrorType::Transform,
            ExpressionError::CaptureGroupMismatch { .. } => ErrorType::CaptureGroupMismatch,
            ExpressionError::Regex { .. } => ErrorType::Regex,
            ExpressionError::Io { .. } => ErrorType::Io,
            ExpressionError::Fixture { .. } => ErrorType::Fixture,
        }
    }
}

impl From<regex::Error> for ExpressionError {
    fn from(err: regex::Error) -> Self {
        ExpressionError::Regex {
            message: err.to_string(),
            ctx: ErrorContext::none(),
            source: Some(Box::new(err)),
        }
    }
}

impl Diagnostic for ExpressionError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("cukex::{}", self.error_type())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.context()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.context()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (message, ctx) = self.parts();
        // Labels without source code would point at nothing.
        let source_len = ctx.source.as_ref()?.inner().len();
        let span = ctx.span?;
        let start = span.start.min(source_len);
        let len = if span.start < source_len {
            span.len().max(1).min(source_len - span.start)
        } else {
            0
        };
        let text = ctx.label.clone().unwrap_or_else(|| message.to_string());
        Some(Box::new(std::iter::once(LabeledSpan::new(Some(text), start, len))))
    }
}

/// Converts a source string into an `Arc<NamedSource<String>>` for error contexts.
pub fn to_error_source<S: AsRef<str>>(name: &str, source: S) -> SourceArc {
    Arc::new(NamedSource::new(name, source.as_ref().to_string()))
}

/// Maps a character index into `text` to a byte offset, clamping at the end.
pub fn char_to_byte(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

pub fn char_span_to_bytes(text: &str, span: Span) -> Span {
    Span::new(char_to_byte(text, span.start), char_to_byte(text, span.end))
}

/// Constructs an [`ExpressionError`] variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($arg:tt)+) => {
        $crate::ExpressionError::$variant {
            message: format!($($arg)+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs an [`ExpressionError`] variant with a message and a prepared context.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $ctx:expr) => {
        $crate::ExpressionError::$variant {
            message: $msg.to_string(),
            ctx: $ctx,
            source: None,
        }
    };
}

/// Like `err_ctx!`, chaining an underlying error as the source.
#[macro_export]
macro_rules! err_src {
    ($variant:ident, $msg:expr, $ctx:expr, $cause:expr) => {
        $crate::ExpressionError::$variant {
            message: $msg.to_string(),
            ctx: $ctx,
            source: Some(Box::new($cause)),
        }
    };
}
