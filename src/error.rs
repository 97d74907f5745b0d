use crate::ast::ValueType;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ReportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error("Failed to read report input")]
    #[diagnostic(code(report::io))]
    Io(#[source] Arc<std::io::Error>),

    #[error("Failed to serialize report")]
    #[diagnostic(
        code(report::serialize),
        help("Real numbers must be finite to be written to a report.")
    )]
    Serialize(#[source] Arc<serde_json::Error>),
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialize(Arc::new(err))
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Syntax error: expected {expected}")]
    #[diagnostic(
        code(parser::syntax),
        help("The report is not well-formed JSON at this position.")
    )]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("found {found}")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("Malformed string: {reason}")]
    #[diagnostic(
        code(parser::malformed_string),
        help("Valid escapes are \\\" \\\\ \\/ \\b \\f \\n \\r \\t and \\uXXXX.")
    )]
    MalformedString {
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: SourceSpan,
        reason: String,
    },

    #[error("Number `{lexeme}` overflows")]
    #[diagnostic(
        code(parser::numeric_overflow),
        help("Integers must fit in 64 bits and reals must be finite doubles.")
    )]
    NumericOverflow {
        #[source_code]
        src: NamedSource<String>,
        #[label("does not fit")]
        span: SourceSpan,
        lexeme: String,
    },

    #[error("Duplicate field `{field}`")]
    #[diagnostic(
        code(parser::duplicate_field),
        help("Each field name may appear only once per object.")
    )]
    DuplicateField {
        #[source_code]
        src: NamedSource<String>,
        #[label("`{field}` already appears in this object")]
        span: SourceSpan,
        field: String,
    },

    #[error("Nesting deeper than {max_depth} levels")]
    #[diagnostic(
        code(parser::nesting_too_deep),
        help("Raise `ReaderOptions::max_depth` if reports this deep are expected.")
    )]
    NestingTooDeep {
        #[source_code]
        src: NamedSource<String>,
        #[label("limit reached here")]
        span: SourceSpan,
        max_depth: usize,
    },

    #[error("Input is not valid UTF-8 (first invalid byte at offset {offset})")]
    #[diagnostic(code(parser::invalid_utf8))]
    InvalidUtf8 { offset: usize },
}

impl ParserError {
    /// Byte offset in the source where the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            ParserError::Syntax { span, .. }
            | ParserError::MalformedString { span, .. }
            | ParserError::NumericOverflow { span, .. }
            | ParserError::DuplicateField { span, .. }
            | ParserError::NestingTooDeep { span, .. } => span.offset(),
            ParserError::InvalidUtf8 { offset } => *offset,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Missing required field `{field}` in {context}")]
    #[diagnostic(
        code(builder::missing_field),
        help("Every exception, thread and stack frame must carry its required fields.")
    )]
    MissingField { field: String, context: String },

    #[error("Field `{field}` in {context} should be {expected}, found {actual}")]
    #[diagnostic(code(builder::type_mismatch))]
    TypeMismatch {
        field: String,
        context: String,
        expected: ValueType,
        actual: ValueType,
    },
}
