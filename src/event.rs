//! The crash report domain model.
//!
//! Everything here is immutable once built. Fields are private; use the
//! constructors and `with_*` methods to assemble a value and the accessors
//! to read it back. Serialization follows field declaration order, with any
//! unmodelled report sections written last in the order they were read.

use crate::ast::{Node, Pair};
use crate::config::Configuration;
use crate::number::NumericToken;
use serde::Serialize;
use std::sync::Arc;

/// A single error report: what was thrown and what every thread was doing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(skip)]
    config: Arc<Configuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unhandled: Option<bool>,
    exceptions: Vec<Exception>,
    threads: Vec<Thread>,
    #[serde(flatten)]
    sections: Sections,
}

/// Root members the model does not interpret (`app`, `device`, `metaData`,
/// `breadcrumbs`, ...), kept as parsed so their numbers keep their tags.
///
/// Compared by key and value; source positions are ignored.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sections(pub(crate) Vec<Pair>);

impl PartialEq for Sections {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.key == b.key && a.value.same_value(&b.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    error_class: String,
    message: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    exception_type: Option<String>,
    stacktrace: Vec<StackFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    id: NumericToken,
    name: String,
    stacktrace: Vec<StackFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    method: String,
    file: String,
    line_number: NumericToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    column_number: Option<NumericToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_address: Option<NumericToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol_address: Option<NumericToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_address: Option<NumericToken>,
}

impl Event {
    pub fn new(
        config: Arc<Configuration>,
        exceptions: Vec<Exception>,
        threads: Vec<Thread>,
    ) -> Self {
        Self {
            config,
            context: None,
            severity: None,
            unhandled: None,
            exceptions,
            threads,
            sections: Sections::default(),
        }
    }

    /// Attaches report sections outside the modelled fields. They are written
    /// back verbatim after `threads`.
    #[must_use]
    pub fn with_sections(mut self, sections: Vec<Pair>) -> Self {
        self.sections = Sections(sections);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    #[must_use]
    pub fn with_unhandled(mut self, unhandled: bool) -> Self {
        self.unhandled = Some(unhandled);
        self
    }

    /// The configuration this event was read with.
    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn severity(&self) -> Option<&str> {
        self.severity.as_deref()
    }

    pub fn unhandled(&self) -> Option<bool> {
        self.unhandled
    }

    pub fn exceptions(&self) -> &[Exception] {
        &self.exceptions
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn sections(&self) -> &[Pair] {
        &self.sections.0
    }

    /// Looks up an unmodelled root section by name.
    pub fn section(&self, name: &str) -> Option<&Node> {
        self.sections
            .0
            .iter()
            .find(|pair| pair.key == name)
            .map(|pair| &pair.value)
    }
}

impl Exception {
    pub fn new(
        error_class: impl Into<String>,
        message: impl Into<String>,
        stacktrace: Vec<StackFrame>,
    ) -> Self {
        Self {
            error_class: error_class.into(),
            message: message.into(),
            exception_type: None,
            stacktrace,
        }
    }

    #[must_use]
    pub fn with_type(mut self, exception_type: impl Into<String>) -> Self {
        self.exception_type = Some(exception_type.into());
        self
    }

    pub fn error_class(&self) -> &str {
        &self.error_class
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exception_type(&self) -> Option<&str> {
        self.exception_type.as_deref()
    }

    pub fn stacktrace(&self) -> &[StackFrame] {
        &self.stacktrace
    }
}

impl Thread {
    pub fn new(id: NumericToken, name: impl Into<String>, stacktrace: Vec<StackFrame>) -> Self {
        Self {
            id,
            name: name.into(),
            stacktrace,
        }
    }

    pub fn id(&self) -> NumericToken {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stacktrace(&self) -> &[StackFrame] {
        &self.stacktrace
    }
}

impl StackFrame {
    pub fn new(method: impl Into<String>, file: impl Into<String>, line_number: NumericToken) -> Self {
        Self {
            method: method.into(),
            file: file.into(),
            line_number,
            column_number: None,
            frame_address: None,
            symbol_address: None,
            load_address: None,
        }
    }

    #[must_use]
    pub fn with_column_number(mut self, column_number: NumericToken) -> Self {
        self.column_number = Some(column_number);
        self
    }

    /// Sets the native frame, symbol and load addresses.
    #[must_use]
    pub fn with_addresses(
        mut self,
        frame_address: Option<NumericToken>,
        symbol_address: Option<NumericToken>,
        load_address: Option<NumericToken>,
    ) -> Self {
        self.frame_address = frame_address;
        self.symbol_address = symbol_address;
        self.load_address = load_address;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line_number(&self) -> NumericToken {
        self.line_number
    }

    pub fn column_number(&self) -> Option<NumericToken> {
        self.column_number
    }

    pub fn frame_address(&self) -> Option<NumericToken> {
        self.frame_address
    }

    pub fn symbol_address(&self) -> Option<NumericToken> {
        self.symbol_address
    }

    pub fn load_address(&self) -> Option<NumericToken> {
        self.load_address
    }
}
