//! Projects a parsed [`Document`] onto the [`Event`] model.
//!
//! Each entity has a static field contract listing the fields it reads, the
//! structural kind each must have, and whether it may be absent. A node is
//! checked against its contract (in table order) before anything is
//! extracted, so the error reported for a bad report does not depend on
//! the order fields happen to appear in the source.
//!
//! Root members outside the event contract are carried on the event as
//! parsed nodes. Unknown members of nested entities are dropped.

use crate::ast::{Document, Node, NodeKind, Pair, ValueType};
use crate::config::Configuration;
use crate::error::BuildError;
use crate::event::{Event, Exception, StackFrame, Thread};
use crate::number::NumericToken;
use std::sync::Arc;

/// One row of a field contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub expected: ValueType,
    pub required: bool,
}

const fn required(name: &'static str, expected: ValueType) -> FieldSpec {
    FieldSpec {
        name,
        expected,
        required: true,
    }
}

const fn optional(name: &'static str, expected: ValueType) -> FieldSpec {
    FieldSpec {
        name,
        expected,
        required: false,
    }
}

pub const EVENT_FIELDS: &[FieldSpec] = &[
    required("exceptions", ValueType::Array),
    optional("threads", ValueType::Array),
    optional("context", ValueType::String),
    optional("severity", ValueType::String),
    optional("unhandled", ValueType::Boolean),
];

pub const EXCEPTION_FIELDS: &[FieldSpec] = &[
    required("errorClass", ValueType::String),
    required("message", ValueType::String),
    required("stacktrace", ValueType::Array),
    optional("type", ValueType::String),
];

pub const THREAD_FIELDS: &[FieldSpec] = &[
    required("id", ValueType::Number),
    required("name", ValueType::String),
    required("stacktrace", ValueType::Array),
];

pub const FRAME_FIELDS: &[FieldSpec] = &[
    required("method", ValueType::String),
    required("file", ValueType::String),
    required("lineNumber", ValueType::Number),
    optional("columnNumber", ValueType::Number),
    optional("frameAddress", ValueType::Number),
    optional("symbolAddress", ValueType::Number),
    optional("loadAddress", ValueType::Number),
];

/// Builds events from parsed documents, tagging each with a configuration.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    config: Arc<Configuration>,
}

impl EventBuilder {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    /// Builds an event, or returns the first contract violation found.
    ///
    /// Numeric tags are passed through untouched.
    pub fn build(&self, document: &Document) -> Result<Event, BuildError> {
        let root = Fields::check(&document.root, EVENT_FIELDS, "report".to_string())?;

        let exceptions = root
            .array("exceptions")?
            .iter()
            .enumerate()
            .map(|(i, node)| build_exception(node, format!("exceptions[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let threads = match root.optional_array("threads")? {
            Some(nodes) => nodes
                .iter()
                .enumerate()
                .map(|(i, node)| build_thread(node, format!("threads[{i}]")))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        log::trace!(
            "built event with {} exception(s) and {} thread(s)",
            exceptions.len(),
            threads.len()
        );

        let mut event = Event::new(Arc::clone(&self.config), exceptions, threads);
        if let Some(context) = root.optional_string("context")? {
            event = event.with_context(context);
        }
        if let Some(severity) = root.optional_string("severity")? {
            event = event.with_severity(severity);
        }
        if let Some(unhandled) = root.optional_bool("unhandled")? {
            event = event.with_unhandled(unhandled);
        }

        let sections = root.unmodelled(EVENT_FIELDS);
        if !sections.is_empty() {
            log::trace!("keeping {} unmodelled section(s)", sections.len());
            event = event.with_sections(sections);
        }
        Ok(event)
    }
}

fn build_exception(node: &Node, context: String) -> Result<Exception, BuildError> {
    let fields = Fields::check(node, EXCEPTION_FIELDS, context)?;
    let stacktrace = build_stacktrace(&fields)?;
    let mut exception = Exception::new(
        fields.string("errorClass")?,
        fields.string("message")?,
        stacktrace,
    );
    if let Some(exception_type) = fields.optional_string("type")? {
        exception = exception.with_type(exception_type);
    }
    log::trace!(
        "{}: {} with {} frame(s)",
        fields.context,
        exception.error_class(),
        exception.stacktrace().len()
    );
    Ok(exception)
}

fn build_thread(node: &Node, context: String) -> Result<Thread, BuildError> {
    let fields = Fields::check(node, THREAD_FIELDS, context)?;
    let stacktrace = build_stacktrace(&fields)?;
    Ok(Thread::new(
        fields.number("id")?,
        fields.string("name")?,
        stacktrace,
    ))
}

fn build_stacktrace(owner: &Fields<'_>) -> Result<Vec<StackFrame>, BuildError> {
    owner
        .array("stacktrace")?
        .iter()
        .enumerate()
        .map(|(i, node)| build_frame(node, format!("{}.stacktrace[{i}]", owner.context)))
        .collect()
}

fn build_frame(node: &Node, context: String) -> Result<StackFrame, BuildError> {
    let fields = Fields::check(node, FRAME_FIELDS, context)?;
    let mut frame = StackFrame::new(
        fields.string("method")?,
        fields.string("file")?,
        fields.number("lineNumber")?,
    );
    if let Some(column) = fields.optional_number("columnNumber")? {
        frame = frame.with_column_number(column);
    }
    Ok(frame.with_addresses(
        fields.optional_number("frameAddress")?,
        fields.optional_number("symbolAddress")?,
        fields.optional_number("loadAddress")?,
    ))
}

/// An object node that has passed its contract, plus the path used in errors.
struct Fields<'a> {
    pairs: &'a [Pair],
    context: String,
}

impl<'a> Fields<'a> {
    fn check(node: &'a Node, contract: &[FieldSpec], context: String) -> Result<Self, BuildError> {
        let NodeKind::Object(pairs) = &node.kind else {
            return Err(BuildError::TypeMismatch {
                field: context.clone(),
                context,
                expected: ValueType::Object,
                actual: node.value_type(),
            });
        };

        let fields = Fields { pairs, context };
        for spec in contract {
            match fields.lookup(spec.name) {
                None if spec.required => return Err(fields.missing(spec.name)),
                None => {}
                Some(value) if value.value_type() == spec.expected => {}
                Some(value) if !spec.required && value.value_type() == ValueType::Null => {}
                Some(value) => return Err(fields.mismatch(spec.name, spec.expected, value)),
            }
        }
        Ok(fields)
    }

    fn lookup(&self, name: &str) -> Option<&'a Node> {
        self.pairs.iter().find(|p| p.key == name).map(|p| &p.value)
    }

    /// Members not named by `contract`, in source order.
    fn unmodelled(&self, contract: &[FieldSpec]) -> Vec<Pair> {
        self.pairs
            .iter()
            .filter(|pair| !contract.iter().any(|spec| spec.name == pair.key))
            .cloned()
            .collect()
    }

    /// Present and not `null`.
    fn present(&self, name: &str) -> Option<&'a Node> {
        self.lookup(name)
            .filter(|node| !matches!(node.kind, NodeKind::Null))
    }

    fn string(&self, name: &str) -> Result<String, BuildError> {
        self.optional_string(name)?
            .ok_or_else(|| self.missing(name))
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, BuildError> {
        match self.present(name) {
            None => Ok(None),
            Some(Node {
                kind: NodeKind::String(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(other) => Err(self.mismatch(name, ValueType::String, other)),
        }
    }

    fn number(&self, name: &str) -> Result<NumericToken, BuildError> {
        self.optional_number(name)?
            .ok_or_else(|| self.missing(name))
    }

    fn optional_number(&self, name: &str) -> Result<Option<NumericToken>, BuildError> {
        match self.present(name) {
            None => Ok(None),
            Some(Node {
                kind: NodeKind::Number(n),
                ..
            }) => Ok(Some(*n)),
            Some(other) => Err(self.mismatch(name, ValueType::Number, other)),
        }
    }

    fn optional_bool(&self, name: &str) -> Result<Option<bool>, BuildError> {
        match self.present(name) {
            None => Ok(None),
            Some(Node {
                kind: NodeKind::Boolean(b),
                ..
            }) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(name, ValueType::Boolean, other)),
        }
    }

    fn array(&self, name: &str) -> Result<&'a [Node], BuildError> {
        self.optional_array(name)?
            .ok_or_else(|| self.missing(name))
    }

    fn optional_array(&self, name: &str) -> Result<Option<&'a [Node]>, BuildError> {
        match self.present(name) {
            None => Ok(None),
            Some(Node {
                kind: NodeKind::Array(items),
                ..
            }) => Ok(Some(items.as_slice())),
            Some(other) => Err(self.mismatch(name, ValueType::Array, other)),
        }
    }

    fn missing(&self, name: &str) -> BuildError {
        BuildError::MissingField {
            field: name.to_string(),
            context: self.context.clone(),
        }
    }

    fn mismatch(&self, name: &str, expected: ValueType, actual: &Node) -> BuildError {
        BuildError::TypeMismatch {
            field: name.to_string(),
            context: self.context.clone(),
            expected,
            actual: actual.value_type(),
        }
    }
}
