use crate::ast::Document;
use crate::builder::EventBuilder;
use crate::config::{Configuration, ReaderOptions};
use crate::error::{ParserError, ReportError};
use crate::event::Event;
use crate::parser::Parser;
use crate::utils::line_and_column;
use std::io::Read;
use std::sync::Arc;

/// Reads events from report documents.
///
/// A reader holds the configuration every event it produces is tagged with,
/// and the parsing limits to apply. It keeps no other state, so one reader
/// can serve any number of reports, from any number of threads.
#[derive(Debug, Clone)]
pub struct EventReader {
    builder: EventBuilder,
    options: ReaderOptions,
}

impl EventReader {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self {
            builder: EventBuilder::new(config),
            options: ReaderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Parses and builds a single event.
    ///
    /// # Errors
    ///
    /// Returns the first parse or contract error. No partial event is
    /// produced; callers should skip the report and carry on.
    pub fn read_str(&self, source: &str, file_name: &str) -> Result<Event, ReportError> {
        let result = Parser::with_options(source, file_name.to_string(), &self.options)
            .and_then(|mut parser| parser.parse_document())
            .and_then(|document| self.builder.build(&document).map_err(ReportError::from));

        match &result {
            Ok(event) => log::debug!(
                "read {}: {} exception(s), {} thread(s)",
                file_name,
                event.exceptions().len(),
                event.threads().len()
            ),
            Err(ReportError::Parser(err)) if !matches!(err, ParserError::InvalidUtf8 { .. }) => {
                let (line, column) = line_and_column(source, err.offset());
                log::debug!("rejected {file_name} at {line}:{column}: {err}");
            }
            Err(err) => log::debug!("rejected {file_name}: {err}"),
        }
        result
    }

    /// Like [`EventReader::read_str`], for raw bytes that must be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidUtf8` before any parsing if the bytes are
    /// not valid UTF-8.
    pub fn read_slice(&self, bytes: &[u8], file_name: &str) -> Result<Event, ReportError> {
        let source = std::str::from_utf8(bytes).map_err(|err| {
            log::debug!("rejected {file_name}: not UTF-8");
            ParserError::InvalidUtf8 {
                offset: err.valid_up_to(),
            }
        })?;
        self.read_str(source, file_name)
    }

    /// Reads `reader` to the end, then parses it.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if reading fails, otherwise as
    /// [`EventReader::read_slice`].
    pub fn read_from<R: Read>(&self, mut reader: R, file_name: &str) -> Result<Event, ReportError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.read_slice(&bytes, file_name)
    }
}

/// Reads one event from `source` with default limits.
///
/// This is the primary entry point. `file_name` only labels diagnostics.
///
/// # Errors
///
/// Returns a `ReportError` if parsing or building fails.
pub fn read_event(
    source: &str,
    file_name: &str,
    config: Arc<Configuration>,
) -> Result<Event, ReportError> {
    EventReader::new(config).read_str(source, file_name)
}

/// Parses `source` into a generic tree without building an event.
///
/// # Errors
///
/// Returns a `ReportError::Parser` on malformed input.
pub fn parse_document(source: &str, file_name: &str) -> Result<Document, ReportError> {
    Parser::new_with_name(source, file_name.to_string())?.parse_document()
}
