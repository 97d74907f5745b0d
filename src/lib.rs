//! Reads and writes JSON crash reports without losing numeric fidelity.
//!
//! Every number keeps the form it was written in: a 32-bit integer, a
//! 64-bit integer, or a double. Reading `150000000000` and writing it back
//! yields `150000000000`, never `150000000000.0` or `1.5e11`, and
//! `11236722452451234` survives without the rounding a double would apply.

pub mod api;
pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod lexer;
pub mod number;
pub mod parser;
mod serialization;
pub mod utils;

pub use api::{parse_document, read_event, EventReader};
pub use builder::EventBuilder;
pub use config::{Configuration, ReaderOptions};
pub use error::{BuildError, ParserError, ReportError};
pub use event::{Event, Exception, StackFrame, Thread};
pub use number::{NumberKind, NumericToken};
pub use serialization::{to_json, write_event};
