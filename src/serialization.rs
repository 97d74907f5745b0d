use crate::ast::{Document, Node, NodeKind};
use crate::error::ReportError;
use crate::event::{Event, Sections};
use crate::number::NumericToken;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use std::io::Write;

/// Numbers are written as their rendered lexeme, never re-formatted by the
/// JSON writer, so the tag decides whether a `.` or exponent appears.
impl Serialize for NumericToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let NumericToken::Real(v) = self {
            if !v.is_finite() {
                return Err(S::Error::custom(format!(
                    "cannot write non-finite number {v}"
                )));
            }
        }
        let raw = RawValue::from_string(self.render()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Objects are written in source insertion order.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.kind {
            NodeKind::Object(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for pair in pairs {
                    map.serialize_entry(&pair.key, &pair.value)?;
                }
                map.end()
            }
            NodeKind::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            NodeKind::String(s) => serializer.serialize_str(s),
            NodeKind::Number(n) => n.serialize(serializer),
            NodeKind::Boolean(b) => serializer.serialize_bool(*b),
            NodeKind::Null => serializer.serialize_unit(),
        }
    }
}

/// Flattened into the event map, so each section becomes a root member.
impl Serialize for Sections {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for pair in &self.0 {
            map.serialize_entry(&pair.key, &pair.value)?;
        }
        map.end()
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root.serialize(serializer)
    }
}

impl Document {
    /// Writes the tree back out as compact JSON.
    ///
    /// # Errors
    /// Returns `ReportError::Serialize` if the tree holds a non-finite real.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serializes an event to compact JSON in canonical field order.
///
/// # Errors
/// Returns `ReportError::Serialize` if a real number is not finite.
pub fn to_json(event: &Event) -> Result<String, ReportError> {
    let json = serde_json::to_string(event)?;
    log::debug!(
        "serialized event with {} exception(s) into {} bytes",
        event.exceptions().len(),
        json.len()
    );
    Ok(json)
}

/// Serializes an event straight into `writer`.
///
/// # Errors
/// Returns `ReportError::Serialize` for non-finite reals, or `ReportError::Io`
/// if the writer fails.
pub fn write_event<W: Write>(event: &Event, mut writer: W) -> Result<(), ReportError> {
    serde_json::to_writer(&mut writer, event)?;
    writer.flush()?;
    Ok(())
}
