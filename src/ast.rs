use crate::number::NumericToken;
use std::fmt::{self, Display};

/// A parsed interchange document.
#[derive(Debug, PartialEq, Clone)]
pub struct Document {
    pub root: Node,
}

/// A structural node with the byte range it occupied in the source.
#[derive(Debug, PartialEq, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum NodeKind {
    Object(Vec<Pair>),
    Array(Vec<Node>),
    String(String),
    Number(NumericToken),
    Boolean(bool),
    Null,
}

/// A single `key: value` member of an object. Keys are unique within an object.
#[derive(Debug, PartialEq, Clone)]
pub struct Pair {
    pub key: String,
    pub value: Node,
}

/// The structural kind of a node, used when reporting type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl Node {
    pub fn new(kind: NodeKind, pos_start: usize, pos_end: usize) -> Self {
        Self {
            kind,
            pos_start,
            pos_end,
        }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.kind.value_type()
    }

    /// Looks up a member by key. Returns `None` if this is not an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Object(pairs) => pairs.iter().find(|p| p.key == key).map(|p| &p.value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<NumericToken> {
        match self.kind {
            NodeKind::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Structural equality that ignores source positions. Numbers compare
    /// by tag as well as value.
    #[must_use]
    pub fn same_value(&self, other: &Node) -> bool {
        match (&self.kind, &other.kind) {
            (NodeKind::Object(a), NodeKind::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x.key == y.key && x.value.same_value(&y.value))
            }
            (NodeKind::Array(a), NodeKind::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            (a, b) => a == b,
        }
    }
}

impl NodeKind {
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            NodeKind::Object(_) => ValueType::Object,
            NodeKind::Array(_) => ValueType::Array,
            NodeKind::String(_) => ValueType::String,
            NodeKind::Number(_) => ValueType::Number,
            NodeKind::Boolean(_) => ValueType::Boolean,
            NodeKind::Null => ValueType::Null,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Object => "object",
            ValueType::Array => "array",
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
        };
        f.write_str(name)
    }
}
