//! Syntax tree produced by the external parser.
//!
//! Trees arrive as Ripper s-expressions serialised to JSON:
//!
//! ```text
//! ["program", [["command", ["@ident", "resources", [1, 0]], ...]]]
//! ```
//!
//! An array starting with a string is a node whose kind is that string. Any
//! other array is an untagged list and becomes a [`Kind::List`] node. Scanner
//! tokens end with a `[line, column]` pair which is lifted into the node.

use crate::kind::Kind;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while converting parser output into a [`SyntaxNode`].
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input is not valid JSON.
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON value does not have the expected shape.
    #[error("malformed tree: {0}")]
    Shape(String),
}

/// A primitive value stored in a child slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String (token text, operator symbols).
    Str(String),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

/// One child slot of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Nested node.
    Node(SyntaxNode),
    /// Primitive value.
    Literal(Literal),
    /// Nothing in this position.
    Absent,
}

impl Slot {
    /// Returns the nested node, if any.
    #[must_use]
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// One node of a parsed source file.
///
/// Nodes are immutable once built; the engine only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: Kind,
    slots: Vec<Slot>,
    line: Option<usize>,
    column: Option<usize>,
    file: Option<PathBuf>,
}

impl SyntaxNode {
    /// Creates a node from its kind and child slots.
    #[must_use]
    pub fn new(kind: Kind, slots: Vec<Slot>) -> Self {
        Self {
            kind,
            slots,
            line: None,
            column: None,
            file: None,
        }
    }

    /// Creates a scanner token such as `@ident` with its position.
    #[must_use]
    pub fn token(kind: Kind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            slots: vec![Slot::Literal(Literal::Str(text.into()))],
            line: Some(line),
            column: Some(column),
            file: None,
        }
    }

    /// Attaches the source file path. Only the root usually carries one.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Returns the kind tag.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns all child slots in order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the line stored directly on this node (tokens only).
    #[must_use]
    pub fn own_line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the column stored directly on this node (tokens only).
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    /// Returns the source file attached to this node.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Returns the text of a scanner token.
    #[must_use]
    pub fn token_text(&self) -> Option<&str> {
        if !self.kind.is_token() {
            return None;
        }
        match self.slots.first() {
            Some(Slot::Literal(Literal::Str(text))) => Some(text),
            _ => None,
        }
    }

    /// Returns a copy with every line, column and file annotation removed.
    ///
    /// Two trees parsed from differently laid out sources compare equal after
    /// stripping when their structure is the same.
    #[must_use]
    pub fn strip_position(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            slots: self
                .slots
                .iter()
                .map(|slot| match slot {
                    Slot::Node(node) => Slot::Node(node.strip_position()),
                    other => other.clone(),
                })
                .collect(),
            line: None,
            column: None,
            file: None,
        }
    }

    /// Parses a tree from Ripper JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a tree.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Converts a Ripper JSON value into a tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an array.
    pub fn from_json(value: &Value) -> Result<Self, TreeError> {
        match value {
            Value::Array(items) => Ok(node_from_array(items)),
            other => Err(TreeError::Shape(format!(
                "expected an array at the root, found {other}"
            ))),
        }
    }
}

fn node_from_array(items: &[Value]) -> SyntaxNode {
    let Some(Value::String(tag)) = items.first() else {
        return SyntaxNode::new(Kind::List, items.iter().map(slot_from_value).collect());
    };

    let kind = Kind::parse(tag);
    let mut rest = &items[1..];
    let mut position = None;
    if kind.is_token() {
        if let Some((last, init)) = rest.split_last() {
            if let Some(pos) = position_pair(last) {
                position = Some(pos);
                rest = init;
            }
        }
    }

    let mut node = SyntaxNode::new(kind, rest.iter().map(slot_from_value).collect());
    if let Some((line, column)) = position {
        node.line = Some(line);
        node.column = Some(column);
    }
    node
}

fn position_pair(value: &Value) -> Option<(usize, usize)> {
    match value.as_array()?.as_slice() {
        [line, column] => Some((
            usize::try_from(line.as_u64()?).ok()?,
            usize::try_from(column.as_u64()?).ok()?,
        )),
        _ => None,
    }
}

fn slot_from_value(value: &Value) -> Slot {
    match value {
        Value::Null => Slot::Absent,
        Value::Bool(b) => Slot::Literal(Literal::Bool(*b)),
        Value::Number(n) => n.as_i64().map_or_else(
            || Slot::Literal(Literal::Float(n.as_f64().unwrap_or_default())),
            |i| Slot::Literal(Literal::Int(i)),
        ),
        Value::String(s) => Slot::Literal(Literal::Str(s.clone())),
        Value::Array(items) => Slot::Node(node_from_array(items)),
        Value::Object(_) => Slot::Absent,
    }
}
