//! Syntax tree model for ESTree-shaped JSON.
//!
//! A [`Node`] owns its children; parent links are not stored and are
//! supplied by the walker as an [`Edge`] instead.

use crate::walker::Edge;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

const TYPE_KEY: &str = "type";
const LOC_KEY: &str = "loc";
const EXTENSION_KEY: &str = "inferredType";

const STACK_RED_ZONE: usize = 32 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

macro_rules! define_node_kind {
    ($($variant:ident => $method:ident [$($key:literal),*]),* $(,)?) => {
        /// The type tag of a [`Node`].
        ///
        /// Tags outside the known ESTree set are kept verbatim in
        /// [`NodeKind::Other`] rather than rejected.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $(
                #[doc = concat!("`", stringify!($variant), "`")]
                $variant,
            )*
            /// A tag the engine does not know about.
            Other(String),
        }

        impl NodeKind {
            /// Resolves a `type` tag.
            #[must_use]
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $(stringify!($variant) => Self::$variant,)*
                    other => Self::Other(other.to_string()),
                }
            }

            /// Returns the `type` tag as it appears in the serialized tree.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                    Self::Other(tag) => tag,
                }
            }

            /// Child fields of this kind, in traversal order.
            #[must_use]
            pub fn child_keys(&self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($key),*],)*
                    Self::Other(_) => &[],
                }
            }
        }
    };
}

with_node_kinds!(define_node_kind);

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in the source, as reported by the parser.
///
/// Values are kept verbatim: ESTree parsers use 1-based lines and 0-based
/// columns, and nothing here renumbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    /// Line number.
    pub line: u32,
    /// Column number, if the parser reported one.
    #[serde(default)]
    pub column: Option<u32>,
}

impl Position {
    /// Creates a position with a column.
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }
}

/// The `loc` range of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceLocation {
    /// Start of the node.
    #[serde(default)]
    pub start: Option<Position>,
    /// End of the node.
    #[serde(default)]
    pub end: Option<Position>,
    /// Source file name, if the parser recorded one.
    #[serde(default)]
    pub source: Option<String>,
}

impl SourceLocation {
    /// Creates a location spanning `start..end`.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            source: None,
        }
    }
}

/// The contents of one child field.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A field holding a single node.
    Single(Box<Node>),
    /// A field holding an array. `None` entries are holes such as the
    /// elided elements of `[a, , b]`; they keep their index.
    Sequence(Vec<Option<Node>>),
}

impl Slot {
    /// Iterates the nodes in this slot with their array index, skipping holes.
    pub fn nodes(&self) -> impl Iterator<Item = (Option<usize>, &Node)> + '_ {
        let (single, items): (Option<&Node>, &[Option<Node>]) = match self {
            Self::Single(node) => (Some(&**node), &[]),
            Self::Sequence(items) => (None, items),
        };
        single.into_iter().map(|node| (None, node)).chain(
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| item.as_ref().map(|node| (Some(i), node))),
        )
    }
}

/// A named child field of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Property name in the parent (e.g. `"callee"`).
    pub name: String,
    /// The child or children stored under that name.
    pub slot: Slot,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The node's type tag.
    pub kind: NodeKind,
    /// Source range, if the parser recorded one.
    pub loc: Option<SourceLocation>,
    /// Child fields in traversal order. Absent and `null` fields are not stored.
    pub fields: Vec<Field>,
    /// Non-node properties such as `name`, `value` or `operator`.
    pub attributes: Map<String, Value>,
    /// Opaque annotation attached by external tooling (`inferredType`).
    pub extension: Option<Value>,
}

/// Errors raised while turning JSON into a [`Node`].
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value expected to be a node is not a JSON object.
    #[error("Expected a node object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A node object has no `type` property.
    #[error("Node is missing its `type` tag")]
    MissingType,

    /// A node's `type` property is not a string.
    #[error("Node `type` tag must be a string, found {found}")]
    InvalidType {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A node's `loc` property does not have the `{start, end}` shape.
    #[error("Malformed `loc` on {kind} node: {source}")]
    Location {
        /// Type tag of the offending node.
        kind: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },
}

impl Node {
    /// Creates a node with no fields, attributes or location.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            loc: None,
            fields: Vec::new(),
            attributes: Map::new(),
            extension: None,
        }
    }

    /// Parses a node from serialized JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or does not describe a node.
    pub fn from_json_str(content: &str) -> Result<Self, TreeError> {
        // No nesting limit; the stack grows on demand.
        let mut json = serde_json::Deserializer::from_str(content);
        json.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        Self::from_value(value)
    }

    /// Converts a JSON value into a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the value, or any nested node, is malformed.
    pub fn from_value(value: Value) -> Result<Self, TreeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(TreeError::NotAnObject {
                found: json_type(&other),
            }),
        })
    }

    fn from_map(mut map: Map<String, Value>) -> Result<Self, TreeError> {
        let kind = match map.remove(TYPE_KEY) {
            Some(Value::String(tag)) => NodeKind::from_tag(&tag),
            Some(other) => {
                return Err(TreeError::InvalidType {
                    found: json_type(&other),
                })
            }
            None => return Err(TreeError::MissingType),
        };

        let loc = match map.remove(LOC_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => {
                Some(
                    serde_json::from_value(value).map_err(|source| TreeError::Location {
                        kind: kind.to_string(),
                        source,
                    })?,
                )
            }
        };

        let extension = map.remove(EXTENSION_KEY).filter(|v| !v.is_null());

        let mut node = Self {
            kind,
            loc,
            fields: Vec::new(),
            attributes: Map::new(),
            extension,
        };

        // Canonical child keys first so traversal order does not depend on
        // how the producer ordered its object keys.
        for key in node.kind.child_keys() {
            if let Some(value) = map.remove(*key) {
                node.absorb((*key).to_string(), value, true)?;
            }
        }
        for (key, value) in map {
            node.absorb(key, value, false)?;
        }

        Ok(node)
    }

    /// Files one property either as a child field or as an attribute.
    fn absorb(&mut self, name: String, value: Value, known_child: bool) -> Result<(), TreeError> {
        match value {
            Value::Null if known_child => {}
            value if is_node(&value) => {
                let child = Self::from_value(value)?;
                self.fields.push(Field {
                    name,
                    slot: Slot::Single(Box::new(child)),
                });
            }
            Value::Array(items) if known_child || items.iter().any(is_node) => {
                // Non-node elements become holes so node indices stay put.
                let items = items
                    .into_iter()
                    .map(|item| {
                        if is_node(&item) {
                            Self::from_value(item).map(Some)
                        } else {
                            Ok(None)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.fields.push(Field {
                    name,
                    slot: Slot::Sequence(items),
                });
            }
            value => {
                self.attributes.insert(name, value);
            }
        }
        Ok(())
    }

    /// Returns the node's type tag.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns `true` if this node has the given kind.
    #[must_use]
    pub fn is(&self, kind: &NodeKind) -> bool {
        &self.kind == kind
    }

    /// Looks up a child field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Slot> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.slot)
    }

    /// Returns the node held by a single-valued child field.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        match self.field(name)? {
            Slot::Single(node) => Some(node),
            Slot::Sequence(_) => None,
        }
    }

    /// Iterates the nodes of an array-valued child field, skipping holes.
    pub fn sequence<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Node> + 'a {
        let items: &[Option<Node>] = match self.field(name) {
            Some(Slot::Sequence(items)) => items,
            _ => &[],
        };
        items.iter().flatten()
    }

    /// Returns a non-node property.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns a string-valued property such as an identifier's `name`.
    #[must_use]
    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    /// Returns a boolean property such as `computed` or `await`.
    #[must_use]
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        self.attr(name).and_then(Value::as_bool)
    }

    /// Returns `true` if this is an `Identifier` with the given name.
    #[must_use]
    pub fn is_identifier(&self, name: &str) -> bool {
        self.kind == NodeKind::Identifier && self.str_attr("name") == Some(name)
    }

    /// Iterates direct children in traversal order, each with the edge that
    /// leads to it from this node.
    pub fn children(&self) -> impl Iterator<Item = (Edge<'_>, &Node)> + '_ {
        self.fields.iter().flat_map(move |field| {
            field.slot.nodes().map(move |(index, child)| {
                (
                    Edge {
                        parent: self,
                        field: field.name.as_str(),
                        index,
                    },
                    child,
                )
            })
        })
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_loc(mut self, loc: SourceLocation) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Appends a single-valued child field.
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, child: Node) -> Self {
        self.fields.push(Field {
            name: name.into(),
            slot: Slot::Single(Box::new(child)),
        });
        self
    }

    /// Appends an array-valued child field.
    #[must_use]
    pub fn with_sequence<I>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = Option<Node>>,
    {
        self.fields.push(Field {
            name: name.into(),
            slot: Slot::Sequence(items.into_iter().collect()),
        });
        self
    }

    /// Sets a non-node property.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Descendants are released from a heap stack, not recursively.
        let mut pending: Vec<Node> = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut Node, pending: &mut Vec<Node>) {
    for field in std::mem::take(&mut node.fields) {
        match field.slot {
            Slot::Single(child) => pending.push(*child),
            Slot::Sequence(items) => pending.extend(items.into_iter().flatten()),
        }
    }
}

/// A value is a node iff it is an object with a string `type`.
fn is_node(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|map| map.get(TYPE_KEY))
        .is_some_and(Value::is_string)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
