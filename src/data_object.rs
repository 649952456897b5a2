//! Normalized, read-only view of one input document.
//!
//! XML trees, JSON documents and multi-valued key/value maps are all turned
//! into the same [`DataObject`] tree so one path resolver serves all three.
//!
//! # Examples
//!
//! ```
//! use specl::{DataObject, Step};
//!
//! let doc = DataObject::from_json_str(r#"{"order": {"items": [1, 2, 3]}}"#).unwrap();
//! let path = vec![
//!     Step::Field("order".to_string()),
//!     Step::Field("items".to_string()),
//!     Step::Index(1),
//! ];
//! assert_eq!(doc.resolve(&path), vec![&DataObject::Integer(2)]);
//! ```

mod json;
mod xml;

use std::fmt;

use crate::ast::Step;

pub use xml::{MAX_DEPTH as MAX_XML_DEPTH, XmlError};

/// A node of the normalized document tree.
///
/// Scalars keep the integer/float distinction of their source. Mappings are
/// ordered and may repeat a key (repeated XML elements, multi-valued maps).
#[derive(Debug, Clone, PartialEq)]
pub enum DataObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Ordered list of nodes
    Sequence(Vec<DataObject>),
    /// Ordered key/value entries; keys may repeat
    Mapping(Vec<(String, DataObject)>),
}

impl DataObject {
    /// Builds a mapping from `(key, value)` pairs, keeping order and repeats.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DataObject>,
    {
        DataObject::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, DataObject::Sequence(_) | DataObject::Mapping(_))
    }

    /// Human-readable kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataObject::Null => "null",
            DataObject::Boolean(_) => "boolean",
            DataObject::Integer(_) => "integer",
            DataObject::Float(_) => "float",
            DataObject::String(_) => "string",
            DataObject::Sequence(_) => "sequence",
            DataObject::Mapping(_) => "mapping",
        }
    }

    /// Text of a non-null scalar.
    pub fn as_text(&self) -> Option<String> {
        match self {
            DataObject::String(s) => Some(s.clone()),
            DataObject::Integer(n) => Some(n.to_string()),
            DataObject::Float(n) => Some(n.to_string()),
            DataObject::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Every value bound to `key`, in insertion order.
    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a DataObject> + use<'a, 'k> {
        let entries: &[(String, DataObject)] = match self {
            DataObject::Mapping(entries) => entries,
            _ => &[],
        };
        entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Direct children of a sequence or mapping; empty for scalars.
    pub fn children(&self) -> Vec<&DataObject> {
        match self {
            DataObject::Sequence(items) => items.iter().collect(),
            DataObject::Mapping(entries) => entries.iter().map(|(_, value)| value).collect(),
            _ => Vec::new(),
        }
    }

    /// Applies one step to this node.
    ///
    /// A step that does not fit the node kind (a field on a sequence, an
    /// index on a scalar, ...) or an out-of-range index matches nothing.
    pub fn step(&self, step: &Step) -> Vec<&DataObject> {
        match (self, step) {
            (DataObject::Mapping(_), Step::Field(key)) => self.get_all(key).collect(),
            (DataObject::Sequence(items), Step::Index(index)) => items.get(*index).into_iter().collect(),
            (_, Step::Wildcard) => self.children(),
            _ => Vec::new(),
        }
    }

    /// `key[index]` on this node. The index counts the values bound to `key`,
    /// so repeated XML elements and repeated map keys index like a JSON array.
    pub fn field_index(&self, key: &str, index: usize) -> Option<&DataObject> {
        let group: Vec<&DataObject> = self.get_all(key).collect();
        index_group(&group, index)
    }

    /// Resolves a path from this node. The empty path matches the node itself.
    pub fn resolve(&self, path: &[Step]) -> Vec<&DataObject> {
        resolve_nodes(vec![self], path)
    }
}

/// Picks the `index`-th member of a group of nodes: the elements of a single
/// sequence node, otherwise the nodes themselves.
pub fn index_group<'a>(group: &[&'a DataObject], index: usize) -> Option<&'a DataObject> {
    if let [only] = group
        && let DataObject::Sequence(items) = *only
    {
        return items.get(index);
    }
    group.get(index).copied()
}

/// Resolves a path from several starting nodes, concatenating the matches.
///
/// A field step followed by an index step is applied as one `key[index]`
/// lookup per node (see [`DataObject::field_index`]).
pub fn resolve_nodes<'a>(start: Vec<&'a DataObject>, path: &[Step]) -> Vec<&'a DataObject> {
    let mut nodes = start;
    let mut rest = path;
    while let Some((step, tail)) = rest.split_first() {
        nodes = match (step, tail.first()) {
            (Step::Field(key), Some(Step::Index(index))) => {
                rest = &tail[1..];
                nodes
                    .into_iter()
                    .filter_map(|node| node.field_index(key, *index))
                    .collect()
            }
            _ => {
                rest = tail;
                nodes.into_iter().flat_map(|node| node.step(step)).collect()
            }
        };
    }
    nodes
}

impl fmt::Display for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for DataObject {
    fn from(value: &str) -> Self {
        DataObject::String(value.to_string())
    }
}

impl From<String> for DataObject {
    fn from(value: String) -> Self {
        DataObject::String(value)
    }
}

impl From<bool> for DataObject {
    fn from(value: bool) -> Self {
        DataObject::Boolean(value)
    }
}

impl From<i64> for DataObject {
    fn from(value: i64) -> Self {
        DataObject::Integer(value)
    }
}

impl From<i32> for DataObject {
    fn from(value: i32) -> Self {
        DataObject::Integer(i64::from(value))
    }
}

impl From<f64> for DataObject {
    fn from(value: f64) -> Self {
        DataObject::Float(value)
    }
}

impl From<Vec<DataObject>> for DataObject {
    fn from(items: Vec<DataObject>) -> Self {
        DataObject::Sequence(items)
    }
}

impl<T: Into<DataObject>> From<Option<T>> for DataObject {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataObject::Null, Into::into)
    }
}
