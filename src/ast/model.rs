use std::fmt;

use crate::ast::{Assertions, DisplayPath, Path};

/// A complete Specl source: declarations followed by the assertion tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Variable declarations in source order
    pub declarations: Vec<Declaration>,

    /// Root of the assertion tree
    pub assertion_set: Assertions,
}

/// Named binding of a path's resolved nodes.
///
/// # Example
/// ```text
/// let items = order.items[*];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub path: Path,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {} = {}", self.name, DisplayPath(&self.path))
    }
}
