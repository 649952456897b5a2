//! Syntax tree arena recorded while parsing.
//!
//! The parser stores every construct it opens as a [`SyntaxNode`] with a link
//! to its parent. Constructs abandoned by a syntax error keep whatever was
//! parsed before the error, so diagnostics can still describe them.

use std::fmt;

use crate::ast::{AssertionForm, DisplayPath, Path, Quantifier, Step};

/// Index of a node in a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Construct kinds a syntax error can point at.
///
/// The first four are namable: diagnostics render them as the offending
/// token. Everything else is [`NodeKind::Other`] and defers to its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    AssertionForm(AssertionForm),
    Assertion(AssertionSyntax),
    Declaration(DeclarationSyntax),
    Step(Step),
    Other(Construct),
}

/// Unnamable constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Model,
    Group,
    Negation,
    Operand,
}

/// A leaf assertion as far as it was parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssertionSyntax {
    pub quantifier: Option<Quantifier>,
    /// Form name as written, known or not
    pub form: Option<String>,
    /// Rendered operands and literal arguments parsed so far
    pub items: Vec<String>,
    pub complete: bool,
}

impl fmt::Display for AssertionSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quantifier) = self.quantifier {
            write!(f, "{} ", quantifier)?;
        }
        let Some(form) = &self.form else {
            return f.write_str("...");
        };
        let mut items = self.items.clone();
        if !self.complete {
            items.push("...".to_string());
        }
        write!(f, "{}({})", form, items.join(", "))
    }
}

/// A declaration as far as it was parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSyntax {
    pub name: Option<String>,
    pub path: Path,
    pub complete: bool,
}

impl fmt::Display for DeclarationSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("let")?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
            if self.complete {
                return write!(f, " = {}", DisplayPath(&self.path));
            }
            if !self.path.is_empty() {
                write!(f, " = {}", DisplayPath(&self.path))?;
            }
        }
        f.write_str(" ...")
    }
}

/// Arena of syntax nodes. Node 0, when present, is the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        self.nodes.push(SyntaxNode { parent, kind });
        NodeId(self.nodes.len() - 1)
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.kind = kind;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    /// The node itself followed by each ancestor up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> + '_ {
        std::iter::successors(self.get(id), move |node| {
            node.parent.and_then(|parent| self.get(parent))
        })
    }
}

/// Parser-reported error pointing at the construct being built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSyntaxError {
    pub message: String,
    pub line: usize,
    pub node: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_walk_to_root() {
        let mut tree = SyntaxTree::new();
        let root = tree.push(None, NodeKind::Other(Construct::Model));
        let group = tree.push(Some(root), NodeKind::Other(Construct::Group));
        let operand = tree.push(Some(group), NodeKind::Other(Construct::Operand));

        let kinds: Vec<_> = tree.ancestors(operand).map(|node| node.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Other(Construct::Operand),
                NodeKind::Other(Construct::Group),
                NodeKind::Other(Construct::Model),
            ]
        );
    }

    #[test]
    fn partial_assertion_renders_ellipsis() {
        let syntax = AssertionSyntax {
            quantifier: None,
            form: Some("equals".to_string()),
            items: vec!["$s".to_string()],
            complete: false,
        };
        assert_eq!(syntax.to_string(), "equals($s, ...)");
    }

    #[test]
    fn partial_declaration_renders_known_parts() {
        let syntax = DeclarationSyntax {
            name: Some("total".to_string()),
            path: Vec::new(),
            complete: false,
        };
        assert_eq!(syntax.to_string(), "let total ...");
    }
}
