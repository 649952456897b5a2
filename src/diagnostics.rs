//! Human-readable syntax error reports.

use std::fmt;

use crate::syntax::{NodeId, NodeKind, RawSyntaxError, SyntaxTree};

/// Token shown when an error has no namable construct above it.
pub const ROOT_TOKEN: &str = "ROOT";

/// One reported syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    /// Rendering of the nearest namable construct, or [`ROOT_TOKEN`]
    pub token: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MSG: {} - LINE: {} - TOKEN: '{}'",
            self.message, self.line, self.token
        )
    }
}

impl NodeKind {
    /// Renders namable constructs; `None` for everything else.
    pub fn describe(&self) -> Option<String> {
        match self {
            NodeKind::AssertionForm(form) => Some(form.to_string()),
            NodeKind::Assertion(assertion) => Some(assertion.to_string()),
            NodeKind::Declaration(declaration) => Some(declaration.to_string()),
            NodeKind::Step(step) => Some(step.to_string()),
            NodeKind::Other(_) => None,
        }
    }
}

/// Describes each raw error in order.
///
/// Never fails: an error pointing outside the tree, or with no namable
/// ancestor, is reported with [`ROOT_TOKEN`].
pub fn describe(errors: &[RawSyntaxError], tree: &SyntaxTree) -> Vec<Diagnostic> {
    errors
        .iter()
        .map(|error| Diagnostic {
            message: error.message.clone(),
            line: error.line.max(1),
            token: nearest_token(tree, error.node).unwrap_or_else(|| ROOT_TOKEN.to_string()),
        })
        .collect()
}

/// Walks from `node` towards the root, rendering the first namable construct.
pub fn nearest_token(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    tree.ancestors(node).find_map(|node| node.kind.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Step;
    use crate::syntax::{AssertionSyntax, Construct};

    #[test]
    fn walks_up_to_namable_ancestor() {
        let mut tree = SyntaxTree::new();
        let root = tree.push(None, NodeKind::Other(Construct::Model));
        let assertion = tree.push(
            Some(root),
            NodeKind::Assertion(AssertionSyntax {
                quantifier: None,
                form: Some("exists".to_string()),
                items: vec![],
                complete: false,
            }),
        );
        let operand = tree.push(Some(assertion), NodeKind::Other(Construct::Operand));
        let errors = vec![RawSyntaxError {
            message: "expected a path, found ')'".to_string(),
            line: 3,
            node: operand,
        }];

        let report = describe(&errors, &tree);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].token, "exists(...)");
        assert_eq!(report[0].line, 3);
    }

    #[test]
    fn falls_back_to_root_sentinel() {
        let mut tree = SyntaxTree::new();
        let root = tree.push(None, NodeKind::Other(Construct::Model));
        let errors = vec![RawSyntaxError {
            message: "expected an assertion, found integer 3".to_string(),
            line: 1,
            node: root,
        }];
        assert_eq!(describe(&errors, &tree)[0].token, ROOT_TOKEN);
    }

    #[test]
    fn dangling_node_is_still_reported() {
        let mut other = SyntaxTree::new();
        let node = other.push(None, NodeKind::Step(Step::Index(4)));
        let errors = vec![RawSyntaxError {
            message: "expected ']'".to_string(),
            line: 0,
            node,
        }];

        let report = describe(&errors, &SyntaxTree::new());
        assert_eq!(report[0].token, ROOT_TOKEN);
        assert_eq!(report[0].line, 1);
    }
}
