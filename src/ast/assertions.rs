use std::fmt;

use crate::ast::steps::{DisplayPath, Path, write_steps};

/// Literal value written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{:?}", n),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// One side of a leaf assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Path resolved fresh against the input document
    ///
    /// # Examples
    /// ```text
    /// order.items[0].price
    /// $
    /// ```
    Path(Path),

    /// Declared (or externally stored) variable, optionally navigated further
    ///
    /// # Examples
    /// ```text
    /// $items
    /// items[0].price      // when `items` was declared with `let`
    /// ```
    Variable { name: String, path: Path },

    /// Literal used as-is
    Literal(Literal),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Path(path) => write!(f, "{}", DisplayPath(path)),
            Operand::Variable { name, path } => {
                write!(f, "${}", name)?;
                write_steps(f, path, false)
            }
            Operand::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

/// Quantifier prefix applying a form to every member of the left operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Every member must satisfy the form (`all`)
    All,
    /// At least one member must satisfy the form (`any`)
    Any,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::All => f.write_str("all"),
            Quantifier::Any => f.write_str("any"),
        }
    }
}

/// Operator tag of a leaf assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Exists,
    Size,
    Equals,
    NotEquals,
    EqualsIgnoreCase,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Between,
}

/// How many operands and literal arguments a form takes, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub operands: usize,
    pub literals: usize,
}

impl FormKind {
    pub const ALL: [FormKind; 14] = [
        FormKind::Exists,
        FormKind::Size,
        FormKind::Equals,
        FormKind::NotEquals,
        FormKind::EqualsIgnoreCase,
        FormKind::Contains,
        FormKind::StartsWith,
        FormKind::EndsWith,
        FormKind::Matches,
        FormKind::GreaterThan,
        FormKind::GreaterOrEqual,
        FormKind::LessThan,
        FormKind::LessOrEqual,
        FormKind::Between,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormKind::Exists => "exists",
            FormKind::Size => "size",
            FormKind::Equals => "equals",
            FormKind::NotEquals => "not-equals",
            FormKind::EqualsIgnoreCase => "equals-ignore-case",
            FormKind::Contains => "contains",
            FormKind::StartsWith => "starts-with",
            FormKind::EndsWith => "ends-with",
            FormKind::Matches => "matches",
            FormKind::GreaterThan => "greater-than",
            FormKind::GreaterOrEqual => "greater-or-equal",
            FormKind::LessThan => "less-than",
            FormKind::LessOrEqual => "less-or-equal",
            FormKind::Between => "between",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FormKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn signature(self) -> Signature {
        let (operands, literals) = match self {
            FormKind::Exists => (1, 0),
            FormKind::Size | FormKind::Matches => (1, 1),
            FormKind::Between => (1, 2),
            _ => (2, 0),
        };
        Signature { operands, literals }
    }

    /// Forms that inspect how many nodes an operand resolves to rather than
    /// their values. They accept empty resolutions and reject quantifiers.
    pub fn counts_nodes(self) -> bool {
        matches!(self, FormKind::Exists | FormKind::Size)
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The operator of a leaf assertion plus its literal arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionForm {
    pub kind: FormKind,
    pub args: Vec<Literal>,
}

impl AssertionForm {
    pub fn new(kind: FormKind) -> Self {
        AssertionForm {
            kind,
            args: Vec::new(),
        }
    }

    pub fn with_args(kind: FormKind, args: Vec<Literal>) -> Self {
        AssertionForm { kind, args }
    }
}

/// Operand slots render as `_`: `matches(_, "^a")`.
impl fmt::Display for AssertionForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.kind.signature().operands;
        let mut parts: Vec<String> = vec!["_".to_string(); slots];
        parts.extend(self.args.iter().map(|arg| arg.to_string()));
        write!(f, "{}({})", self.kind, parts.join(", "))
    }
}

/// Leaf assertion: a form applied to one or two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    pub quantifier: Option<Quantifier>,
    pub form: AssertionForm,
    pub left: Operand,
    pub right: Option<Operand>,
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quantifier) = self.quantifier {
            write!(f, "{} ", quantifier)?;
        }
        let mut parts = vec![self.left.to_string()];
        parts.extend(self.right.iter().map(|operand| operand.to_string()));
        parts.extend(self.form.args.iter().map(|arg| arg.to_string()));
        write!(f, "{}({})", self.form.kind, parts.join(", "))
    }
}

/// Assertion tree: a leaf or a logical combination of subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertions {
    Single(Assertion),
    And(Vec<Assertions>),
    Or(Vec<Assertions>),
    Not(Box<Assertions>),
}

impl Assertions {
    /// Number of leaf assertions in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Assertions::Single(_) => 1,
            Assertions::And(children) | Assertions::Or(children) => {
                children.iter().map(Assertions::leaf_count).sum()
            }
            Assertions::Not(child) => child.leaf_count(),
        }
    }
}

impl fmt::Display for Assertions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assertions::Single(assertion) => write!(f, "{}", assertion),
            Assertions::And(children) => write_joined(f, children, " and "),
            Assertions::Or(children) => write_joined(f, children, " or "),
            Assertions::Not(child) => match child.as_ref() {
                Assertions::Single(_) | Assertions::Not(_) => write!(f, "not {}", child),
                _ => write!(f, "not ({})", child),
            },
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Assertions], separator: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match child {
            Assertions::And(_) | Assertions::Or(_) => write!(f, "({})", child)?,
            _ => write!(f, "{}", child)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Step;

    #[test]
    fn form_names_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FormKind::from_name("equalz"), None);
    }

    #[test]
    fn renders_form_with_slots() {
        let form = AssertionForm::with_args(
            FormKind::Between,
            vec![Literal::Integer(1), Literal::Integer(10)],
        );
        assert_eq!(form.to_string(), "between(_, 1, 10)");
    }

    #[test]
    fn renders_quantified_assertion() {
        let assertion = Assertion {
            quantifier: Some(Quantifier::All),
            form: AssertionForm::new(FormKind::Equals),
            left: Operand::Path(vec![Step::Field("items".to_string()), Step::Wildcard]),
            right: Some(Operand::Literal(Literal::String("ok".to_string()))),
        };
        assert_eq!(assertion.to_string(), r#"all equals(items[*], "ok")"#);
    }

    #[test]
    fn renders_variable_operand_with_steps() {
        let operand = Operand::Variable {
            name: "order".to_string(),
            path: vec![Step::Field("id".to_string()), Step::Index(0)],
        };
        assert_eq!(operand.to_string(), "$order.id[0]");
    }
}
