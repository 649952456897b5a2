use std::borrow::Cow;
use std::cmp::Ordering;

use log::debug;
use regex::Regex;

use crate::{
    DataObject,
    ast::{Assertion, AssertionForm, Assertions, FormKind, Literal, Operand, Quantifier, Step},
    coerce::{compare, loose_equals},
    data_object::{index_group, resolve_nodes},
    error::AssertionError,
    variables::VariableStore,
};

impl From<&Literal> for DataObject {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => DataObject::Null,
            Literal::Boolean(b) => DataObject::Boolean(*b),
            Literal::Integer(n) => DataObject::Integer(*n),
            Literal::Float(n) => DataObject::Float(*n),
            Literal::String(s) => DataObject::String(s.clone()),
        }
    }
}

/// Evaluates an assertion tree against one document and one variable store.
///
/// Evaluation only reads its inputs, so the same tree, document and store
/// always give the same verdict.
///
/// # Examples
///
/// ```
/// use specl::{DataObject, Evaluator, VariableStore, parse};
///
/// let doc = DataObject::from_json_str(r#"{"count": 3, "status": "ok"}"#).unwrap();
/// let model = parse(r#"equals(status, "ok") and less-than(count, 5)"#).unwrap();
///
/// let variables = VariableStore::new();
/// let evaluator = Evaluator::new(&doc, &variables);
/// assert!(evaluator.evaluate(&model.assertion_set).unwrap());
/// ```
pub struct Evaluator<'a> {
    data: &'a DataObject,
    variables: &'a VariableStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(data: &'a DataObject, variables: &'a VariableStore) -> Self {
        Evaluator { data, variables }
    }

    /// Evaluates the tree, short-circuiting `and`/`or`.
    ///
    /// Children skipped by short-circuiting are never evaluated, so their
    /// errors are never raised.
    pub fn evaluate(&self, assertions: &Assertions) -> Result<bool, AssertionError> {
        match assertions {
            Assertions::Single(assertion) => self.evaluate_assertion(assertion),
            Assertions::And(children) => {
                for child in children {
                    if !self.evaluate(child)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Assertions::Or(children) => {
                for child in children {
                    if self.evaluate(child)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Assertions::Not(inner) => Ok(!self.evaluate(inner)?),
        }
    }

    /// Evaluates one leaf assertion.
    pub fn evaluate_assertion(&self, assertion: &Assertion) -> Result<bool, AssertionError> {
        let result = self.leaf(assertion)?;
        debug!("{} -> {}", assertion, result);
        Ok(result)
    }

    fn leaf(&self, assertion: &Assertion) -> Result<bool, AssertionError> {
        let form = &assertion.form;
        let left = self.resolve(&assertion.left)?;

        if form.kind.counts_nodes() {
            if assertion.quantifier.is_some() {
                return Err(AssertionError::Malformed(assertion.to_string()));
            }
            return match form.kind {
                FormKind::Exists => Ok(!left.is_empty()),
                _ => {
                    let expected = match argument(form, 0)? {
                        Literal::Integer(n) => *n,
                        _ => return Err(AssertionError::Malformed(assertion.to_string())),
                    };
                    Ok(i64::try_from(members(&left).len()).is_ok_and(|count| count == expected))
                }
            };
        }

        let right = match (&assertion.right, form.kind.signature().operands) {
            (Some(operand), 2) => Some(self.operand_value(form.kind, operand)?),
            (None, 1) => None,
            _ => return Err(AssertionError::Malformed(assertion.to_string())),
        };
        let right = right.as_deref();

        match assertion.quantifier {
            None => {
                let value = single_value(form.kind, &assertion.left, left)?;
                apply(form, &value, right)
            }
            Some(Quantifier::All) => {
                for member in members(&left) {
                    if !apply(form, member, right)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Some(Quantifier::Any) => {
                for member in members(&left) {
                    if apply(form, member, right)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Every node an operand matches. Paths and variables that match
    /// nothing resolve to an empty list; the caller decides if that is fatal.
    fn resolve(&self, operand: &Operand) -> Result<Vec<Cow<'a, DataObject>>, AssertionError> {
        match operand {
            Operand::Path(path) => Ok(borrowed(self.data.resolve(path))),
            Operand::Variable { name, path } => {
                let binding = self
                    .variables
                    .get(name)
                    .ok_or_else(|| AssertionError::UndefinedVariable(name.clone()))?;
                let nodes: Vec<&DataObject> = binding.nodes().iter().collect();
                // A leading index counts the bound nodes, like `key[index]`.
                let nodes = match path.split_first() {
                    Some((Step::Index(index), rest)) => {
                        resolve_nodes(index_group(&nodes, *index).into_iter().collect(), rest)
                    }
                    _ => resolve_nodes(nodes, path),
                };
                Ok(borrowed(nodes))
            }
            Operand::Literal(literal) => Ok(vec![Cow::Owned(literal.into())]),
        }
    }

    fn operand_value(&self, kind: FormKind, operand: &Operand) -> Result<Cow<'a, DataObject>, AssertionError> {
        let nodes = self.resolve(operand)?;
        single_value(kind, operand, nodes)
    }
}

fn borrowed(nodes: Vec<&DataObject>) -> Vec<Cow<'_, DataObject>> {
    nodes.into_iter().map(Cow::Borrowed).collect()
}

/// One node as itself, several as a sequence, none as an error.
fn single_value<'a>(
    kind: FormKind,
    operand: &Operand,
    mut nodes: Vec<Cow<'a, DataObject>>,
) -> Result<Cow<'a, DataObject>, AssertionError> {
    match nodes.len() {
        0 => Err(AssertionError::EmptyOperand {
            form: kind,
            operand: operand.to_string(),
        }),
        1 => Ok(nodes.remove(0)),
        _ => Ok(Cow::Owned(DataObject::Sequence(
            nodes.into_iter().map(Cow::into_owned).collect(),
        ))),
    }
}

/// The nodes themselves, or the elements of a single sequence node.
fn members<'n>(nodes: &'n [Cow<'_, DataObject>]) -> Vec<&'n DataObject> {
    match nodes {
        [single] => match &**single {
            DataObject::Sequence(items) => items.iter().collect(),
            node => vec![node],
        },
        _ => nodes.iter().map(|node| &**node).collect(),
    }
}

fn argument(form: &AssertionForm, index: usize) -> Result<&Literal, AssertionError> {
    form.args
        .get(index)
        .ok_or_else(|| AssertionError::Malformed(form.to_string()))
}

fn text(kind: FormKind, node: &DataObject) -> Result<String, AssertionError> {
    node.as_text().ok_or(AssertionError::NotScalar {
        form: kind,
        found: node.type_name(),
    })
}

fn order(kind: FormKind, left: &DataObject, right: &DataObject) -> Result<Ordering, AssertionError> {
    compare(left, right).ok_or(AssertionError::IncompatibleOperands {
        form: kind,
        left: left.type_name(),
        right: right.type_name(),
    })
}

/// Applies a form to one left value.
fn apply(form: &AssertionForm, left: &DataObject, right: Option<&DataObject>) -> Result<bool, AssertionError> {
    let kind = form.kind;
    let rhs = || right.ok_or_else(|| AssertionError::Malformed(form.to_string()));

    match kind {
        FormKind::Equals => Ok(loose_equals(left, rhs()?)),
        FormKind::NotEquals => Ok(!loose_equals(left, rhs()?)),
        FormKind::EqualsIgnoreCase => {
            Ok(text(kind, left)?.to_lowercase() == text(kind, rhs()?)?.to_lowercase())
        }
        FormKind::Contains => contains(kind, left, rhs()?),
        FormKind::StartsWith => Ok(text(kind, left)?.starts_with(&text(kind, rhs()?)?)),
        FormKind::EndsWith => Ok(text(kind, left)?.ends_with(&text(kind, rhs()?)?)),
        FormKind::Matches => {
            let pattern = match argument(form, 0)? {
                Literal::String(pattern) => pattern,
                _ => return Err(AssertionError::Malformed(form.to_string())),
            };
            let re = Regex::new(pattern).map_err(|source| AssertionError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            Ok(re.is_match(&text(kind, left)?))
        }
        FormKind::GreaterThan => Ok(order(kind, left, rhs()?)? == Ordering::Greater),
        FormKind::GreaterOrEqual => Ok(order(kind, left, rhs()?)? != Ordering::Less),
        FormKind::LessThan => Ok(order(kind, left, rhs()?)? == Ordering::Less),
        FormKind::LessOrEqual => Ok(order(kind, left, rhs()?)? != Ordering::Greater),
        FormKind::Between => {
            let lower = DataObject::from(argument(form, 0)?);
            let upper = DataObject::from(argument(form, 1)?);
            Ok(order(kind, left, &lower)? != Ordering::Less && order(kind, left, &upper)? != Ordering::Greater)
        }
        FormKind::Exists | FormKind::Size => Err(AssertionError::Malformed(form.to_string())),
    }
}

/// Sequence element membership, or mapping key membership.
fn contains(kind: FormKind, collection: &DataObject, item: &DataObject) -> Result<bool, AssertionError> {
    match collection {
        DataObject::Sequence(items) => Ok(items.iter().any(|element| loose_equals(element, item))),
        DataObject::Mapping(entries) => {
            let key = text(kind, item)?;
            Ok(entries.iter().any(|(k, _)| *k == key))
        }
        other => Err(AssertionError::NotCollection {
            form: kind,
            found: other.type_name(),
        }),
    }
}
