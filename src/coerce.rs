//! Comparison rules shared by every assertion form.
//!
//! Numbers compare exactly through [`Decimal`]. A string holding a decimal
//! number is numeric when it meets a number, and two numeric strings are
//! equal and ordered by value (`"3"` equals `"3.0"`). `"true"`/`"false"` equal the matching boolean. Null equals
//! only null; sequences and mappings compare element by element.

use std::cmp::Ordering;

use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::DataObject;

fn number(node: &DataObject) -> Option<Decimal> {
    match node {
        DataObject::Integer(n) => Some(Decimal::from(*n)),
        DataObject::Float(n) => Decimal::from_f64(*n),
        _ => None,
    }
}

fn numeric_text(text: &str) -> Option<Decimal> {
    text.trim().parse::<Decimal>().ok()
}

/// Numeric value for ordering: numbers and numeric strings.
fn ordinal(node: &DataObject) -> Option<Decimal> {
    match node {
        DataObject::String(s) => numeric_text(s),
        _ => number(node),
    }
}

fn float(node: &DataObject) -> Option<f64> {
    match node {
        DataObject::Integer(n) => Some(*n as f64),
        DataObject::Float(n) => Some(*n),
        _ => None,
    }
}

fn bool_text(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Equality with the coercions described at module level.
pub fn loose_equals(left: &DataObject, right: &DataObject) -> bool {
    use DataObject::*;

    match (left, right) {
        (Null, Null) => true,
        (Null, _) | (_, Null) => false,
        (Boolean(a), Boolean(b)) => a == b,
        (Boolean(b), String(s)) | (String(s), Boolean(b)) => bool_text(s) == Some(*b),
        (String(a), String(b)) => match (numeric_text(a), numeric_text(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Integer(_) | Float(_), Integer(_) | Float(_)) => match (number(left), number(right)) {
            (Some(a), Some(b)) => a == b,
            // NaN and infinities have no decimal form
            _ => float(left) == float(right),
        },
        (Integer(_) | Float(_), String(s)) | (String(s), Integer(_) | Float(_)) => {
            let n = if matches!(left, String(_)) { right } else { left };
            match (number(n), numeric_text(s)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Sequence(a), Sequence(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_equals(x, y)),
        (Mapping(a), Mapping(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|((ka, va), (kb, vb))| ka == kb && loose_equals(va, vb))
        }
        _ => false,
    }
}

/// Orders two scalars: numerically when both are numeric, otherwise as
/// strings when both are strings. `None` when they cannot be ordered.
pub fn compare(left: &DataObject, right: &DataObject) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (ordinal(left), ordinal(right)) {
        return Some(a.cmp(&b));
    }
    match (left, right) {
        (DataObject::String(a), DataObject::String(b)) => Some(a.cmp(b)),
        (DataObject::Integer(_) | DataObject::Float(_), DataObject::Integer(_) | DataObject::Float(_)) => {
            float(left)?.partial_cmp(&float(right)?)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_exactly() {
        assert!(loose_equals(&DataObject::Integer(3), &DataObject::Float(3.0)));
        assert!(loose_equals(&DataObject::Float(0.1), &DataObject::from("0.10")));
        assert!(!loose_equals(&DataObject::Integer(3), &DataObject::from("three")));
    }

    #[test]
    fn numeric_strings_equal_by_value() {
        let three = DataObject::from("3");
        let three_point_oh = DataObject::from("3.0");
        assert!(loose_equals(&three, &three_point_oh));
        assert_eq!(compare(&three, &three_point_oh), Some(Ordering::Equal));
        assert!(!loose_equals(&DataObject::from("3"), &DataObject::from("3a")));
        assert!(!loose_equals(&DataObject::from("ok"), &DataObject::from("OK")));
    }

    #[test]
    fn booleans_match_their_text() {
        assert!(loose_equals(&DataObject::from("true"), &DataObject::Boolean(true)));
        assert!(!loose_equals(&DataObject::from("True"), &DataObject::Boolean(true)));
    }

    #[test]
    fn null_equals_only_null() {
        assert!(loose_equals(&DataObject::Null, &DataObject::Null));
        assert!(!loose_equals(&DataObject::Null, &DataObject::from("")));
        assert!(!loose_equals(&DataObject::from("null"), &DataObject::Null));
    }

    #[test]
    fn numeric_strings_order_numerically() {
        assert_eq!(compare(&DataObject::from("10"), &DataObject::from("9")), Some(Ordering::Greater));
        assert_eq!(compare(&DataObject::from("b"), &DataObject::from("a")), Some(Ordering::Greater));
        assert_eq!(compare(&DataObject::from("abc"), &DataObject::Integer(1)), None);
        assert_eq!(compare(&DataObject::Boolean(true), &DataObject::Boolean(false)), None);
    }
}
