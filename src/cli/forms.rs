//! Form catalogue printed by `specl forms`

use crate::FormKind;

/// Call shape of a form, e.g. `between(operand, low, high)`
pub fn form_usage(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Exists => "exists(path)",
        FormKind::Size => "size(path, count)",
        FormKind::Equals => "equals(left, right)",
        FormKind::NotEquals => "not-equals(left, right)",
        FormKind::EqualsIgnoreCase => "equals-ignore-case(left, right)",
        FormKind::Contains => "contains(collection, item)",
        FormKind::StartsWith => "starts-with(text, prefix)",
        FormKind::EndsWith => "ends-with(text, suffix)",
        FormKind::Matches => "matches(text, \"pattern\")",
        FormKind::GreaterThan => "greater-than(left, right)",
        FormKind::GreaterOrEqual => "greater-or-equal(left, right)",
        FormKind::LessThan => "less-than(left, right)",
        FormKind::LessOrEqual => "less-or-equal(left, right)",
        FormKind::Between => "between(value, low, high)",
    }
}

fn summary(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Exists => "path matches at least one node",
        FormKind::Size => "number of members equals count",
        FormKind::Equals => "values are equal after coercion",
        FormKind::NotEquals => "values differ after coercion",
        FormKind::EqualsIgnoreCase => "scalar texts are equal ignoring case",
        FormKind::Contains => "sequence holds item, or mapping has key item",
        FormKind::StartsWith => "scalar text starts with prefix",
        FormKind::EndsWith => "scalar text ends with suffix",
        FormKind::Matches => "regular expression matches anywhere in the text",
        FormKind::GreaterThan => "left orders after right",
        FormKind::GreaterOrEqual => "left does not order before right",
        FormKind::LessThan => "left orders before right",
        FormKind::LessOrEqual => "left does not order after right",
        FormKind::Between => "low <= value <= high",
    }
}

/// Get the forms overview
pub fn get_forms_overview() -> String {
    let mut out = String::from("SPECL ASSERTION FORMS\n\n");
    for kind in FormKind::ALL {
        out.push_str(&format!("  {:<34}{}\n", form_usage(kind), summary(kind)));
    }
    out.push_str(OVERVIEW_FOOTER);
    out
}

const OVERVIEW_FOOTER: &str = r#"
QUANTIFIERS
  all F(path, ...)                  every member of path satisfies F (true when empty)
  any F(path, ...)                  some member of path satisfies F (false when empty)
    Not allowed on exists and size.

OPERANDS
  order.items[0].price              path from the document root
  $ / $.order / ["odd key"]         explicit root, quoted keys
  items[*]                          every child
  order.item[1]                     second value of a repeated key or array
  $name / name                      a variable bound by 'let name = path;'
  "text" 3 1.5 true null            literals

COERCION
  - Numbers compare exactly; numeric strings compare as numbers against numbers
    and against each other ("3" equals "3.0")
  - "true"/"false" equal the matching boolean
  - null equals only null
  - Ordering needs two numbers or two strings

COMBINING
  and, or, not, ( ... )             short-circuit boolean logic
  F(...); G(...)                    every top-level statement must hold
"#;
