use std::fmt;

/// One segment of a path expression.
///
/// Paths navigate a [`DataObject`](crate::DataObject) from the document root
/// (or from a variable's bound nodes) one step at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Mapping key lookup
    ///
    /// # Examples
    /// - `status` → `Field("status")`
    /// - `order.id` → `[Field("order"), Field("id")]`
    /// - `["content-type"]` → `Field("content-type")`
    Field(String),

    /// Sequence element by zero-based position
    ///
    /// # Examples
    /// - `items[0]` → `[Field("items"), Index(0)]`
    Index(usize),

    /// Every child of a sequence or mapping
    ///
    /// # Examples
    /// - `items[*]`
    /// - `items.*`
    Wildcard,
}

/// A sequence of steps, e.g. `order.items[0].price`.
pub type Path = Vec<Step>;

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Field(name) if is_plain_name(name) => f.write_str(name),
            Step::Field(name) => write!(f, "[{:?}]", name),
            Step::Index(index) => write!(f, "[{}]", index),
            Step::Wildcard => f.write_str("[*]"),
        }
    }
}

/// Renders a path the way it would be written in source.
///
/// The empty path is the document root and renders as `$`.
pub struct DisplayPath<'a>(pub &'a [Step]);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        write_steps(f, self.0, true)
    }
}

/// Writes steps, dot-joining plain field names.
pub(crate) fn write_steps(f: &mut fmt::Formatter<'_>, steps: &[Step], at_head: bool) -> fmt::Result {
    for (i, step) in steps.iter().enumerate() {
        let first = at_head && i == 0;
        match step {
            Step::Field(name) if is_plain_name(name) && !first => write!(f, ".{}", name)?,
            _ => write!(f, "{}", step)?,
        }
    }
    Ok(())
}

/// True when a field name can be written without brackets.
pub(crate) fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    starts_well
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':'))
        && !name.ends_with(['-', ':'])
        && !is_keyword(name)
}

pub(crate) fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "let" | "and" | "or" | "not" | "all" | "any" | "true" | "false" | "null"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_plain_and_bracketed_steps() {
        let path = vec![
            Step::Field("order".to_string()),
            Step::Field("line items".to_string()),
            Step::Index(2),
            Step::Field("price".to_string()),
            Step::Wildcard,
        ];
        assert_eq!(
            DisplayPath(&path).to_string(),
            r#"order["line items"][2].price[*]"#
        );
    }

    #[test]
    fn root_path_renders_as_dollar() {
        assert_eq!(DisplayPath(&[]).to_string(), "$");
    }

    #[test]
    fn keywords_are_bracketed() {
        assert_eq!(Step::Field("and".to_string()).to_string(), r#"["and"]"#);
    }
}
