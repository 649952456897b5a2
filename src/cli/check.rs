//! Run Specl assertions against an input document

use std::fs;
use std::path::PathBuf;

use super::CliError;
use crate::{
    Analyzer, DataObject, VariableStore,
    error::{SourceError, SpeclError},
    parse,
};

/// Shape of the input document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Json,
    Xml,
    /// `key=value` lines; keys may repeat
    Map,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Inline Specl source
    pub source: Option<String>,
    /// File holding the Specl source, used when `source` is not given
    pub source_file: Option<PathBuf>,
    /// Input document text
    pub input: Option<String>,
    pub format: InputFormat,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid { declarations: usize, assertions: usize },
    /// The assertions were evaluated
    Evaluated { passed: bool, variables: VariableStore },
}

/// Parses `key=value` lines. Blank lines and lines starting with `#` are
/// skipped; keys and values are trimmed.
pub fn parse_map_lines(text: &str) -> Result<Vec<(String, DataObject)>, CliError> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                entries.push((key.trim().to_string(), DataObject::from(value.trim())));
            }
            _ => {
                return Err(CliError::MapLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            }
        }
    }
    Ok(entries)
}

fn read_source(options: &CheckOptions) -> Result<String, CliError> {
    match (&options.source, &options.source_file) {
        (Some(source), _) => Ok(source.clone()),
        (None, Some(path)) => fs::read_to_string(path).map_err(|source| {
            SpeclError::from(SourceError::Read {
                path: path.clone(),
                source,
            })
            .into()
        }),
        (None, None) => Err(SpeclError::from(SourceError::Missing).into()),
    }
}

/// Execute a specl check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        let source = read_source(options)?;
        let model = parse(&source).map_err(|errors| SpeclError::Syntax(errors.describe()))?;
        return Ok(CheckResult::SyntaxValid {
            declarations: model.declarations.len(),
            assertions: model.assertion_set.leaf_count(),
        });
    }

    let mut analyzer = Analyzer::new();
    if let Some(input) = &options.input {
        match options.format {
            InputFormat::Json => analyzer.set_json_input(input).map_err(SpeclError::from)?,
            InputFormat::Xml => analyzer.set_xml_input(input).map_err(SpeclError::from)?,
            InputFormat::Map => analyzer.set_map_input(parse_map_lines(input)?),
        }
    }

    match (&options.source, &options.source_file) {
        (Some(source), _) => analyzer.set_source(source.as_str()),
        (None, Some(path)) => analyzer.set_source_path(path.as_path()),
        (None, None) => {}
    }

    let passed = analyzer.evaluate()?;
    Ok(CheckResult::Evaluated {
        passed,
        variables: analyzer.variables().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    #[test]
    fn map_lines_keep_repeats() {
        let entries = parse_map_lines("# header\ntag = a\n\ntag=b\n").unwrap();
        assert_eq!(
            entries,
            vec![
                ("tag".to_string(), DataObject::from("a")),
                ("tag".to_string(), DataObject::from("b")),
            ]
        );
        assert!(matches!(
            parse_map_lines("ok=1\nbroken"),
            Err(CliError::MapLine { line: 2, .. })
        ));
    }

    #[test]
    fn missing_input_is_a_usage_error() {
        let options = CheckOptions {
            source: Some("exists(status)".to_string()),
            ..CheckOptions::default()
        };
        let error = execute_check(&options).unwrap_err();
        assert!(matches!(error, CliError::Specl(SpeclError::Input(InputError::Missing))));
        assert_eq!(error.exit_code(), crate::cli::EXIT_USAGE);
    }

    #[test]
    fn syntax_only_needs_no_input() {
        let options = CheckOptions {
            source: Some("let s = status;\nequals(s, \"ok\") and exists(code)".to_string()),
            syntax_only: true,
            ..CheckOptions::default()
        };
        assert!(matches!(
            execute_check(&options),
            Ok(CheckResult::SyntaxValid { declarations: 1, assertions: 2 })
        ));
    }

    #[test]
    fn evaluates_xml_input() {
        let options = CheckOptions {
            source: Some("equals(response.status, \"ok\")".to_string()),
            input: Some("<response><status>ok</status></response>".to_string()),
            format: InputFormat::Xml,
            ..CheckOptions::default()
        };
        assert!(matches!(
            execute_check(&options),
            Ok(CheckResult::Evaluated { passed: true, .. })
        ));
    }
}
