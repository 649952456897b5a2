//! The evaluation pipeline: parse, bind declarations, evaluate assertions.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use log::{debug, error, info};

use crate::{
    DataObject,
    ast::{Assertions, Declaration, Model},
    declaration,
    error::{AssertionError, DeclarationError, InputError, SourceError, SpeclError},
    evaluator::Evaluator,
    parser::parse,
    variables::{Binding, VariableStore},
};

/// One evaluation over one document, with its own variable store.
///
/// A session starts with an empty store; [`Session::declare`] is the only
/// step that binds names through the write-once path.
pub struct Session<'a> {
    data: &'a DataObject,
    variables: VariableStore,
}

impl<'a> Session<'a> {
    pub fn new(data: &'a DataObject) -> Self {
        Session {
            data,
            variables: VariableStore::new(),
        }
    }

    /// Binds every declaration. On failure the store is left empty.
    pub fn declare(&mut self, declarations: &[Declaration]) -> Result<(), DeclarationError> {
        let resolved = declaration::resolve(declarations, self.data, &mut self.variables);
        if resolved.is_err() {
            self.variables.clear();
        }
        resolved
    }

    pub fn evaluate(&self, assertions: &Assertions) -> Result<bool, AssertionError> {
        Evaluator::new(self.data, &self.variables).evaluate(assertions)
    }

    /// Declares, then evaluates.
    pub fn run(&mut self, model: &Model) -> Result<bool, SpeclError> {
        self.declare(&model.declarations)?;
        Ok(self.evaluate(&model.assertion_set)?)
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn into_variables(self) -> VariableStore {
        self.variables
    }
}

#[derive(Debug, Clone)]
enum Source {
    Text(String),
    File(PathBuf),
}

/// Holds the input document, the Specl source and the variables of the most
/// recent evaluation.
///
/// # Examples
///
/// ```
/// use specl::{Analyzer, DataObject};
///
/// let mut analyzer = Analyzer::new();
/// analyzer.set_map_input([("status", "ok")]);
/// analyzer.set_source("let s = status;\nequals(s, \"ok\")");
///
/// assert!(analyzer.evaluate().unwrap());
/// assert_eq!(
///     analyzer.get_variable("s").and_then(|b| b.as_single()),
///     Some(&DataObject::from("ok"))
/// );
/// ```
#[derive(Debug)]
pub struct Analyzer {
    input: Option<DataObject>,
    source: Option<Source>,
    variables: VariableStore,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        info!("***** Specl Analyser *****");
        Analyzer {
            input: None,
            source: None,
            variables: VariableStore::new(),
        }
    }

    /// Replaces the input document. Variables of earlier evaluations are
    /// dropped with it.
    pub fn set_input(&mut self, input: DataObject) {
        self.input = Some(input);
        self.variables.clear();
    }

    pub fn set_xml_input(&mut self, xml: &str) -> Result<(), InputError> {
        let input = DataObject::from_xml_str(xml).map_err(|e| log_error(InputError::from(e)))?;
        self.set_input(input);
        Ok(())
    }

    pub fn set_json_input(&mut self, json: &str) -> Result<(), InputError> {
        let input = DataObject::from_json_str(json).map_err(|e| log_error(InputError::from(e)))?;
        self.set_input(input);
        Ok(())
    }

    /// Uses `(key, value)` pairs as the input; keys may repeat.
    pub fn set_map_input<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DataObject>,
    {
        self.set_input(DataObject::mapping(entries));
    }

    pub fn input(&self) -> Option<&DataObject> {
        self.input.as_ref()
    }

    /// Specl source used by [`Analyzer::evaluate`].
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(Source::Text(source.into()));
    }

    /// File read by [`Analyzer::evaluate`] each time it runs.
    pub fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        self.source = Some(Source::File(path.into()));
    }

    /// Evaluates the configured source against the input.
    pub fn evaluate(&mut self) -> Result<bool, SpeclError> {
        self.evaluate_source("")
    }

    /// Evaluates `source`, or the configured source when `source` is empty.
    ///
    /// The input is checked before the source. After the declarations bind,
    /// their variables replace the live store, even if an assertion then
    /// fails to evaluate; if they do not bind, the live store is cleared.
    pub fn evaluate_source(&mut self, source: &str) -> Result<bool, SpeclError> {
        let Some(input) = &self.input else {
            return Err(log_error(InputError::Missing).into());
        };

        let text: Cow<'_, str> = match (&self.source, source) {
            (_, source) if !source.is_empty() => Cow::Borrowed(source),
            (Some(Source::Text(text)), _) => Cow::Borrowed(text),
            (Some(Source::File(path)), _) => match fs::read_to_string(path) {
                Ok(text) => Cow::Owned(text),
                Err(source) => {
                    return Err(log_error(SourceError::Read {
                        path: path.clone(),
                        source,
                    })
                    .into());
                }
            },
            (None, _) => return Err(log_error(SourceError::Missing).into()),
        };

        let model = parse(&text).map_err(|errors| {
            let diagnostics = errors.describe();
            error!("SYNTAX ERRORS: {} found", diagnostics.len());
            for diagnostic in &diagnostics {
                error!("{}", diagnostic);
            }
            SpeclError::Syntax(diagnostics)
        })?;

        debug!("INPUT: {}", input);
        info!("{} declarations found", model.declarations.len());
        info!("{} assertions found", model.assertion_set.leaf_count());

        let mut session = Session::new(input);
        if let Err(e) = session.declare(&model.declarations) {
            self.variables.clear();
            return Err(log_error(e).into());
        }

        info!("ASSERTION EVALUATION");
        let result = session.evaluate(&model.assertion_set);
        self.variables = session.into_variables();

        let result = result.map_err(log_error)?;
        info!("RESULT: {}", result);
        Ok(result)
    }

    pub fn get_variable(&self, name: &str) -> Option<&Binding> {
        self.variables.get(name)
    }

    /// Binds `name` in the live store, returning the replaced binding.
    pub fn put_variable(&mut self, name: impl Into<String>, value: impl Into<Binding>) -> Option<Binding> {
        self.variables.put(name, value)
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Binding> {
        self.variables.remove(name)
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }
}

fn log_error<E: std::fmt::Display>(e: E) -> E {
    error!("{}", e);
    e
}
