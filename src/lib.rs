pub mod analyzer;
pub mod ast;
pub mod coerce;
pub mod data_object;
pub mod declaration;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod syntax;
pub mod variables;

#[cfg(feature = "cli")]
pub mod cli;

pub use analyzer::{Analyzer, Session};
pub use ast::{Assertion, AssertionForm, Assertions, Declaration, FormKind, Literal, Model, Operand, Step, Token};
pub use data_object::{DataObject, XmlError};
pub use diagnostics::{Diagnostic, ROOT_TOKEN};
pub use error::{AssertionError, DeclarationError, InputError, SourceError, SpeclError};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, Position};
pub use parser::{Parser, SyntaxErrors, parse};
pub use variables::{Binding, VariableStore};
