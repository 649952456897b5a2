//! Error types for every pipeline stage.
//!
//! Each stage fails with its own enum; [`SpeclError`] unifies them for the
//! [`Analyzer`](crate::Analyzer) facade.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ast::FormKind;
use crate::data_object::XmlError;
use crate::diagnostics::Diagnostic;

/// No usable input document.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input not found or not defined")]
    Missing,

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML input: {0}")]
    Xml(#[from] XmlError),
}

/// No usable Specl source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Assertions not found or not defined. Please pass a string or the path of the file containing them.")]
    Missing,

    #[error("cannot read assertions from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A declaration could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("variable '{0}' is already declared")]
    DuplicateName(String),

    #[error("declaration of '{name}' failed: path '{path}' matched nothing")]
    Unresolved { name: String, path: String },
}

/// A leaf assertion could not be evaluated.
#[derive(Debug, Clone, Error)]
pub enum AssertionError {
    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("operand '{operand}' of '{form}' matched nothing")]
    EmptyOperand { form: FormKind, operand: String },

    #[error("'{form}' cannot compare {left} with {right}")]
    IncompatibleOperands {
        form: FormKind,
        left: &'static str,
        right: &'static str,
    },

    #[error("'{form}' expects a non-null scalar, found {found}")]
    NotScalar { form: FormKind, found: &'static str },

    #[error("'{form}' expects a sequence or mapping, found {found}")]
    NotCollection { form: FormKind, found: &'static str },

    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("malformed assertion '{0}'")]
    Malformed(String),
}

/// Any failure of a Specl evaluation.
#[derive(Debug, Error)]
pub enum SpeclError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("SYNTAX ERRORS: {} found", .0.len())]
    Syntax(Vec<Diagnostic>),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

impl SpeclError {
    /// Rendered syntax diagnostics; empty for every other failure.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            SpeclError::Syntax(diagnostics) => diagnostics,
            _ => &[],
        }
    }
}
