//! CLI support for specl
//!
//! Provides programmatic access to the `specl` commands so other tools can
//! embed them.

mod check;
mod forms;
pub mod logger;

pub use check::{CheckOptions, CheckResult, InputFormat, execute_check, parse_map_lines};
pub use forms::{form_usage, get_forms_overview};

use std::io;

use thiserror::Error;

use crate::error::SpeclError;

/// Process exit code of a passing check.
pub const EXIT_PASS: i32 = 0;
/// The assertions were evaluated and did not hold.
pub const EXIT_FAIL: i32 = 2;
/// Syntax, declaration or assertion error.
pub const EXIT_ERROR: i32 = 1;
/// Missing or unreadable input or source.
pub const EXIT_USAGE: i32 = 3;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Specl(#[from] SpeclError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("map input line {line}: expected 'key=value', found {text:?}")]
    MapLine { line: usize, text: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Specl(SpeclError::Input(_) | SpeclError::Source(_)) => EXIT_USAGE,
            CliError::Specl(_) => EXIT_ERROR,
            CliError::Io(_) | CliError::MapLine { .. } => EXIT_USAGE,
        }
    }
}
