//! # Specl - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for Specl, a small
//! assertion language that checks expectations against a structured document
//! (XML, JSON or a multi-valued key/value map).
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[steps]** - Path steps used to navigate the document
//! - **[assertions]** - Operands, assertion forms and the assertion tree
//! - **[model]** - Complete source: declarations plus assertions
//!
//! ## Quick Start
//!
//! ```text
//! let s = status;
//! let items = order.items[*];
//!
//! equals(s, "ok") and all greater-than(items.price, 0)
//! ```
//!
//! ## Core Concepts
//!
//! ### Declarations
//!
//! `let name = path;` resolves `path` against the input once and binds every
//! matched node to `name`. Declarations come before assertions, and a name
//! may only be declared once.
//!
//! ### Assertions
//!
//! A leaf assertion applies a form (`equals`, `exists`, `matches`, ...) to one
//! or two operands plus the form's literal arguments. Leaves combine with
//! `and`, `or`, `not` and parentheses. Several top-level assertion statements
//! separated by `;` must all hold.
//!
//! ### Operands
//!
//! - **Paths** `order.items[0].price` - resolved fresh against the document
//! - **Variables** `$items` (or a bare declared name) - looked up in the store
//! - **Literals** `"ok"`, `3`, `1.5`, `true`, `null`
pub mod assertions;
pub mod model;
pub mod steps;
pub mod tokens;

pub use assertions::{Assertion, AssertionForm, Assertions, FormKind, Literal, Operand, Quantifier, Signature};
pub use model::{Declaration, Model};
pub use steps::{DisplayPath, Path, Step};
pub use tokens::Token;
