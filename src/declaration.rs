//! Binds `let` declarations to the nodes their paths match.

use std::collections::HashSet;

use log::debug;

use crate::{
    DataObject,
    ast::{Declaration, DisplayPath},
    error::DeclarationError,
    variables::{Binding, VariableStore},
};

/// Resolves every declaration into a fresh store.
pub fn resolve_declarations(declarations: &[Declaration], data: &DataObject) -> Result<VariableStore, DeclarationError> {
    let mut store = VariableStore::new();
    resolve(declarations, data, &mut store)?;
    Ok(store)
}

/// Resolves every declaration into `store`.
///
/// Names are checked for duplicates before any path is resolved, so a
/// duplicate is reported even when an earlier path would not resolve. Every
/// declaration is required: a path matching nothing fails the whole batch.
/// On failure `store` may hold the bindings made before the failing one;
/// callers that expose the store must discard it.
pub fn resolve(declarations: &[Declaration], data: &DataObject, store: &mut VariableStore) -> Result<(), DeclarationError> {
    let mut seen = HashSet::new();
    for declaration in declarations {
        if !seen.insert(declaration.name.as_str()) || store.contains(&declaration.name) {
            return Err(DeclarationError::DuplicateName(declaration.name.clone()));
        }
    }

    for declaration in declarations {
        let nodes = data.resolve(&declaration.path);
        if nodes.is_empty() {
            return Err(DeclarationError::Unresolved {
                name: declaration.name.clone(),
                path: DisplayPath(&declaration.path).to_string(),
            });
        }

        let binding = Binding::new(nodes.into_iter().cloned().collect());
        debug!("{} -> {} node(s)", declaration, binding.len());
        store.declare(declaration.name.clone(), binding)?;
    }
    Ok(())
}
