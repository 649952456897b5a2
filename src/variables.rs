//! Session-scoped variable store.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::{DataObject, error::DeclarationError};

/// Every node a variable is bound to.
///
/// Declarations bind all matched nodes; a single-node binding behaves like a
/// scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding(Vec<DataObject>);

impl Binding {
    pub fn new(nodes: Vec<DataObject>) -> Self {
        Binding(nodes)
    }

    pub fn nodes(&self) -> &[DataObject] {
        &self.0
    }

    /// The bound node when exactly one was matched.
    pub fn as_single(&self) -> Option<&DataObject> {
        match self.0.as_slice() {
            [node] => Some(node),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One node as itself, several as a sequence.
    pub fn into_value(mut self) -> DataObject {
        if self.0.len() == 1 {
            self.0.remove(0)
        } else {
            DataObject::Sequence(self.0)
        }
    }
}

impl From<DataObject> for Binding {
    fn from(node: DataObject) -> Self {
        Binding(vec![node])
    }
}

impl From<Vec<DataObject>> for Binding {
    fn from(nodes: Vec<DataObject>) -> Self {
        Binding(nodes)
    }
}

/// Mapping from variable name to its [`Binding`].
///
/// `declare` is write-once and is what the declaration resolver uses; `put`
/// and `remove` are the external side channel and overwrite freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    bindings: BTreeMap<String, Binding>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a new name. Rebinding an existing name is an error.
    pub fn declare(&mut self, name: impl Into<String>, binding: Binding) -> Result<(), DeclarationError> {
        match self.bindings.entry(name.into()) {
            btree_map::Entry::Occupied(entry) => Err(DeclarationError::DuplicateName(entry.key().clone())),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(binding);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Binds `name`, returning the binding it replaced.
    pub fn put(&mut self, name: impl Into<String>, binding: impl Into<Binding>) -> Option<Binding> {
        self.bindings.insert(name.into(), binding.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_is_write_once() {
        let mut store = VariableStore::new();
        store.declare("s", DataObject::from("ok").into()).unwrap();
        assert_eq!(
            store.declare("s", DataObject::from("again").into()),
            Err(DeclarationError::DuplicateName("s".to_string()))
        );
        assert_eq!(store.get("s").and_then(Binding::as_single), Some(&DataObject::from("ok")));
    }

    #[test]
    fn put_overwrites_and_returns_previous() {
        let mut store = VariableStore::new();
        assert!(store.put("n", DataObject::from(1)).is_none());
        let previous = store.put("n", DataObject::from(2));
        assert_eq!(previous, Some(Binding::from(DataObject::from(1))));
        assert_eq!(store.remove("n"), Some(Binding::from(DataObject::from(2))));
        assert!(store.is_empty());
    }

    #[test]
    fn multi_node_binding_becomes_sequence() {
        let binding = Binding::new(vec![1.into(), 2.into()]);
        assert!(binding.as_single().is_none());
        assert_eq!(binding.into_value(), DataObject::Sequence(vec![1.into(), 2.into()]));
    }
}
