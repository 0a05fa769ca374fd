//! Schema key ordering.
//!
//! The remote XML schema is positional: sibling elements must appear in a
//! fixed order. [`KeyOrder`] rebuilds each declared level of a tree so that
//! declared keys come first in declared order, followed by any undeclared
//! keys in their original order. Nothing is ever dropped.

use serde_json::Value;

use super::tree::{AttributeTree, Fields};

/// Declared key order for the mapping found at one path prefix.
///
/// The root is addressed by the empty prefix; `*` matches every element of
/// an array (`items.*`).
pub type OrderSpec = (&'static str, &'static [&'static str]);

/// Per-level key orders for one document kind.
#[derive(Debug, Clone, Copy)]
pub struct KeyOrder {
    levels: &'static [OrderSpec],
}

impl KeyOrder {
    pub const fn new(levels: &'static [OrderSpec]) -> Self {
        Self { levels }
    }

    /// Declared order for the given prefix, if any.
    pub fn level(&self, prefix: &str) -> Option<&'static [&'static str]> {
        self.levels
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, order)| *order)
    }

    /// Return a reordered copy of `tree`. The input is left untouched.
    pub fn reorder(&self, tree: &AttributeTree) -> AttributeTree {
        AttributeTree::from_fields(self.reorder_fields(tree.as_fields(), ""))
    }

    fn reorder_fields(&self, fields: &Fields, prefix: &str) -> Fields {
        let ordered = match self.level(prefix) {
            Some(order) => sort_keys_to_order(fields, order),
            None => fields.clone(),
        };
        ordered
            .into_iter()
            .map(|(key, value)| {
                let value = self.reorder_value(value, &join(prefix, &key));
                (key, value)
            })
            .collect()
    }

    fn reorder_value(&self, value: Value, path: &str) -> Value {
        match value {
            Value::Object(fields) => Value::Object(self.reorder_fields(&fields, path)),
            Value::Array(items) => {
                let element_path = join(path, "*");
                Value::Array(
                    items
                        .into_iter()
                        .map(|item| self.reorder_value(item, &element_path))
                        .collect(),
                )
            }
            scalar => scalar,
        }
    }
}

/// Reorder one mapping level: `order` first (skipping absent names), then the
/// remaining keys in encounter order.
pub fn sort_keys_to_order(fields: &Fields, order: &[&str]) -> Fields {
    let mut sorted = Fields::new();
    for key in order {
        if let Some(value) = fields.get(*key) {
            sorted.insert((*key).to_string(), value.clone());
        }
    }
    for (key, value) in fields {
        if !sorted.contains_key(key) {
            sorted.insert(key.clone(), value.clone());
        }
    }
    sorted
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
