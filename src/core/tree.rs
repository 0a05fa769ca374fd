use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A plain field mapping as handed to `fill` or returned by a capability.
pub type Fields = Map<String, Value>;

/// Nested attribute store addressed by dot-delimited paths.
///
/// Keys keep their insertion order (the map is backed by `serde_json`'s
/// order-preserving map), but that order carries no meaning until the tree
/// is passed through a [`KeyOrder`](super::KeyOrder) on export.
///
/// ```
/// use szamla::core::AttributeTree;
/// use serde_json::json;
///
/// let mut tree = AttributeTree::new();
/// tree.set("header.invoiceNumber", "A/2024/1");
/// assert_eq!(tree.get("header.invoiceNumber"), Some(&json!("A/2024/1")));
/// assert!(tree.get("header.orderNumber").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeTree(Fields);

impl AttributeTree {
    pub fn new() -> Self {
        Self(Fields::new())
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self(fields)
    }

    /// Look up a path. `None` means absent; a stored `null` is `Some(Value::Null)`.
    ///
    /// Numeric segments index into arrays (`items.0.name`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = child(current, segment)?;
        }
        Some(current)
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Store a value at `path`, creating intermediate mappings as needed.
    ///
    /// A scalar sitting on an intermediate segment is replaced by a mapping.
    /// An empty path is ignored.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        if path.is_empty() {
            return;
        }
        let segments: Vec<&str> = path.split('.').collect();
        set_in(&mut self.0, &segments, value.into());
    }

    /// Chaining form of [`set`](Self::set).
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.set(path, value);
        self
    }

    /// Remove the value at `path`, returning it if it was present.
    ///
    /// Parent mappings are left in place even when they become empty.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        match path.rsplit_once('.') {
            None => self.0.shift_remove(path),
            Some((parent, leaf)) => match self.get_mut(parent)? {
                Value::Object(map) => map.shift_remove(leaf),
                _ => None,
            },
        }
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get_mut(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get_mut(segment)?,
                Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Top-level keys in their current order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_fields(&self) -> &Fields {
        &self.0
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Fields> for AttributeTree {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

fn set_in(map: &mut Fields, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.insert((*head).to_string(), value);
        return;
    }
    let slot = map
        .entry((*head).to_string())
        .or_insert_with(|| Value::Object(Fields::new()));
    set_in_value(slot, rest, value);
}

fn set_in_value(slot: &mut Value, segments: &[&str], value: Value) {
    if let Value::Array(items) = slot {
        let index = segments[0]
            .parse::<usize>()
            .ok()
            .filter(|index| *index < items.len());
        if let Some(index) = index {
            let rest = &segments[1..];
            if rest.is_empty() {
                items[index] = value;
            } else {
                set_in_value(&mut items[index], rest, value);
            }
            return;
        }
    }
    if !slot.is_object() {
        *slot = Value::Object(Fields::new());
    }
    if let Value::Object(map) = slot {
        set_in(map, segments, value);
    }
}
