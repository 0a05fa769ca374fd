use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::alias::AliasMap;
use super::computed::{Computed, date_on_read, date_on_write, format_date, today, value_kind};
use super::error::{Section, SzamlaError};
use super::order::KeyOrder;
use super::tree::{AttributeTree, Fields};
use super::validation::{RuleSet, validate_sections};

/// The three request documents the invoicing API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    StornoInvoice,
    PdfQuery,
}

impl DocumentKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::StornoInvoice => "storno invoice",
            Self::PdfQuery => "pdf query",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one document kind.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSchema {
    pub kind: DocumentKind,
    pub aliases: AliasMap,
    /// Internal paths with write/read transforms.
    pub computed: &'static [(&'static str, Computed)],
    pub order: KeyOrder,
    /// Validation sections, in evaluation order.
    pub sections: &'static [RuleSet],
}

impl DocumentSchema {
    pub fn computed(&self, path: &str) -> Option<Computed> {
        self.computed
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, computed)| *computed)
    }

    pub fn date_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.computed
            .iter()
            .filter(|(_, computed)| *computed == Computed::Date)
            .map(|(path, _)| *path)
    }

    pub fn section(&self, section: Section) -> Option<&RuleSet> {
        self.sections.iter().find(|rules| rules.section == section)
    }

    /// Write raw fields into `tree`, resolving aliases and computed fields.
    ///
    /// Keys that are not aliases are written as literal internal paths, so a
    /// misspelled alias is stored silently under its own name. Each such key
    /// is logged at debug level.
    pub fn fill(&self, tree: &mut AttributeTree, fields: Fields) -> Result<(), SzamlaError> {
        for (key, value) in fields {
            self.assign(tree, &key, value)?;
        }
        Ok(())
    }

    /// Write one raw field.
    pub fn assign(&self, tree: &mut AttributeTree, key: &str, value: Value) -> Result<(), SzamlaError> {
        let alias = self.aliases.lookup(key);
        if alias.is_none() {
            tracing::debug!(
                document = %self.kind,
                key,
                "no alias matched, writing key as a literal path"
            );
        }
        self.write(tree, alias.unwrap_or(key), value)
    }

    /// True if some computed field sits strictly below `path`.
    fn has_computed_below(&self, path: &str) -> bool {
        self.computed.iter().any(|(computed, _)| {
            computed
                .strip_prefix(path)
                .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Write a value at a resolved internal path, running computed transforms.
    ///
    /// A mapping written above a computed field is split into its children so
    /// every nested computed field still gets its transform.
    fn write(&self, tree: &mut AttributeTree, path: &str, value: Value) -> Result<(), SzamlaError> {
        match self.computed(path) {
            Some(Computed::Date) => match date_on_write(path, &value)? {
                Some(date) => tree.set(path, date),
                None => {
                    tree.remove(path);
                }
            },
            Some(Computed::Customer | Computed::Merchant) => match value {
                Value::Object(fields) => self.fill(tree, fields)?,
                Value::Null => {}
                other => {
                    return Err(SzamlaError::malformed(
                        path,
                        format!("expected a mapping, got {}", value_kind(&other)),
                    ));
                }
            },
            Some(Computed::Items) => match value {
                Value::Array(items) => {
                    if let Some(index) = items.iter().position(|item| !item.is_object()) {
                        return Err(SzamlaError::malformed(
                            format!("{path}.{index}"),
                            format!("expected an item mapping, got {}", value_kind(&items[index])),
                        ));
                    }
                    tree.set(path, Value::Array(items));
                }
                Value::Null => {
                    tree.remove(path);
                }
                other => {
                    return Err(SzamlaError::malformed(
                        path,
                        format!("expected a list of items, got {}", value_kind(&other)),
                    ));
                }
            },
            None => match value {
                Value::Object(children) if self.has_computed_below(path) => {
                    for (child, value) in children {
                        self.write(tree, &format!("{path}.{child}"), value)?;
                    }
                }
                value => tree.set(path, value),
            },
        }
        Ok(())
    }

    /// Exported form of `tree`: date defaults materialized, keys in schema order.
    pub fn export(&self, tree: &AttributeTree) -> AttributeTree {
        let mut snapshot = tree.clone();
        let mut default_date = None;
        for path in self.date_fields() {
            if !snapshot.has(path) {
                let date = default_date.get_or_insert_with(|| format_date(today())).clone();
                snapshot.set(path, date);
            }
        }
        self.order.reorder(&snapshot)
    }
}

/// A request document: an attribute tree driven by a static [`DocumentSchema`].
///
/// Filling may happen any number of times, before or after export. Export
/// and validation never mutate the document.
pub trait Document: Clone {
    const SCHEMA: &'static DocumentSchema;

    /// Adopt a tree as-is, without alias or computed field processing.
    fn from_tree(tree: AttributeTree) -> Self;

    fn tree(&self) -> &AttributeTree;

    fn tree_mut(&mut self) -> &mut AttributeTree;

    fn kind(&self) -> DocumentKind {
        Self::SCHEMA.kind
    }

    fn from_fields(fields: Fields) -> Result<Self, SzamlaError> {
        let mut document = Self::from_tree(AttributeTree::new());
        document.fill(fields)?;
        Ok(document)
    }

    fn fill(&mut self, fields: Fields) -> Result<(), SzamlaError> {
        Self::SCHEMA.fill(self.tree_mut(), fields)
    }

    /// Set one field by public name or internal path.
    fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), SzamlaError> {
        Self::SCHEMA.assign(self.tree_mut(), key, value.into())
    }

    /// The stored value, by public name or internal path.
    fn get(&self, key: &str) -> Option<&Value> {
        self.tree().get(Self::SCHEMA.aliases.target(key))
    }

    /// The value as the document reports it: absent date fields fall back to today.
    fn read(&self, key: &str) -> Option<Value> {
        let path = Self::SCHEMA.aliases.target(key);
        let stored = self.tree().get(path).cloned();
        match Self::SCHEMA.computed(path) {
            Some(Computed::Date) => stored
                .filter(|value| !value.is_null())
                .or_else(|| Some(Value::String(format_date(today())))),
            _ => stored,
        }
    }

    /// Read a computed date field; `Ok(None)` if `key` is not a date field.
    fn date(&self, key: &str) -> Result<Option<NaiveDate>, SzamlaError> {
        let path = Self::SCHEMA.aliases.target(key);
        if Self::SCHEMA.computed(path) == Some(Computed::Date) {
            date_on_read(self.tree(), path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Run one section's rules against the exported tree.
    fn validate_section(&self, section: Section) -> Result<(), SzamlaError> {
        match Self::SCHEMA.section(section) {
            Some(rules) => Ok(rules.validate(&self.to_tree())?),
            None => Ok(()),
        }
    }

    /// Run every section in order; the first failing section is returned.
    fn validate(&self) -> Result<(), SzamlaError> {
        Ok(validate_sections(&self.to_tree(), Self::SCHEMA.sections)?)
    }

    /// The exported tree, re-ordered from the current state on every call.
    fn to_tree(&self) -> AttributeTree {
        Self::SCHEMA.export(self.tree())
    }

    fn to_value(&self) -> Value {
        self.to_tree().into_value()
    }
}
