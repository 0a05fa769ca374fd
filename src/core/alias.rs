use super::document::DocumentKind;
use super::error::SzamlaError;

/// Static mapping from public field names to internal tree paths.
///
/// One table exists per document kind. Names not found in the table are not
/// an error for `fill`: they are written as literal internal paths.
#[derive(Debug, Clone, Copy)]
pub struct AliasMap {
    kind: DocumentKind,
    entries: &'static [(&'static str, &'static str)],
}

impl AliasMap {
    pub const fn new(kind: DocumentKind, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { kind, entries }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Internal path for a public name, if the name is an alias.
    pub fn lookup(&self, public_name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(alias, _)| *alias == public_name)
            .map(|(_, path)| *path)
    }

    /// Like [`lookup`](Self::lookup), but an unknown name is an error.
    pub fn resolve(&self, public_name: &str) -> Result<&'static str, SzamlaError> {
        self.lookup(public_name)
            .ok_or_else(|| SzamlaError::UnknownAlias {
                document: self.kind,
                name: public_name.to_string(),
            })
    }

    /// Path a raw `fill` key writes to: the alias target, or the key itself.
    pub fn target<'a>(&self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Public names that appear more than once in the table.
    pub fn duplicates(&self) -> Vec<&'static str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut duplicates = Vec::new();
        for (alias, _) in self.entries {
            if seen.contains(alias) {
                if !duplicates.contains(alias) {
                    duplicates.push(*alias);
                }
            } else {
                seen.push(*alias);
            }
        }
        duplicates
    }
}
