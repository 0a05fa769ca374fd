use std::fmt;

use thiserror::Error;

use super::document::DocumentKind;
use super::validation::Rule;

/// Errors that can occur while filling, validating or sending a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SzamlaError {
    /// A public field name has no entry in the document's alias table.
    ///
    /// Alias tables are static, so this points at a programming error
    /// rather than bad user input.
    #[error("unknown alias '{name}' for {document} document")]
    UnknownAlias { document: DocumentKind, name: String },

    /// A validation section failed. Only the first failing section is reported.
    #[error("{0}")]
    Validation(SectionFailure),

    /// A computed field rejected its input at assignment time.
    #[error("malformed value for '{field}': {reason}")]
    MalformedInput { field: String, reason: String },

    /// The client has no username or password configured.
    #[error("missing username and password")]
    MissingCredentials,

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Transport-level failure talking to the API.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with an error code header.
    #[error("API error {code}: {message}")]
    Api { code: u32, message: String },
}

/// A single violated rule at a concrete tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "merchant.emailReplyto").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// The rule that failed.
    pub rule: Rule,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule, self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, rule: Rule) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule,
        }
    }
}

/// Named subset of a document's schema that is validated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Merchant,
    Customer,
    OrderDetails,
    Query,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Self::Merchant => "merchant",
            Self::Customer => "customer",
            Self::OrderDetails => "order-details",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Violations of the first section that failed, in rule declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub section: Section,
    pub errors: Vec<ValidationError>,
}

impl SectionFailure {
    /// Distinct violated paths, in the order they were reported.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }
}

impl fmt::Display for SectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid data ({})", self.fields().join(", "))
    }
}

impl From<SectionFailure> for SzamlaError {
    fn from(failure: SectionFailure) -> Self {
        Self::Validation(failure)
    }
}

impl SzamlaError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The structured violations, if this is a validation failure.
    pub fn section_failure(&self) -> Option<&SectionFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
