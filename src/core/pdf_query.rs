use super::alias::AliasMap;
use super::document::{Document, DocumentKind, DocumentSchema};
use super::error::{Section, SzamlaError};
use super::order::KeyOrder;
use super::tree::AttributeTree;
use super::validation::{Rule, RuleSet, ValueType};

pub(crate) const PDF_QUERY_SCHEMA: DocumentSchema = DocumentSchema {
    kind: DocumentKind::PdfQuery,
    aliases: AliasMap::new(
        DocumentKind::PdfQuery,
        &[
            ("invoiceNumber", "invoiceNumber"),
            ("orderNumber", "orderNumber"),
            ("username", "username"),
            ("password", "password"),
            ("responseVersion", "responseVersion"),
        ],
    ),
    computed: &[],
    order: KeyOrder::new(&[(
        "",
        &[
            "username",
            "password",
            "invoiceNumber",
            "orderNumber",
            "responseVersion",
        ],
    )]),
    sections: &[RuleSet::new(
        Section::Query,
        &[
            (
                "invoiceNumber",
                &[Rule::Required, Rule::Type(ValueType::String)],
            ),
            ("orderNumber", &[Rule::Type(ValueType::String)]),
        ],
    )],
};

/// Request for the PDF of an already issued invoice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfQuery {
    attributes: AttributeTree,
}

impl PdfQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query by invoice number.
    pub fn for_invoice(invoice_number: impl Into<String>) -> Self {
        let mut query = Self::new();
        query
            .attributes
            .set("invoiceNumber", invoice_number.into());
        query
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.attributes.get("invoiceNumber")?.as_str()
    }

    pub fn validate_query(&self) -> Result<(), SzamlaError> {
        self.validate_section(Section::Query)
    }
}

impl Document for PdfQuery {
    const SCHEMA: &'static DocumentSchema = &PDF_QUERY_SCHEMA;

    fn from_tree(tree: AttributeTree) -> Self {
        Self { attributes: tree }
    }

    fn tree(&self) -> &AttributeTree {
        &self.attributes
    }

    fn tree_mut(&mut self) -> &mut AttributeTree {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn invoice_number_is_required() {
        let mut query = PdfQuery::new();
        query.set("orderNumber", "X1").unwrap();
        let err = query.validate().unwrap_err();
        let failure = err.section_failure().unwrap();
        assert_eq!(failure.section, Section::Query);
        assert_eq!(failure.errors[0].rule, Rule::Required);
        assert_eq!(failure.fields(), vec!["invoiceNumber"]);

        query.set("invoiceNumber", "E-2024-1").unwrap();
        query.validate().unwrap();
    }

    #[test]
    fn export_is_flat_and_ordered() {
        let mut query = PdfQuery::for_invoice("E-2024-1");
        query.set("responseVersion", 1).unwrap();
        query.set("username", "user").unwrap();
        let tree = query.to_value();
        let keys: Vec<&str> = tree.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["username", "invoiceNumber", "responseVersion"]);
        assert_eq!(tree["responseVersion"], json!(1));
    }

    #[test]
    fn has_no_computed_dates() {
        let query = PdfQuery::for_invoice("E-1");
        assert_eq!(query.date("signatureDate").unwrap(), None);
        assert_eq!(query.read("invoiceNumber"), Some(Value::from("E-1")));
        assert_eq!(query.invoice_number(), Some("E-1"));
    }
}
