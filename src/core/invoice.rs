use chrono::NaiveDate;
use serde_json::Value;

use super::alias::AliasMap;
use super::computed::{
    Computed, DATE_FORMAT, InvoiceableCustomer, InvoiceableItem, InvoiceableMerchant,
    date_on_read, format_date,
};
use super::document::{Document, DocumentKind, DocumentSchema};
use super::error::{Section, SzamlaError};
use super::order::KeyOrder;
use super::tree::AttributeTree;
use super::validation::{Rule, RuleSet, ValueType};

const STRING: &[Rule] = &[Rule::Type(ValueType::String)];
const REQUIRED_STRING: &[Rule] = &[Rule::Required, Rule::Type(ValueType::String)];
const REQUIRED_NUMBER: &[Rule] = &[Rule::Required, Rule::Type(ValueType::Number)];
const DATE: &[Rule] = &[Rule::DateFormat(DATE_FORMAT)];

pub(crate) const INVOICE_SCHEMA: DocumentSchema = DocumentSchema {
    kind: DocumentKind::Invoice,
    aliases: AliasMap::new(
        DocumentKind::Invoice,
        &[
            ("customerName", "customer.name"),
            ("customerZip", "customer.zip"),
            ("customerCity", "customer.city"),
            ("customerAddress", "customer.address"),
            ("customerEmail", "customer.email"),
            ("customerSendEmail", "customer.sendEmail"),
            ("customerTaxNumber", "customer.taxNumber"),
            ("merchantBank", "merchant.bank"),
            ("merchantBankAccount", "merchant.bankAccount"),
            ("merchantEmailReplyto", "merchant.emailReplyto"),
            ("merchantEmailSubject", "merchant.emailSubject"),
            ("merchantEmailText", "merchant.emailText"),
            ("invoiceNumber", "header.invoiceNumber"),
            ("signatureDate", "header.signatureDate"),
            ("settlementDate", "header.settlementDate"),
            ("dueDate", "header.dueDate"),
            ("paymentMethod", "header.paymentMethod"),
            ("currency", "header.currency"),
            ("language", "header.language"),
            ("comment", "header.comment"),
            ("orderNumber", "header.orderNumber"),
            ("username", "settings.username"),
            ("password", "settings.password"),
            ("eInvoice", "settings.eInvoice"),
            ("downloadInvoice", "settings.downloadInvoice"),
            ("responseVersion", "settings.responseVersion"),
        ],
    ),
    computed: &[
        ("header.signatureDate", Computed::Date),
        ("header.settlementDate", Computed::Date),
        ("header.dueDate", Computed::Date),
        ("customer", Computed::Customer),
        ("merchant", Computed::Merchant),
        ("items", Computed::Items),
    ],
    order: KeyOrder::new(&[
        ("", &["settings", "header", "merchant", "customer", "items"]),
        (
            "settings",
            &[
                "username",
                "password",
                "eInvoice",
                "downloadInvoice",
                "responseVersion",
            ],
        ),
        (
            "header",
            &[
                "invoiceNumber",
                "signatureDate",
                "settlementDate",
                "dueDate",
                "paymentMethod",
                "currency",
                "language",
                "comment",
                "orderNumber",
            ],
        ),
        (
            "merchant",
            &["bank", "bankAccount", "emailReplyto", "emailSubject", "emailText"],
        ),
        (
            "customer",
            &["name", "zip", "city", "address", "email", "sendEmail", "taxNumber"],
        ),
        (
            "items.*",
            &[
                "name",
                "quantity",
                "unit",
                "netUnitPrice",
                "vatRate",
                "netPrice",
                "vatAmount",
                "grossAmount",
                "comment",
            ],
        ),
    ]),
    sections: &[
        RuleSet::new(
            Section::Merchant,
            &[
                ("merchant.bank", STRING),
                ("merchant.bankAccount", STRING),
                ("merchant.emailReplyto", STRING),
                ("merchant.emailSubject", STRING),
                ("merchant.emailText", STRING),
            ],
        ),
        RuleSet::new(
            Section::Customer,
            &[
                ("customer.name", REQUIRED_STRING),
                ("customer.zip", REQUIRED_STRING),
                ("customer.city", REQUIRED_STRING),
                ("customer.address", REQUIRED_STRING),
                ("customer.email", &[Rule::Email]),
                ("customer.sendEmail", &[Rule::Type(ValueType::Boolean)]),
                ("customer.taxNumber", STRING),
            ],
        ),
        RuleSet::new(
            Section::OrderDetails,
            &[
                (
                    "settings.eInvoice",
                    &[Rule::Required, Rule::Type(ValueType::Boolean)],
                ),
                ("header.invoiceNumber", STRING),
                ("header.signatureDate", DATE),
                ("header.settlementDate", DATE),
                ("header.dueDate", &[Rule::Required, Rule::DateFormat(DATE_FORMAT)]),
                ("header.paymentMethod", REQUIRED_STRING),
                ("header.currency", REQUIRED_STRING),
                ("header.language", REQUIRED_STRING),
                ("header.comment", STRING),
                ("header.orderNumber", STRING),
                ("items", &[Rule::Required]),
                ("items.*.name", REQUIRED_STRING),
                ("items.*.quantity", REQUIRED_NUMBER),
                ("items.*.unit", REQUIRED_STRING),
                ("items.*.netUnitPrice", REQUIRED_NUMBER),
                ("items.*.vatRate", &[Rule::Required]),
                ("items.*.netPrice", REQUIRED_NUMBER),
                ("items.*.vatAmount", REQUIRED_NUMBER),
                ("items.*.grossAmount", REQUIRED_NUMBER),
            ],
        ),
    ],
};

/// A new invoice to be issued.
///
/// Customer, merchant and item data can come from any type implementing the
/// corresponding `Invoiceable*` trait, or from plain field mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invoice {
    attributes: AttributeTree,
}

impl Invoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_customer<C: InvoiceableCustomer + ?Sized>(&mut self, customer: &C) -> Result<(), SzamlaError> {
        self.fill(customer.invoice_customer_data())
    }

    pub fn set_merchant<M: InvoiceableMerchant + ?Sized>(&mut self, merchant: &M) -> Result<(), SzamlaError> {
        self.fill(merchant.invoice_merchant_data())
    }

    /// Replace all items.
    pub fn set_items<I: InvoiceableItem>(&mut self, items: &[I]) -> Result<(), SzamlaError> {
        let items = items
            .iter()
            .map(|item| Value::Object(item.invoice_item_data()))
            .collect();
        self.set("items", Value::Array(items))
    }

    /// Append one item after the existing ones.
    pub fn add_item<I: InvoiceableItem + ?Sized>(&mut self, item: &I) -> Result<(), SzamlaError> {
        let mut items = match self.attributes.get("items") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        items.push(Value::Object(item.invoice_item_data()));
        self.set("items", Value::Array(items))
    }

    pub fn items(&self) -> &[Value] {
        match self.attributes.get("items") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// Signature date; today unless set.
    pub fn signature_date(&self) -> Result<NaiveDate, SzamlaError> {
        date_on_read(&self.attributes, "header.signatureDate")
    }

    pub fn set_signature_date(&mut self, date: NaiveDate) {
        self.attributes.set("header.signatureDate", format_date(date));
    }

    /// Settlement date; today unless set.
    pub fn settlement_date(&self) -> Result<NaiveDate, SzamlaError> {
        date_on_read(&self.attributes, "header.settlementDate")
    }

    pub fn set_settlement_date(&mut self, date: NaiveDate) {
        self.attributes.set("header.settlementDate", format_date(date));
    }

    /// Payment due date; today unless set.
    pub fn due_date(&self) -> Result<NaiveDate, SzamlaError> {
        date_on_read(&self.attributes, "header.dueDate")
    }

    pub fn set_due_date(&mut self, date: NaiveDate) {
        self.attributes.set("header.dueDate", format_date(date));
    }

    pub fn validate_merchant(&self) -> Result<(), SzamlaError> {
        self.validate_section(Section::Merchant)
    }

    pub fn validate_customer(&self) -> Result<(), SzamlaError> {
        self.validate_section(Section::Customer)
    }

    pub fn validate_order_details(&self) -> Result<(), SzamlaError> {
        self.validate_section(Section::OrderDetails)
    }
}

impl Document for Invoice {
    const SCHEMA: &'static DocumentSchema = &INVOICE_SCHEMA;

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
    use crate::core::item::InvoiceItem;
    use crate::core::tree::Fields;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    struct Customer {
        name: &'static str,
        email: &'static str,
    }

    impl InvoiceableCustomer for Customer {
        fn invoice_customer_data(&self) -> Fields {
            fields(json!({
                "customerName": self.name,
                "customerZip": "1051",
                "customerCity": "Budapest",
                "customerAddress": "Nádor utca 1.",
                "customerEmail": self.email,
            }))
        }
    }

    fn complete_invoice() -> Invoice {
        let mut invoice = Invoice::from_fields(fields(json!({
            "paymentMethod": "átutalás",
            "currency": "HUF",
            "language": "hu",
            "dueDate": "2024-07-15",
            "eInvoice": false,
        })))
        .unwrap();
        invoice
            .set_customer(&Customer {
                name: "Vevő Kft.",
                email: "vevo@example.hu",
            })
            .unwrap();
        invoice
            .add_item(&InvoiceItem::new("Consulting", dec!(2), "hour", dec!(10000)))
            .unwrap();
        invoice
    }

    #[test]
    fn alias_table_has_no_duplicates() {
        assert!(INVOICE_SCHEMA.aliases.duplicates().is_empty());
    }

    #[test]
    fn complete_invoice_validates() {
        complete_invoice().validate().unwrap();
    }

    #[test]
    fn customer_section_requires_address_fields() {
        let mut invoice = complete_invoice();
        invoice.set("customerCity", "").unwrap();
        let err = invoice.validate().unwrap_err();
        let failure = err.section_failure().unwrap();
        assert_eq!(failure.section, Section::Customer);
        assert_eq!(failure.fields(), vec!["customer.city"]);
    }

    #[test]
    fn missing_items_fail_order_details() {
        let mut invoice = complete_invoice();
        invoice.set("items", Value::Null).unwrap();
        assert!(invoice.items().is_empty());
        let failure = invoice.validate_order_details().unwrap_err();
        assert_eq!(failure.section_failure().unwrap().fields(), vec!["items"]);
    }

    #[test]
    fn items_must_be_mappings() {
        let mut invoice = Invoice::new();
        let err = invoice.set("items", json!([{"name": "ok"}, 5])).unwrap_err();
        assert!(matches!(err, SzamlaError::MalformedInput { ref field, .. } if field == "items.1"));
    }

    #[test]
    fn add_item_appends() {
        let mut invoice = complete_invoice();
        invoice
            .add_item(&InvoiceItem::new("Travel", dec!(1), "pc", dec!(5000)).vat_rate("AAM"))
            .unwrap();
        assert_eq!(invoice.items().len(), 2);
        assert_eq!(invoice.items()[1]["name"], json!("Travel"));
    }

    #[test]
    fn overflowing_item_fails_order_details() {
        let mut invoice = complete_invoice();
        invoice
            .add_item(&InvoiceItem::new("Huge", rust_decimal::Decimal::MAX, "pc", dec!(2)))
            .unwrap();
        let err = invoice.validate_order_details().unwrap_err();
        let fields = err.section_failure().unwrap().fields();
        assert!(fields.contains(&"items.1.netPrice"));
        assert!(fields.contains(&"items.1.grossAmount"));
        assert!(!fields.iter().any(|f| f.starts_with("items.0")));
    }

    #[test]
    fn export_orders_items_and_header() {
        let mut invoice = complete_invoice();
        invoice.set("items.0.comment", "first").unwrap();
        invoice.set("orderNumber", "WEB-1").unwrap();
        let tree = invoice.to_value();

        let keys = |v: &Value| v.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys(&tree), vec!["settings", "header", "customer", "items"]);
        assert_eq!(
            keys(&tree["header"]),
            vec![
                "signatureDate",
                "settlementDate",
                "dueDate",
                "paymentMethod",
                "currency",
                "language",
                "orderNumber"
            ]
        );
        assert_eq!(
            keys(&tree["customer"]),
            vec!["name", "zip", "city", "address", "email"]
        );
        assert_eq!(keys(&tree["items"][0]).last().map(String::as_str), Some("comment"));
    }
}
