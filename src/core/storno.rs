use chrono::NaiveDate;

use super::alias::AliasMap;
use super::computed::{
    Computed, DATE_FORMAT, InvoiceableCustomer, InvoiceableMerchant, date_on_read, format_date,
};
use super::document::{Document, DocumentKind, DocumentSchema};
use super::error::{Section, SzamlaError};
use super::order::KeyOrder;
use super::tree::AttributeTree;
use super::validation::{Rule, RuleSet, ValueType};

const STRING: &[Rule] = &[Rule::Type(ValueType::String)];
const DATE: &[Rule] = &[Rule::DateFormat(DATE_FORMAT)];

pub(crate) const STORNO_SCHEMA: DocumentSchema = DocumentSchema {
    kind: DocumentKind::StornoInvoice,
    aliases: AliasMap::new(
        DocumentKind::StornoInvoice,
        &[
            ("customerEmail", "customer.email"),
            ("merchantEmailReplyto", "merchant.emailReplyto"),
            ("merchantEmailSubject", "merchant.emailSubject"),
            ("merchantEmailText", "merchant.emailText"),
            ("invoiceNumber", "header.invoiceNumber"),
            ("signatureDate", "header.signatureDate"),
            ("settlementDate", "header.settlementDate"),
            ("orderNumber", "header.orderNumber"),
            ("username", "settings.username"),
            ("password", "settings.password"),
            ("eInvoice", "settings.eInvoice"),
            ("downloadInvoice", "settings.downloadInvoice"),
        ],
    ),
    computed: &[
        ("header.signatureDate", Computed::Date),
        ("header.settlementDate", Computed::Date),
        ("customer", Computed::Customer),
        ("merchant", Computed::Merchant),
    ],
    order: KeyOrder::new(&[
        ("", &["settings", "header", "merchant", "customer"]),
        (
            "settings",
            &["username", "password", "eInvoice", "downloadInvoice"],
        ),
        (
            "header",
            &["invoiceNumber", "signatureDate", "settlementDate", "orderNumber"],
        ),
        ("merchant", &["emailReplyto", "emailSubject", "emailText"]),
    ]),
    sections: &[
        RuleSet::new(
            Section::Merchant,
            &[
                ("merchant.emailReplyto", STRING),
                ("merchant.emailSubject", STRING),
                ("merchant.emailText", STRING),
            ],
        ),
        RuleSet::new(Section::Customer, &[("customer.email", &[Rule::Email])]),
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
                ("header.orderNumber", STRING),
            ],
        ),
    ],
};

/// Cancellation (storno) of a previously issued invoice.
///
/// ```
/// use szamla::core::*;
/// use serde_json::json;
///
/// let mut storno = StornoInvoice::new();
/// storno.set("invoiceNumber", "E-2024-17").unwrap();
/// storno.set("eInvoice", false).unwrap();
/// storno.validate().unwrap();
///
/// let tree = storno.to_value();
/// assert_eq!(tree["header"]["invoiceNumber"], json!("E-2024-17"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StornoInvoice {
    attributes: AttributeTree,
}

impl StornoInvoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge customer data through the document's aliases.
    pub fn set_customer<C: InvoiceableCustomer + ?Sized>(&mut self, customer: &C) -> Result<(), SzamlaError> {
        self.fill(customer.invoice_customer_data())
    }

    /// Merge merchant data through the document's aliases.
    pub fn set_merchant<M: InvoiceableMerchant + ?Sized>(&mut self, merchant: &M) -> Result<(), SzamlaError> {
        self.fill(merchant.invoice_merchant_data())
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.attributes.get("header.invoiceNumber")?.as_str()
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

impl Document for StornoInvoice {
    const SCHEMA: &'static DocumentSchema = &STORNO_SCHEMA;

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
