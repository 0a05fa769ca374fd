//! Document model: attribute tree, aliases, computed fields, key ordering
//! and sectioned validation.
//!
//! Every request document ([`Invoice`], [`StornoInvoice`], [`PdfQuery`]) is
//! an [`AttributeTree`] driven by a static [`DocumentSchema`]. Fields are
//! written through the schema's alias table and computed field transforms,
//! validated section by section, and exported with keys in the order the
//! remote XML schema requires.

mod alias;
mod computed;
mod document;
mod error;
mod invoice;
mod item;
mod order;
mod pdf_query;
mod storno;
mod tree;
mod validation;

pub use alias::AliasMap;
pub use computed::{
    Computed, DATE_FORMAT, InvoiceableCustomer, InvoiceableItem, InvoiceableMerchant,
    date_on_read, date_on_write, format_date, parse_date, today,
};
pub use document::{Document, DocumentKind, DocumentSchema};
pub use error::*;
pub use invoice::Invoice;
pub use item::InvoiceItem;
pub use order::{KeyOrder, OrderSpec, sort_keys_to_order};
pub use pdf_query::PdfQuery;
pub use storno::StornoInvoice;
pub use tree::{AttributeTree, Fields};
pub use validation::{FieldRules, Rule, RuleSet, ValueType, is_valid_email, validate_sections};
