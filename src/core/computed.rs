//! Fields whose stored or read value is derived rather than stored verbatim.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::error::SzamlaError;
use super::tree::{AttributeTree, Fields};

/// Storage format of every computed date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y.%m.%d.", "%Y/%m/%d"];
const DATETIME_INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// How a computed path transforms values on write and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Computed {
    /// Calendar date stored as `YYYY-MM-DD`; reads default to today.
    Date,
    /// Customer data, merged back through the document's aliases.
    Customer,
    /// Merchant data, merged back through the document's aliases.
    Merchant,
    /// Array of item mappings.
    Items,
}

/// Supplies the customer fields of an invoice.
pub trait InvoiceableCustomer {
    fn invoice_customer_data(&self) -> Fields;
}

/// Supplies the merchant fields of an invoice.
pub trait InvoiceableMerchant {
    fn invoice_merchant_data(&self) -> Fields;
}

/// Supplies one invoice line.
pub trait InvoiceableItem {
    fn invoice_item_data(&self) -> Fields;
}

impl InvoiceableCustomer for Fields {
    fn invoice_customer_data(&self) -> Fields {
        self.clone()
    }
}

impl InvoiceableMerchant for Fields {
    fn invoice_merchant_data(&self) -> Fields {
        self.clone()
    }
}

impl InvoiceableItem for Fields {
    fn invoice_item_data(&self) -> Fields {
        self.clone()
    }
}

impl InvoiceableCustomer for AttributeTree {
    fn invoice_customer_data(&self) -> Fields {
        self.as_fields().clone()
    }
}

impl InvoiceableMerchant for AttributeTree {
    fn invoice_merchant_data(&self) -> Fields {
        self.as_fields().clone()
    }
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a raw date input, discarding any time of day.
///
/// Accepts `YYYY-MM-DD`, `YYYY.MM.DD(.)`, `YYYY/MM/DD`, `YYYY-MM-DD HH:MM:SS`,
/// RFC 3339 timestamps and integer unix timestamps. `null` yields `None`.
pub fn parse_date(field: &str, raw: &Value) -> Result<Option<NaiveDate>, SzamlaError> {
    match raw {
        Value::Null => Ok(None),
        Value::String(s) => parse_date_str(s.trim())
            .map(Some)
            .ok_or_else(|| SzamlaError::malformed(field, format!("'{s}' is not a date"))),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| Some(dt.date_naive()))
            .ok_or_else(|| SzamlaError::malformed(field, format!("{n} is not a unix timestamp"))),
        other => Err(SzamlaError::malformed(
            field,
            format!("expected a date string, got {}", value_kind(other)),
        )),
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_INPUT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Write-side transform of a date field: the normalized string, or `None` to clear.
pub fn date_on_write(field: &str, raw: &Value) -> Result<Option<Value>, SzamlaError> {
    Ok(parse_date(field, raw)?.map(|date| Value::String(format_date(date))))
}

/// Read-side transform of a date field: the stored date, else today.
///
/// Only an absent (or null) value falls back to today. A stored value that
/// is not a date is an error rather than silently replaced.
pub fn date_on_read(tree: &AttributeTree, path: &str) -> Result<NaiveDate, SzamlaError> {
    let stored = match tree.get(path) {
        Some(raw) => parse_date(path, raw)?,
        None => None,
    };
    Ok(stored.unwrap_or_else(today))
}

/// Short name of a JSON value's kind, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
