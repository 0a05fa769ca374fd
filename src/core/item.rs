use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::computed::InvoiceableItem;
use super::error::SzamlaError;
use super::tree::Fields;

/// One invoice line with amounts derived from quantity, unit price and VAT key.
///
/// All amounts are [`Decimal`] and rounded half-up to 2 places. They are
/// written into the item mapping as strings with exactly 2 decimals. An
/// amount that overflows `Decimal` is an error and is left out of the item
/// mapping.
///
/// ```
/// use szamla::core::*;
/// use rust_decimal_macros::dec;
///
/// let item = InvoiceItem::new("Consulting", dec!(3), "hour", dec!(15000)).vat_rate("27");
/// assert_eq!(item.net_price()?, dec!(45000));
/// assert_eq!(item.vat_amount()?, dec!(12150));
/// assert_eq!(item.gross_amount()?, dec!(57150));
/// # Ok::<(), SzamlaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub net_unit_price: Decimal,
    /// Percentage such as `"27"`, or a keyword such as `"AAM"` or `"TAM"` (no VAT).
    pub vat_rate: String,
    pub comment: Option<String>,
}

impl InvoiceItem {
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        net_unit_price: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            net_unit_price,
            vat_rate: "27".to_string(),
            comment: None,
        }
    }

    pub fn vat_rate(mut self, rate: impl Into<String>) -> Self {
        self.vat_rate = rate.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Numeric VAT percentage; keyword rates count as zero.
    pub fn vat_percent(&self) -> Decimal {
        self.vat_rate.trim().parse().unwrap_or(Decimal::ZERO)
    }

    pub fn net_price(&self) -> Result<Decimal, SzamlaError> {
        self.quantity
            .checked_mul(self.net_unit_price)
            .map(|net| round_half_up(net, 2))
            .ok_or_else(|| overflow("netPrice"))
    }

    pub fn vat_amount(&self) -> Result<Decimal, SzamlaError> {
        self.net_price()?
            .checked_mul(self.vat_percent())
            .and_then(|vat| vat.checked_div(Decimal::ONE_HUNDRED))
            .map(|vat| round_half_up(vat, 2))
            .ok_or_else(|| overflow("vatAmount"))
    }

    pub fn gross_amount(&self) -> Result<Decimal, SzamlaError> {
        self.net_price()?
            .checked_add(self.vat_amount()?)
            .ok_or_else(|| overflow("grossAmount"))
    }
}

impl InvoiceableItem for InvoiceItem {
    fn invoice_item_data(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::String(self.name.clone()));
        fields.insert("quantity".into(), Value::String(self.quantity.to_string()));
        fields.insert("unit".into(), Value::String(self.unit.clone()));
        fields.insert(
            "netUnitPrice".into(),
            Value::String(self.net_unit_price.to_string()),
        );
        fields.insert("vatRate".into(), Value::String(self.vat_rate.clone()));
        let amounts = [
            ("netPrice", self.net_price()),
            ("vatAmount", self.vat_amount()),
            ("grossAmount", self.gross_amount()),
        ];
        for (key, value) in amounts {
            match value {
                Ok(value) => {
                    fields.insert(key.into(), amount(value));
                }
                Err(err) => {
                    tracing::warn!(item = %self.name, error = %err, "item amount left out");
                }
            }
        }
        if let Some(comment) = &self.comment {
            fields.insert("comment".into(), Value::String(comment.clone()));
        }
        fields
    }
}

fn overflow(field: &str) -> SzamlaError {
    SzamlaError::malformed(field, "amount does not fit a decimal")
}

fn amount(value: Decimal) -> Value {
    Value::String(format!("{value:.2}"))
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
