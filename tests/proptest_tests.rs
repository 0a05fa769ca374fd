//! Property-based tests for the attribute tree, key ordering and item amounts.
//!
//! Run with: `cargo test --test proptest_tests`

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use szamla::core::*;

fn key_paths(value: &Value) -> Vec<String> {
    fn walk(value: &Value, prefix: &str, out: &mut Vec<String>) {
        if let Value::Object(map) = value {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                out.push(path.clone());
                walk(child, &path, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(value, "", &mut out);
    out
}

// ── Strategies ──────────────────────────────────────────────────────────────

fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,6}"
}

fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 1..=4).prop_map(|segments| segments.join("."))
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Public storno names that carry plain (non-computed) values.
const STORNO_KEYS: &[&str] = &[
    "customerEmail",
    "merchantEmailReplyto",
    "merchantEmailSubject",
    "merchantEmailText",
    "invoiceNumber",
    "orderNumber",
    "username",
    "password",
    "eInvoice",
    "downloadInvoice",
];

/// A shuffled mix of known storno names and undeclared keys.
fn arb_storno_fields() -> impl Strategy<Value = Fields> {
    (
        prop::sample::subsequence(STORNO_KEYS, 0..=STORNO_KEYS.len()),
        prop::collection::vec("x[a-z]{1,5}", 0..4),
    )
        .prop_flat_map(|(known, extra)| {
            let keys: Vec<String> = known
                .iter()
                .map(|k| k.to_string())
                .chain(extra)
                .collect();
            Just(keys).prop_shuffle()
        })
        .prop_map(|keys| {
            keys.into_iter()
                .map(|key| {
                    let value = Value::from(format!("v-{key}"));
                    (key, value)
                })
                .collect()
        })
}

fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// A value written at a path reads back unchanged.
    #[test]
    fn set_then_get_returns_value(path in arb_path(), value in arb_scalar()) {
        let mut tree = AttributeTree::new();
        tree.set(&path, value.clone());
        prop_assert!(tree.has(&path));
        prop_assert_eq!(tree.get(&path), Some(&value));
    }

    /// Writing below a scalar replaces it with a mapping.
    #[test]
    fn nested_write_replaces_scalar(parent in arb_path(), leaf in arb_segment(), value in arb_scalar()) {
        let mut tree = AttributeTree::new().with(&parent, "scalar");
        let child = format!("{parent}.{leaf}");
        tree.set(&child, value.clone());
        prop_assert_eq!(tree.get(&child), Some(&value));
        prop_assert!(tree.get(&parent).unwrap().is_object());
    }

    /// Removing a path written just before leaves it absent.
    #[test]
    fn remove_after_set(path in arb_path(), value in arb_scalar()) {
        let mut tree = AttributeTree::new();
        tree.set(&path, value.clone());
        prop_assert_eq!(tree.remove(&path), Some(value));
        prop_assert!(!tree.has(&path));
    }

    /// Exporting an exported tree again does not move any key.
    #[test]
    fn export_is_idempotent(input in arb_storno_fields()) {
        let storno = StornoInvoice::from_fields(input).unwrap();
        let once = storno.to_tree();
        let twice = StornoInvoice::SCHEMA.order.reorder(&once);
        prop_assert_eq!(key_paths(&once.into_value()), key_paths(&twice.into_value()));
    }

    /// Declared root keys come first and in declared order, whatever the fill order.
    #[test]
    fn declared_keys_precede_undeclared(input in arb_storno_fields()) {
        let extras: Vec<String> = input.keys().filter(|k| k.starts_with('x')).cloned().collect();
        let storno = StornoInvoice::from_fields(input).unwrap();
        let tree = storno.to_value();
        let root: Vec<String> = tree.as_object().unwrap().keys().cloned().collect();

        let declared = ["settings", "header", "merchant", "customer"];
        let expected: Vec<String> = declared
            .iter()
            .filter(|k| root.iter().any(|r| r == *k))
            .map(|k| k.to_string())
            .chain(extras)
            .collect();
        prop_assert_eq!(root, expected);
    }

    /// Filling the same fields through aliases or internal paths gives the same export.
    #[test]
    fn alias_and_path_fill_agree(input in arb_storno_fields()) {
        let by_alias = StornoInvoice::from_fields(input.clone()).unwrap();
        let by_path: Fields = input
            .into_iter()
            .map(|(key, value)| {
                let path = StornoInvoice::SCHEMA.aliases.target(&key).to_string();
                (path, value)
            })
            .collect();
        let by_path = StornoInvoice::from_fields(by_path).unwrap();
        prop_assert_eq!(by_alias.to_value(), by_path.to_value());
    }

    /// Gross is always net plus VAT, and amounts are written with two decimals.
    #[test]
    fn item_amounts_add_up(
        quantity in (1u32..=1000u32).prop_map(Decimal::from),
        price in arb_money(),
        rate in prop::sample::select(vec!["0", "5", "18", "27", "AAM", "TAM"]),
    ) {
        let item = InvoiceItem::new("Tétel", quantity, "db", price).vat_rate(rate);
        let net = item.net_price().unwrap();
        let vat = item.vat_amount().unwrap();
        prop_assert_eq!(item.gross_amount().unwrap(), net + vat);
        prop_assert!(vat >= Decimal::ZERO);

        let data = item.invoice_item_data();
        for key in ["netPrice", "vatAmount", "grossAmount"] {
            let text = data[key].as_str().unwrap();
            let (_, decimals) = text.split_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 2);
        }
    }

    /// Any amount an item writes passes the invoice's number rules.
    #[test]
    fn generated_items_validate(price in arb_money(), quantity in (1u32..=50u32).prop_map(Decimal::from)) {
        let mut invoice = Invoice::from_fields(
            json!({
                "eInvoice": false,
                "dueDate": "2024-01-31",
                "paymentMethod": "átutalás",
                "currency": "HUF",
                "language": "hu",
                "customerName": "Vevő",
                "customerZip": "1000",
                "customerCity": "Budapest",
                "customerAddress": "Fő utca 1.",
            })
            .as_object()
            .unwrap()
            .clone(),
        )
        .unwrap();
        invoice.add_item(&InvoiceItem::new("Tétel", quantity, "db", price)).unwrap();
        prop_assert!(invoice.validate().is_ok());
    }
}
