#![cfg(feature = "xml")]

use rust_decimal_macros::dec;
use serde_json::{Value, json};
use szamla::core::*;
use szamla::xml;

fn fields(value: Value) -> Fields {
    value.as_object().unwrap().clone()
}

/// Byte offset of `needle`, failing the test if it is missing.
fn pos(xml: &str, needle: &str) -> usize {
    xml.find(needle)
        .unwrap_or_else(|| panic!("{needle} not found in:\n{xml}"))
}

#[test]
fn storno_xml_follows_export_order() {
    let storno = StornoInvoice::from_fields(fields(json!({
        "customerEmail": "vevo@example.hu",
        "invoiceNumber": "E-2024-17",
        "signatureDate": "2024-06-20",
        "settlementDate": "2024-06-20",
        "eInvoice": true,
        "username": "user",
    })))
    .unwrap();
    let out = xml::to_xml(&storno).unwrap();

    assert!(out.contains("<xmlszamlast "));
    assert!(out.contains("<felhasznalo>user</felhasznalo>"));
    assert!(out.contains("<szamlaszam>E-2024-17</szamlaszam>"));
    assert!(out.contains("<keltDatum>2024-06-20</keltDatum>"));
    assert!(pos(&out, "<beallitasok>") < pos(&out, "<fejlec>"));
    assert!(pos(&out, "<fejlec>") < pos(&out, "<vevo>"));
    assert!(pos(&out, "<felhasznalo>") < pos(&out, "<eszamla>"));
    assert!(pos(&out, "<szamlaszam>") < pos(&out, "<keltDatum>"));
    assert!(pos(&out, "<keltDatum>") < pos(&out, "<teljesitesDatum>"));
    assert!(out.trim_end().ends_with("</xmlszamlast>"));
}

#[test]
fn invoice_xml_renders_items() {
    let mut invoice = Invoice::from_fields(fields(json!({
        "customerName": "Vevő & Társa Kft.",
        "currency": "HUF",
    })))
    .unwrap();
    invoice
        .add_item(&InvoiceItem::new("Könyv", dec!(1), "db", dec!(4000)).vat_rate("5"))
        .unwrap();
    let out = xml::to_xml(&invoice).unwrap();

    assert!(out.contains(r#"xmlns="http://www.szamlazz.hu/xmlszamla""#));
    assert!(out.contains("<nev>Vevő &amp; Társa Kft.</nev>"));
    assert!(out.contains("<megnevezes>Könyv</megnevezes>"));
    assert!(pos(&out, "<tetelek>") < pos(&out, "<tetel>"));
    assert!(pos(&out, "<tetel>") < pos(&out, "<megnevezes>"));
    assert!(out.contains("<afaErtek>200.00</afaErtek>"));
    assert!(out.contains("<bruttoErtek>4200.00</bruttoErtek>"));
    assert!(pos(&out, "<fejlec>") < pos(&out, "<vevo>"));
    assert!(pos(&out, "<vevo>") < pos(&out, "<tetelek>"));
}

#[test]
fn pdf_query_xml_is_flat() {
    let mut query = PdfQuery::for_invoice("E-2024-3");
    query.set("username", "user").unwrap();
    query.set("password", "secret").unwrap();
    let out = xml::to_xml(&query).unwrap();

    assert!(out.contains("<xmlszamlapdf "));
    assert!(pos(&out, "<felhasznalo>") < pos(&out, "<jelszo>"));
    assert!(pos(&out, "<jelszo>") < pos(&out, "<szamlaszam>"));
    assert!(!out.contains("<beallitasok>"));
}

#[test]
fn render_does_not_reorder() {
    let tree = AttributeTree::new().with("b", "2").with("a", "1");
    let out = xml::render_tree(DocumentKind::PdfQuery, &tree).unwrap();
    assert!(pos(&out, "<b>") < pos(&out, "<a>"));
}

#[test]
fn element_names_for_every_root() {
    assert_eq!(xml::root_element(DocumentKind::Invoice), "xmlszamla");
    assert_eq!(xml::root_element(DocumentKind::StornoInvoice), "xmlszamlast");
    assert_eq!(xml::root_element(DocumentKind::PdfQuery), "xmlszamlapdf");
    assert_eq!(
        xml::namespace(DocumentKind::PdfQuery),
        "http://www.szamlazz.hu/xmlszamlapdf"
    );
}
