use serde_json::Value;

use super::XSI_NAMESPACE;
use super::xml_utils::XmlWriter;
use crate::core::{AttributeTree, Document, DocumentKind, Fields, SzamlaError};

/// Element names that depend on where the key sits in the tree.
const PATH_NAMES: &[(&str, &str)] = &[
    ("customer.name", "nev"),
    ("items.*", "tetel"),
    ("items.*.name", "megnevezes"),
];

/// Element names by key, wherever the key appears.
const KEY_NAMES: &[(&str, &str)] = &[
    ("settings", "beallitasok"),
    ("username", "felhasznalo"),
    ("password", "jelszo"),
    ("eInvoice", "eszamla"),
    ("downloadInvoice", "szamlaLetoltes"),
    ("responseVersion", "valaszVerzio"),
    ("header", "fejlec"),
    ("invoiceNumber", "szamlaszam"),
    ("signatureDate", "keltDatum"),
    ("settlementDate", "teljesitesDatum"),
    ("dueDate", "fizetesiHataridoDatum"),
    ("paymentMethod", "fizmod"),
    ("currency", "penznem"),
    ("language", "szamlaNyelve"),
    ("comment", "megjegyzes"),
    ("orderNumber", "rendelesSzam"),
    ("merchant", "elado"),
    ("bankAccount", "bankszamlaszam"),
    ("emailSubject", "emailTargy"),
    ("emailText", "emailSzoveg"),
    ("customer", "vevo"),
    ("zip", "irsz"),
    ("city", "telepules"),
    ("address", "cim"),
    ("taxNumber", "adoszam"),
    ("items", "tetelek"),
    ("quantity", "mennyiseg"),
    ("unit", "mennyisegiEgyseg"),
    ("netUnitPrice", "nettoEgysegar"),
    ("vatRate", "afakulcs"),
    ("netPrice", "nettoErtek"),
    ("vatAmount", "afaErtek"),
    ("grossAmount", "bruttoErtek"),
];

/// Root element of each document kind.
pub fn root_element(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Invoice => "xmlszamla",
        DocumentKind::StornoInvoice => "xmlszamlast",
        DocumentKind::PdfQuery => "xmlszamlapdf",
    }
}

pub fn namespace(kind: DocumentKind) -> String {
    format!("http://www.szamlazz.hu/{}", root_element(kind))
}

/// API element name for the key at `path` (array elements appear as `*`).
///
/// Keys without a translation are used verbatim.
pub fn element_name<'a>(path: &str, key: &'a str) -> &'a str {
    let lookup = |table: &[(&'static str, &'static str)], needle: &str| {
        table
            .iter()
            .find(|(from, _)| *from == needle)
            .map(|(_, to)| *to)
    };
    lookup(PATH_NAMES, path)
        .or_else(|| lookup(KEY_NAMES, key))
        .unwrap_or(key)
}

/// Render a document's exported tree.
pub fn to_xml<D: Document>(document: &D) -> Result<String, SzamlaError> {
    render_tree(document.kind(), &document.to_tree())
}

/// Render an already exported tree. Key order is taken as-is.
pub fn render_tree(kind: DocumentKind, tree: &AttributeTree) -> Result<String, SzamlaError> {
    let root = root_element(kind);
    let ns = namespace(kind);
    let schema_location = format!("{ns} {root}.xsd");

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs(
        root,
        &[
            ("xmlns", ns.as_str()),
            ("xmlns:xsi", XSI_NAMESPACE),
            ("xsi:schemaLocation", schema_location.as_str()),
        ],
    )?;
    write_fields(&mut w, tree.as_fields(), "")?;
    w.end_element(root)?;
    w.into_string()
}

fn write_fields(w: &mut XmlWriter, fields: &Fields, prefix: &str) -> Result<(), SzamlaError> {
    for (key, value) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        write_value(w, element_name(&path, key), value, &path)?;
    }
    Ok(())
}

fn write_value(w: &mut XmlWriter, name: &str, value: &Value, path: &str) -> Result<(), SzamlaError> {
    match value {
        Value::Object(fields) => {
            w.start_element(name)?;
            write_fields(w, fields, path)?;
            w.end_element(name)?;
        }
        Value::Array(items) => {
            let item_path = format!("{path}.*");
            let item_name = element_name(&item_path, "item");
            w.start_element(name)?;
            for item in items {
                write_value(w, item_name, item, &item_path)?;
            }
            w.end_element(name)?;
        }
        Value::Null => {
            w.empty_element(name)?;
        }
        Value::Bool(b) => {
            w.text_element(name, if *b { "true" } else { "false" })?;
        }
        Value::Number(n) => {
            w.text_element(name, &n.to_string())?;
        }
        Value::String(s) => {
            w.text_element(name, s)?;
        }
    }
    Ok(())
}
