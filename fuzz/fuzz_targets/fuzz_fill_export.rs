#![no_main]

use libfuzzer_sys::fuzz_target;
use szamla::core::{Document, Fields, Invoice, PdfQuery, StornoInvoice};

fn check<D: Document>(fields: Fields) {
    // Malformed input is an error, never a panic.
    let Ok(document) = D::from_fields(fields) else {
        return;
    };
    let once = document.to_tree();
    let twice = D::SCHEMA.order.reorder(&once);
    assert_eq!(
        once.keys().collect::<Vec<_>>(),
        twice.keys().collect::<Vec<_>>(),
        "export must be idempotent"
    );
    let _ = document.validate();
    let _ = szamla::xml::to_xml(&document);
}

fuzz_target!(|data: &[u8]| {
    let Ok(serde_json::Value::Object(fields)) = serde_json::from_slice(data) else {
        return;
    };
    check::<StornoInvoice>(fields.clone());
    check::<Invoice>(fields.clone());
    check::<PdfQuery>(fields);
});
