//! Request XML rendering.
//!
//! Turns an exported document tree into the XML body the invoicing API
//! expects: a namespaced root element per document kind, internal keys
//! translated to the API's element names, array elements repeated under a
//! singular element.
//!
//! # Example
//!
//! ```
//! use szamla::core::*;
//! use szamla::xml;
//!
//! let query = PdfQuery::for_invoice("E-2024-17");
//! let body = xml::to_xml(&query).unwrap();
//! assert!(body.contains("<szamlaszam>E-2024-17</szamlaszam>"));
//! ```

mod render;
pub(crate) mod xml_utils;

pub use render::{element_name, namespace, render_tree, root_element, to_xml};
pub use xml_utils::is_valid_element_name;

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
