//! # szamla
//!
//! Request documents for the szamlazz.hu invoicing API: new invoices,
//! cancellations (storno) and PDF queries.
//!
//! The remote XML schema is order-sensitive, so every document is kept as a
//! nested attribute tree that is filled through friendly aliases, validated
//! section by section, and exported with its keys in schema order.
//!
//! ## Quick Start
//!
//! ```rust
//! use szamla::core::*;
//! use serde_json::json;
//!
//! let mut query = PdfQuery::new();
//! query.set("orderNumber", "WEB-1001").unwrap();
//! assert!(query.validate().is_err()); // invoiceNumber is required
//!
//! query.set("invoiceNumber", "E-2024-17").unwrap();
//! query.validate().unwrap();
//! assert_eq!(query.to_value(), json!({"invoiceNumber": "E-2024-17", "orderNumber": "WEB-1001"}));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Attribute tree, aliases, computed fields, ordering, validation |
//! | `xml` | Render exported documents as request XML |
//! | `client` | Blocking HTTP client for the invoicing API |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "client")]
pub mod client;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
