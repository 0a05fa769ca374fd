//! Blocking client for the szamlazz.hu invoicing API.
//!
//! Each call copies the document, injects credentials and settings,
//! validates it, renders the request XML and sends it as a single
//! multipart upload. There is no retry: one attempt, success or error.
//!
//! # Example
//!
//! ```no_run
//! use szamla::client::{ClientConfig, SzamlaClient};
//! use szamla::core::*;
//!
//! let client = SzamlaClient::new(ClientConfig::new("user", "secret")).unwrap();
//! let response = client.request(&PdfQuery::for_invoice("E-2024-17")).unwrap();
//! std::fs::write("E-2024-17.pdf", &response.body).unwrap();
//! ```

mod config;
mod request;

pub use config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use request::{ApiResponse, SzamlaClient, check_api_error, endpoint, form_field, prepare};
