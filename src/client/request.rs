use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};

use super::config::ClientConfig;
use crate::core::{Document, DocumentKind, SzamlaError};
use crate::xml::to_xml;

const ERROR_CODE_HEADER: &str = "szlahu_error_code";
const ERROR_MESSAGE_HEADER: &str = "szlahu_error";
const INVOICE_NUMBER_HEADER: &str = "szlahu_szamlaszam";
const NET_TOTAL_HEADER: &str = "szlahu_nettovegosszeg";
const GROSS_TOTAL_HEADER: &str = "szlahu_bruttovegosszeg";

/// The API ignores uploads without a file name, so a fixed one is sent.
const UPLOAD_FILE_NAME: &str = "invoice.xml";

/// Successful API answer: PDF bytes or a text/XML message, plus header data.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub invoice_number: Option<String>,
    pub net_total: Option<String>,
    pub gross_total: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/pdf"))
    }
}

/// Multipart field name the API expects for each document kind.
pub fn form_field(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Invoice => "action-xmlagentxmlfile",
        DocumentKind::StornoInvoice => "action-szamla_agent_st",
        DocumentKind::PdfQuery => "action-szamla_agent_pdf",
    }
}

/// Upload URL for a base such as `https://www.szamlazz.hu/`.
pub fn endpoint(api_base: &str) -> String {
    format!("{}/szamla/", api_base.trim_end_matches('/'))
}

/// Copy `document`, add credentials and request settings, and validate it.
///
/// Credentials always come from the config. The e-invoice and download flags
/// are only filled in when the document does not set them.
pub fn prepare<D: Document>(config: &ClientConfig, document: &D) -> Result<D, SzamlaError> {
    let (username, password) = config.credentials()?;
    let mut prepared = document.clone();
    let kind = prepared.kind();

    prepared.set("username", username)?;
    prepared.set("password", password)?;
    if kind != DocumentKind::PdfQuery {
        if prepared.get("eInvoice").is_none() {
            prepared.set("eInvoice", config.e_invoice)?;
        }
        if prepared.get("downloadInvoice").is_none() {
            prepared.set("downloadInvoice", config.download_invoice)?;
        }
    }
    // 1: plain text or PDF answer, 2: XML answer
    if kind != DocumentKind::StornoInvoice {
        prepared.set("responseVersion", 1)?;
    }

    prepared.validate()?;
    Ok(prepared)
}

/// Turn the API's error headers into an error. A missing or zero code is success.
pub fn check_api_error(code: Option<&str>, message: Option<&str>) -> Result<(), SzamlaError> {
    match code.and_then(|c| c.trim().parse::<u32>().ok()) {
        Some(code) if code > 0 => Err(SzamlaError::Api {
            code,
            message: message.unwrap_or("unknown error").to_string(),
        }),
        _ => Ok(()),
    }
}

fn http_error(e: reqwest::Error) -> SzamlaError {
    SzamlaError::Http(e.to_string())
}

fn header(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

pub struct SzamlaClient {
    config: ClientConfig,
    http: Client,
}

impl SzamlaClient {
    pub fn new(config: ClientConfig) -> Result<Self, SzamlaError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(http_error)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one document. Validation failures are returned before any I/O.
    pub fn request<D: Document>(&self, document: &D) -> Result<ApiResponse, SzamlaError> {
        let prepared = prepare(&self.config, document)?;
        let kind = prepared.kind();
        let body = to_xml(&prepared)?;

        let part = Part::bytes(body.into_bytes())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("text/xml")
            .map_err(http_error)?;
        let form = Form::new().part(form_field(kind), part);
        let url = endpoint(&self.config.api_base);

        tracing::info!(document = %kind, %url, "sending request");
        let response = self.http.post(&url).multipart(form).send().map_err(http_error)?;
        tracing::debug!(status = %response.status(), "response received");

        check_api_error(
            header(&response, ERROR_CODE_HEADER).as_deref(),
            header(&response, ERROR_MESSAGE_HEADER).as_deref(),
        )
        .inspect_err(|e| tracing::warn!(error = %e, "API rejected request"))?;

        let invoice_number = header(&response, INVOICE_NUMBER_HEADER);
        let net_total = header(&response, NET_TOTAL_HEADER);
        let gross_total = header(&response, GROSS_TOTAL_HEADER);
        let content_type = header(&response, reqwest::header::CONTENT_TYPE.as_str());
        let body = response.bytes().map_err(http_error)?.to_vec();

        Ok(ApiResponse {
            invoice_number,
            net_total,
            gross_total,
            content_type,
            body,
        })
    }
}
