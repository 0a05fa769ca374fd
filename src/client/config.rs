use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::core::SzamlaError;

pub const DEFAULT_API_BASE: &str = "https://www.szamlazz.hu/";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection and account settings for [`SzamlaClient`](super::SzamlaClient).
///
/// Can be built with the setters below or deserialized by the embedding
/// application; every field has a default.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_base: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Ask the API to return the finished PDF in the response.
    pub download_invoice: bool,
    /// Issue electronic invoices, unless a document sets the flag itself.
    pub e_invoice: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_ms: duration_ms(DEFAULT_TIMEOUT),
            download_invoice: false,
            e_invoice: false,
        }
    }
}

impl ClientConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sub-millisecond timeouts are rounded up to one millisecond.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_ms(timeout);
        self
    }

    pub fn download_invoice(mut self, download: bool) -> Self {
        self.download_invoice = download;
        self
    }

    pub fn e_invoice(mut self, e_invoice: bool) -> Self {
        self.e_invoice = e_invoice;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    /// Username and password, both required.
    pub fn credentials(&self) -> Result<(&str, &str), SzamlaError> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(SzamlaError::MissingCredentials),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).max(1)
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .field("timeout_ms", &self.timeout_ms)
            .field("download_invoice", &self.download_invoice)
            .field("e_invoice", &self.e_invoice)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "https://www.szamlazz.hu/");
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
        assert!(!config.download_invoice);
        assert!(!config.e_invoice);
        assert!(matches!(config.credentials(), Err(SzamlaError::MissingCredentials)));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"username": "user", "password": "pw", "download_invoice": true, "timeout_ms": 5000}"#,
        )
        .unwrap();
        assert_eq!(config.credentials().unwrap(), ("user", "pw"));
        assert!(config.download_invoice);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn sub_second_timeouts_are_kept() {
        let config = ClientConfig::new("u", "p").timeout(Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_millis(500));

        let config = ClientConfig::new("u", "p").timeout(Duration::from_micros(10));
        assert_eq!(config.request_timeout(), Duration::from_millis(1));

        let config = ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert!(!config.request_timeout().is_zero());
    }

    #[test]
    fn password_alone_is_not_enough() {
        let config = ClientConfig {
            password: Some("pw".into()),
            ..ClientConfig::default()
        };
        assert!(config.credentials().is_err());
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", ClientConfig::new("user", "hunter2"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
