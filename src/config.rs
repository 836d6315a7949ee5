//! Client configuration.
//!
//! All behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. Callers set only what they care about and rely on
//! the defaults for the rest; the defaults reproduce the observed behaviour of
//! the statement-parser front-end (local service, no timeout, permissive
//! result handling).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default origin of the parsing service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Path of the single upload endpoint.
pub const DEFAULT_PARSE_PATH: &str = "/api/parse";

/// Issuers advertised in the banner above the drop zone.
pub const DEFAULT_SUPPORTED_ISSUERS: &[&str] = &["HDFC", "ICICI", "SBI", "BOB", "AXIS"];

/// Configuration for a statement-parsing client.
///
/// # Example
/// ```rust
/// use stmtparse::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .base_url("http://127.0.0.1:8080")
///     .request_timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(config.parse_url(), "http://127.0.0.1:8080/api/parse");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the parsing service, without a trailing slash.
    /// Default: `http://localhost:5000`.
    pub base_url: String,

    /// Upload endpoint path. Default: `/api/parse`.
    pub parse_path: String,

    /// Whole-request timeout. Default: `None` (wait indefinitely).
    ///
    /// When set, an elapsed timeout is reported as a connectivity failure.
    pub request_timeout: Option<Duration>,

    /// TCP connect timeout. Default: `None`.
    pub connect_timeout: Option<Duration>,

    /// Also require the file content to start with `%PDF`. Default: false.
    pub verify_pdf_magic: bool,

    /// Reject success payloads with an empty issuer or a last-4 value that
    /// is not exactly four characters. Default: false.
    pub strict_result: bool,

    /// Prefix for the balance and minimum-payment values. Default: `$`.
    pub currency_symbol: String,

    /// Prefix for the card's last four digits. Default: `****`.
    pub mask_marker: String,

    /// Issuers listed in the banner. Default: HDFC, ICICI, SBI, BOB, AXIS.
    pub supported_issuers: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            parse_path: DEFAULT_PARSE_PATH.to_string(),
            request_timeout: None,
            connect_timeout: None,
            verify_pdf_magic: false,
            strict_result: false,
            currency_symbol: "$".to_string(),
            mask_marker: "****".to_string(),
            supported_issuers: DEFAULT_SUPPORTED_ISSUERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the upload endpoint.
    pub fn parse_url(&self) -> String {
        format!("{}{}", self.base_url, self.parse_path)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn parse_path(mut self, path: impl Into<String>) -> Self {
        self.config.parse_path = path.into();
        self
    }

    /// A zero duration disables the timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn verify_pdf_magic(mut self, v: bool) -> Self {
        self.config.verify_pdf_magic = v;
        self
    }

    pub fn strict_result(mut self, v: bool) -> Self {
        self.config.strict_result = v;
        self
    }

    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.currency_symbol = symbol.into();
        self
    }

    pub fn mask_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.mask_marker = marker.into();
        self
    }

    pub fn supported_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_issuers = issuers.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let c = &self.config;
        let parsed =
            reqwest::Url::parse(&c.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
                url: c.base_url.clone(),
                reason: e.to_string(),
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: c.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if !c.parse_path.starts_with('/') {
            return Err(ConfigError::InvalidParsePath(c.parse_path.clone()));
        }
        if c.mask_marker.is_empty() {
            return Err(ConfigError::Invalid("mask marker must not be empty".into()));
        }
        Ok(self.config)
    }
}
