//! Transport to the parsing service.
//!
//! [`ParseTransport`] is the seam between the session and the network: the
//! session only needs "send this file, give me the response or tell me none
//! came back". [`HttpTransport`] is the real implementation; tests and
//! embedders can supply their own.

use crate::capture::CandidateFile;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::response::RawResponse;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Name of the single multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Sends a candidate file to a parsing service.
///
/// An `Ok` means a response was received, whatever its HTTP status.
/// `Err` is reserved for "no response at all".
#[async_trait]
pub trait ParseTransport: Send + Sync {
    async fn parse(&self, file: &CandidateFile) -> Result<RawResponse, TransportError>;
}

/// `POST {base_url}{parse_path}` with a multipart body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = config.request_timeout {
            builder = builder.timeout(t);
        }
        if let Some(t) = config.connect_timeout {
            builder = builder.connect_timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.parse_url(),
            timeout: config.request_timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                url: self.url.clone(),
                after: self.timeout.unwrap_or_default(),
            }
        } else {
            TransportError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ParseTransport for HttpTransport {
    async fn parse(&self, file: &CandidateFile) -> Result<RawResponse, TransportError> {
        let start = Instant::now();
        info!("Uploading {} ({} bytes) to {}", file.name(), file.len(), self.url);

        let part = reqwest::multipart::Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| TransportError::Client(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                TransportError::Incomplete {
                    url: self.url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let body: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();
        if body.is_none() && !bytes.is_empty() {
            debug!("Response body ({} bytes) is not JSON", bytes.len());
        }

        info!(
            "Service answered HTTP {} in {}ms",
            status,
            start.elapsed().as_millis()
        );
        Ok(RawResponse { status, body })
    }
}
