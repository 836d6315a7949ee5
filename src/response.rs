//! Parse results and classification of service responses.
//!
//! The service's JSON is trusted for shape: no field is validated beyond
//! presence unless strict mode is requested. Classification is a pure
//! function from [`RawResponse`] to [`Outcome`] so every branch can be
//! exercised without a network.

use crate::error::{MSG_CONNECTIVITY, MSG_PARSE_FAILED};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// A monetary amount as sent by the service: a string or a number.
///
/// Displayed verbatim; the client performs no arithmetic on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Text(s) => f.write_str(s),
            Amount::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The six fields extracted from a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub issuer: String,
    pub card_last_4: String,
    pub statement_date: String,
    pub payment_due_date: String,
    pub total_balance: Amount,
    pub minimum_payment: Amount,
}

/// An HTTP response as received: status code and body, if it was JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// `None` when the body was empty or not valid JSON.
    pub body: Option<Value>,
}

impl RawResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body's `message`, unless missing, `null`, not a string or empty.
    fn message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }
}

/// Terminal outcome of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Succeeded(ParseResult),
    Failed(String),
}

impl Outcome {
    /// Outcome for a request that never produced a response.
    pub fn connectivity() -> Self {
        Outcome::Failed(MSG_CONNECTIVITY.to_string())
    }

    /// Classify a received response.
    ///
    /// A 2xx body is only a result when `status == "success"` and all six
    /// fields deserialize. Anything else is a failure carrying the body's
    /// `message`, or the generic parse-error text.
    pub fn from_response(response: &RawResponse, strict: bool) -> Self {
        if !response.is_success() {
            let message = response.message().unwrap_or(MSG_PARSE_FAILED);
            warn!("Service returned HTTP {}: {}", response.status, message);
            return Outcome::Failed(message.to_string());
        }

        let Some(body) = response.body.as_ref() else {
            warn!("Service returned HTTP {} without a JSON body", response.status);
            return Outcome::Failed(MSG_PARSE_FAILED.to_string());
        };

        if body.get("status").and_then(Value::as_str) != Some("success") {
            let message = response.message().unwrap_or(MSG_PARSE_FAILED);
            warn!("Service reported non-success status: {}", message);
            return Outcome::Failed(message.to_string());
        }

        match serde_json::from_value::<ParseResult>(body.clone()) {
            Ok(result) => {
                if strict {
                    if let Err(reason) = check_strict(&result) {
                        warn!("Rejected result in strict mode: {}", reason);
                        return Outcome::Failed(MSG_PARSE_FAILED.to_string());
                    }
                }
                Outcome::Succeeded(result)
            }
            Err(e) => {
                warn!("Success payload is missing fields: {}", e);
                Outcome::Failed(MSG_PARSE_FAILED.to_string())
            }
        }
    }
}

fn check_strict(result: &ParseResult) -> Result<(), String> {
    if result.issuer.trim().is_empty() {
        return Err("empty issuer".into());
    }
    if result.card_last_4.chars().count() != 4 {
        return Err(format!("card_last_4 '{}' is not 4 characters", result.card_last_4));
    }
    Ok(())
}
