//! Error types for the stmtparse library.
//!
//! Errors are split by the component that raises them:
//!
//! * [`CaptureError`] — **Validation**: the selected file was rejected before
//!   any network activity (wrong media type, unreadable file).
//!
//! * [`TransportError`] — **Connectivity**: the parsing service could not be
//!   reached or the exchange was cut short. No HTTP response exists.
//!
//! * [`SessionError`] — an illegal transition was requested on the session
//!   (submitting twice, resetting from `Idle`). These are programming or UI
//!   wiring errors, never user-facing outcomes.
//!
//! * [`ConfigError`] — builder validation.
//!
//! Application errors (the service answered but could not parse the
//! statement) are not a Rust error at all: they are a terminal
//! [`crate::session::SubmissionState::Failed`] carrying the server's message.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Text shown when a non-PDF file is selected.
pub const MSG_NOT_A_PDF: &str = "Please select a PDF file";

/// Text shown when submit is triggered with no file selected.
pub const MSG_NO_FILE: &str = "Please select a file";

/// Fallback text for a failure response without a `message` field.
pub const MSG_PARSE_FAILED: &str = "Error parsing PDF";

/// Fixed text for any transport-level failure.
pub const MSG_CONNECTIVITY: &str =
    "Failed to connect to server. Make sure the backend is running.";

/// A file was rejected by input capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Declared media type is not `application/pdf`.
    #[error("Please select a PDF file")]
    NotAPdf { name: String, declared_type: String },

    /// Declared type is PDF but the content does not start with `%PDF`.
    /// Only raised when magic-byte verification is enabled.
    #[error("Please select a PDF file")]
    BadMagic { name: String, magic: Vec<u8> },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the file.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    /// Whether this error is the user-visible PDF-only validation failure,
    /// as opposed to a local I/O problem with the path.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NotAPdf { .. } | Self::BadMagic { .. })
    }
}

/// The parsing service could not be reached or no response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, TLS failure.
    #[error("Could not connect to '{url}': {reason}")]
    Connect { url: String, reason: String },

    /// The configured request timeout elapsed.
    #[error("Request to '{url}' timed out after {}ms", .after.as_millis())]
    Timeout { url: String, after: Duration },

    /// The response started but the body could not be read to the end.
    #[error("Response from '{url}' was cut short: {reason}")]
    Incomplete { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// An illegal transition was requested on a [`crate::session::Session`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A submission is already running; the trigger is disabled.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// A completion was delivered while no submission was running.
    #[error("No submission is in progress")]
    NotSubmitting,

    /// Reset is only offered from `Succeeded` or `Failed`.
    #[error("Reset is only available after a submission has finished (state: {state})")]
    ResetUnavailable { state: &'static str },
}

/// Builder validation failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Parse path must start with '/', got '{0}'")]
    InvalidParsePath(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
