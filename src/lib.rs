//! # stmtparse
//!
//! Submit a credit-card statement PDF to a parsing service and render the six
//! fields it extracts: issuer, last four card digits, statement date, payment
//! due date, total balance and minimum payment.
//!
//! The statement parsing itself happens elsewhere, behind `POST /api/parse`.
//! This crate owns everything on the client side of that call: accepting a
//! file, refusing anything that is not a PDF before touching the network,
//! running exactly one upload at a time, and turning whatever comes back (or
//! doesn't) into one displayable state.
//!
//! ## Flow
//!
//! ```text
//! pick / drop
//!  │
//!  ├─ 1. Capture    FileRef ──▶ CandidateFile (PDF only)
//!  ├─ 2. Submit     Idle ──▶ Submitting, one multipart POST
//!  ├─ 3. Classify   response / no response ──▶ Succeeded | Failed
//!  └─ 4. Render     Session ──▶ View (pure)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stmtparse::{render, ClientConfig, FileRef, HttpTransport, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let transport = HttpTransport::new(&config)?;
//!     let mut session = Session::new(config);
//!
//!     session.select(FileRef::from_path("statement.pdf")?)?;
//!     session.submit(&transport).await?;
//!     println!("{}", render(&session));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `stmtparse` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod capture;
pub mod config;
pub mod error;
pub mod observer;
pub mod render;
pub mod response;
pub mod session;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use capture::{CandidateFile, DragEvent, DragState, EventDisposition, FileRef, PDF_MEDIA_TYPE};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{CaptureError, ConfigError, SessionError, TransportError};
pub use observer::{NoopObserver, ObserverHandle, SessionObserver};
pub use render::{render, View};
pub use response::{Amount, Outcome, ParseResult, RawResponse};
pub use session::{Session, SubmissionState};
pub use transport::{HttpTransport, ParseTransport};
