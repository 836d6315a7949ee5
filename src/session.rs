//! Submission orchestration: the single owner of UI state.
//!
//! A [`Session`] holds the candidate file, the drag hint and the
//! [`SubmissionState`]. It is mutated only through the named transitions
//! below, each taking `&mut self`, so two mutations can never interleave.
//!
//! ## State machine
//!
//! ```text
//!            select(pdf) / remove
//!          ┌──────────────────────┐
//!          ▼                      │
//!        Idle ──submit──▶ Submitting ──response──▶ Succeeded
//!          ▲                      │                    │
//!          │                      └──no response──▶ Failed
//!          └────────────── reset / select(pdf) ───────┘
//! ```
//!
//! Every failure kind (validation, application, connectivity) ends in
//! `Failed(message)`; none escapes [`Session::submit`] as an error.

use crate::capture::{CandidateFile, DragEvent, DragState, EventDisposition, FileRef};
use crate::config::ClientConfig;
use crate::error::{SessionError, MSG_NO_FILE};
use crate::observer::ObserverHandle;
use crate::response::{Outcome, ParseResult};
use crate::transport::ParseTransport;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Exactly one variant is active at any time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(ParseResult),
    Failed(String),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed(_) => "failed",
        }
    }

    /// `Succeeded` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded(_) | SubmissionState::Failed(_)
        )
    }

    pub fn result(&self) -> Option<&ParseResult> {
        match self {
            SubmissionState::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Outcome> for SubmissionState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Succeeded(r) => SubmissionState::Succeeded(r),
            Outcome::Failed(m) => SubmissionState::Failed(m),
        }
    }
}

/// One user's upload session.
pub struct Session {
    config: ClientConfig,
    candidate: Option<CandidateFile>,
    drag: DragState,
    state: SubmissionState,
    observer: Option<ObserverHandle>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("candidate", &self.candidate)
            .field("drag", &self.drag)
            .field("state", &self.state)
            .field("observer", &self.observer.as_ref().map(|_| "<dyn SessionObserver>"))
            .finish()
    }
}

impl Session {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            candidate: None,
            drag: DragState::default(),
            state: SubmissionState::Idle,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: ObserverHandle) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The submit trigger is enabled only with a file and no request running.
    pub fn can_submit(&self) -> bool {
        self.candidate.is_some() && self.state != SubmissionState::Submitting
    }

    /// Reset is offered only from a terminal state.
    pub fn can_reset(&self) -> bool {
        self.state.is_terminal()
    }

    fn transition(&mut self, to: SubmissionState) {
        let from = self.state.name();
        self.state = to;
        debug!("state: {} -> {}", from, self.state.name());
        if let Some(ref o) = self.observer {
            o.on_transition(from, &self.state);
        }
    }

    fn ensure_not_submitting(&self) -> Result<(), SessionError> {
        if self.state == SubmissionState::Submitting {
            Err(SessionError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }

    // ── Input capture transitions ────────────────────────────────────────

    /// Offer a picked or dropped file.
    ///
    /// A PDF replaces the candidate and clears any error or result. Anything
    /// else clears the candidate and fails with the PDF-only message.
    pub fn select(&mut self, file: FileRef) -> Result<(), SessionError> {
        self.ensure_not_submitting()?;
        match CandidateFile::accept(file, self.config.verify_pdf_magic) {
            Ok(candidate) => {
                info!("Selected {} ({} bytes)", candidate.name(), candidate.len());
                self.candidate = Some(candidate);
                self.transition(SubmissionState::Idle);
            }
            Err(e) => {
                warn!("Rejected selection: {:?}", e);
                self.candidate = None;
                self.transition(SubmissionState::Failed(e.to_string()));
            }
        }
        Ok(())
    }

    /// Apply a drag event; a drop forwards its first file into [`Self::select`].
    ///
    /// Hover feedback is applied even mid-submission, but a drop is refused
    /// there like any other selection.
    pub fn drag(&mut self, event: DragEvent) -> Result<EventDisposition, SessionError> {
        let is_drop = matches!(event, DragEvent::Drop(_));
        if is_drop {
            self.ensure_not_submitting()?;
        }
        let (disposition, file) = self.drag.handle(event);
        if let Some(file) = file {
            self.select(file)?;
        }
        Ok(disposition)
    }

    /// Drop the candidate file, clearing any error or result with it.
    pub fn remove(&mut self) -> Result<(), SessionError> {
        self.ensure_not_submitting()?;
        if let Some(c) = self.candidate.take() {
            debug!("Removed {}", c.name());
        }
        if self.state != SubmissionState::Idle {
            self.transition(SubmissionState::Idle);
        }
        Ok(())
    }

    // ── Submission transitions ───────────────────────────────────────────

    /// Start a submission.
    ///
    /// Returns `Ok(true)` when the session is now `Submitting` and a request
    /// must be issued, `Ok(false)` when there was no file (the session is
    /// then `Failed` and no request may be made).
    pub fn begin_submit(&mut self) -> Result<bool, SessionError> {
        self.ensure_not_submitting()?;
        if self.candidate.is_none() {
            warn!("Submit triggered without a file");
            self.transition(SubmissionState::Failed(MSG_NO_FILE.to_string()));
            return Ok(false);
        }
        self.transition(SubmissionState::Submitting);
        Ok(true)
    }

    /// Resolve the running submission.
    pub fn complete(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        if self.state != SubmissionState::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.transition(outcome.into());
        Ok(())
    }

    /// Run one submission to its terminal state.
    ///
    /// Errors only when the trigger is disabled (a submission is already
    /// running). Validation, application and connectivity failures all land
    /// in [`SubmissionState::Failed`]. Dropping the returned future before
    /// the service answers (e.g. under `tokio::time::timeout`) resolves the
    /// session to the connectivity failure.
    pub async fn submit(
        &mut self,
        transport: &dyn ParseTransport,
    ) -> Result<&SubmissionState, SessionError> {
        if !self.begin_submit()? {
            return Ok(&self.state);
        }

        let guard = InFlight {
            session: &mut *self,
            start: Instant::now(),
        };
        let outcome = {
            let session = &*guard.session;
            match session.candidate.as_ref() {
                Some(file) => {
                    if let Some(ref o) = session.observer {
                        o.on_submit_start(file.name(), file.len());
                    }
                    match transport.parse(file).await {
                        Ok(response) => {
                            Outcome::from_response(&response, session.config.strict_result)
                        }
                        Err(e) => {
                            warn!("Upload failed: {}", e);
                            Outcome::connectivity()
                        }
                    }
                }
                None => Outcome::Failed(MSG_NO_FILE.to_string()),
            }
        };
        guard.resolve(outcome)?;
        Ok(&self.state)
    }

    /// Return to the initial state from `Succeeded` or `Failed`.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if !self.can_reset() {
            return Err(SessionError::ResetUnavailable {
                state: self.state.name(),
            });
        }
        self.candidate = None;
        self.drag = DragState::default();
        self.transition(SubmissionState::Idle);
        Ok(())
    }
}

/// Owns a session for the duration of one request.
///
/// If dropped while the session is still `Submitting`, the submission is
/// resolved to the connectivity failure so `Submitting` never outlives its
/// request.
struct InFlight<'a> {
    session: &'a mut Session,
    start: Instant,
}

impl InFlight<'_> {
    fn resolve(self, outcome: Outcome) -> Result<(), SessionError> {
        self.session.complete(outcome)?;
        self.finish();
        Ok(())
    }

    fn finish(&self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        info!("Submission {} in {}ms", self.session.state.name(), elapsed_ms);
        if let Some(ref o) = self.session.observer {
            o.on_submit_complete(&self.session.state, elapsed_ms);
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.session.state == SubmissionState::Submitting {
            warn!("Submission abandoned before the service answered");
            self.session.transition(Outcome::connectivity().into());
            self.finish();
        }
    }
}
