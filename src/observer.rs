//! Observer trait for session transitions.
//!
//! Inject an [`Arc<dyn SessionObserver>`] via
//! [`crate::session::Session::with_observer`] to react to state changes as
//! they happen: start a spinner when a submission begins, stop it when the
//! submission resolves, log transitions, or forward them to another UI.
//!
//! # Example
//!
//! ```rust
//! use stmtparse::{ClientConfig, Session, SessionObserver, SubmissionState};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     transitions: AtomicUsize,
//! }
//!
//! impl SessionObserver for CountingObserver {
//!     fn on_transition(&self, _from: &'static str, _to: &SubmissionState) {
//!         self.transitions.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let observer = Arc::new(CountingObserver { transitions: AtomicUsize::new(0) });
//! let session = Session::new(ClientConfig::default())
//!     .with_observer(observer as Arc<dyn SessionObserver>);
//! ```

use crate::session::SubmissionState;
use std::sync::Arc;

/// Called by a [`crate::session::Session`] as it changes state.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about.
pub trait SessionObserver: Send + Sync {
    /// Called after every state change.
    ///
    /// # Arguments
    /// * `from` — name of the previous state (`idle`, `submitting`, …)
    /// * `to`   — the new state
    fn on_transition(&self, from: &'static str, to: &SubmissionState) {
        let _ = (from, to);
    }

    /// Called just before the upload request is sent.
    ///
    /// # Arguments
    /// * `file_name` — original name of the candidate file
    /// * `size`      — content length in bytes
    fn on_submit_start(&self, file_name: &str, size: usize) {
        let _ = (file_name, size);
    }

    /// Called once the submission has reached a terminal state.
    ///
    /// # Arguments
    /// * `state`      — `Succeeded` or `Failed`
    /// * `elapsed_ms` — wall-clock time spent waiting on the service
    fn on_submit_complete(&self, state: &SubmissionState, elapsed_ms: u64) {
        let _ = (state, elapsed_ms);
    }
}

/// A no-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Convenience alias for the shared observer handle.
pub type ObserverHandle = Arc<dyn SessionObserver>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_transition("idle", &SubmissionState::Submitting);
        o.on_submit_start("a.pdf", 10);
        o.on_submit_complete(&SubmissionState::Failed("x".into()), 5);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: ObserverHandle = Arc::new(NoopObserver);
        o.on_transition("submitting", &SubmissionState::Idle);
    }
}
