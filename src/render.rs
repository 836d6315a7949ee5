//! Pure rendering of a session into a view model.
//!
//! [`render`] reads a [`Session`] and produces a [`View`]; it never mutates
//! anything. The view is what a front-end draws: the terminal front-end uses
//! its `Display` impl, `--json` serialises it.

use crate::config::ClientConfig;
use crate::response::ParseResult;
use crate::session::{Session, SubmissionState};
use serde::Serialize;
use std::fmt;

pub const TITLE: &str = "Credit Card Statement Parser";
pub const SUBTITLE: &str = "Extract key data from your credit card statements";
pub const DROP_PROMPT: &str = "Drag and drop your PDF here, or click to browse";
pub const DROP_HINT: &str = "PDF files only";
pub const SUBMIT_LABEL: &str = "Parse Statement";
pub const BUSY_LABEL: &str = "Parsing...";
pub const REMOVE_LABEL: &str = "Remove";
pub const RESET_LABEL: &str = "Parse Another Statement";
pub const RESULT_HEADING: &str = "Extracted Data";

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub supported_issuers: Vec<String>,
    pub state: &'static str,
    pub drop_zone: DropZone,
    /// Present only when a file is selected.
    pub submit: Option<SubmitControl>,
    /// Never present together with `result`.
    pub error: Option<String>,
    pub result: Option<ResultCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropZone {
    pub drag_active: bool,
    /// Name of the selected file; `None` shows the prompt.
    pub file_name: Option<String>,
    pub prompt: &'static str,
    pub hint: &'static str,
    pub remove_label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitControl {
    pub label: &'static str,
    pub busy: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub heading: &'static str,
    pub rows: Vec<ResultRow>,
    pub reset_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub label: &'static str,
    pub value: String,
}

impl ResultCard {
    /// Value of the row with this label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

/// Lay out the six extracted fields.
pub fn result_card(result: &ParseResult, config: &ClientConfig) -> ResultCard {
    let row = |label, value: String| ResultRow { label, value };
    ResultCard {
        heading: RESULT_HEADING,
        rows: vec![
            row("Issuer", result.issuer.clone()),
            row(
                "Card Last 4 Digits",
                format!("{} {}", config.mask_marker, result.card_last_4),
            ),
            row("Statement Date", result.statement_date.clone()),
            row("Payment Due Date", result.payment_due_date.clone()),
            row(
                "Total Balance",
                format!("{}{}", config.currency_symbol, result.total_balance),
            ),
            row(
                "Minimum Payment",
                format!("{}{}", config.currency_symbol, result.minimum_payment),
            ),
        ],
        reset_label: RESET_LABEL,
    }
}

/// Render the current session.
pub fn render(session: &Session) -> View {
    let config = session.config();
    let state = session.state();
    let file_name = session.candidate().map(|c| c.name().to_string());
    let busy = *state == SubmissionState::Submitting;

    let submit = file_name.as_ref().map(|_| SubmitControl {
        label: if busy { BUSY_LABEL } else { SUBMIT_LABEL },
        busy,
        enabled: session.can_submit(),
    });

    let (error, result) = match state {
        SubmissionState::Failed(message) => (Some(message.clone()), None),
        SubmissionState::Succeeded(r) => (None, Some(result_card(r, config))),
        SubmissionState::Idle | SubmissionState::Submitting => (None, None),
    };

    View {
        title: TITLE,
        subtitle: SUBTITLE,
        supported_issuers: config.supported_issuers.clone(),
        state: state.name(),
        drop_zone: DropZone {
            drag_active: session.drag_state().active,
            remove_label: file_name.as_ref().map(|_| REMOVE_LABEL),
            file_name,
            prompt: DROP_PROMPT,
            hint: DROP_HINT,
        },
        submit,
        error,
        result,
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        if !self.supported_issuers.is_empty() {
            writeln!(f, "Supported Issuers: {}", self.supported_issuers.join("  "))?;
        }
        writeln!(f)?;

        let marker = if self.drop_zone.drag_active { "▶" } else { " " };
        match &self.drop_zone.file_name {
            Some(name) => writeln!(f, "{marker} [{name}]  ({})", REMOVE_LABEL)?,
            None => {
                writeln!(f, "{marker} {}", self.drop_zone.prompt)?;
                writeln!(f, "  {}", self.drop_zone.hint)?;
            }
        }

        if let Some(ref s) = self.submit {
            let state = if s.enabled { "" } else { " (disabled)" };
            writeln!(f, "  [ {} ]{}", s.label, state)?;
        }

        if let Some(ref e) = self.error {
            writeln!(f)?;
            writeln!(f, "✗ {e}")?;
        }

        if let Some(ref card) = self.result {
            writeln!(f)?;
            writeln!(f, "{}", card.heading)?;
            let width = card.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
            for row in &card.rows {
                writeln!(f, "  {:<width$}  {}", row.label, row.value)?;
            }
            writeln!(f, "  [ {} ]", card.reset_label)?;
        }
        Ok(())
    }
}
