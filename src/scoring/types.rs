use std::fmt;

use serde::{Deserialize, Serialize};

use crate::smtp_verify::ProbeOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Valid,
    Doubtful,
    Invalid,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Valid => "Valid",
            Self::Doubtful => "Doubtful",
            Self::Invalid => "Invalid",
        })
    }
}

/// SMTP stage outcome as seen by the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmtpSignal {
    NotAttempted,
    Accepted,
    Rejected { code: u16 },
    Undetermined { reason: String },
}

impl From<ProbeOutcome> for SmtpSignal {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Accepted { .. } => Self::Accepted,
            ProbeOutcome::Rejected { code, .. } => Self::Rejected { code },
            ProbeOutcome::Undetermined(reason) => Self::Undetermined { reason },
        }
    }
}

/// Everything the pipeline learned about one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub syntax_ok: bool,
    pub syntax_errors: Vec<String>,
    pub mx_found: bool,
    /// Why no exchanger was found, when known.
    pub mx_note: Option<String>,
    pub disposable: bool,
    pub role_based: bool,
    pub catch_all: bool,
    pub smtp: SmtpSignal,
}

impl SignalSet {
    pub fn syntax_failed(errors: Vec<String>) -> Self {
        Self {
            syntax_ok: false,
            syntax_errors: errors,
            mx_found: false,
            mx_note: None,
            disposable: false,
            role_based: false,
            catch_all: false,
            smtp: SmtpSignal::NotAttempted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub score: u8,
    pub classification: Classification,
    pub reasons: Vec<String>,
}
