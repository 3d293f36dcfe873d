use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

/// An address that passed the syntax check, split into its two halves.
///
/// The domain is lower-cased; the local part keeps its original case since
/// mail servers are free to treat it case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub original: String,
    pub local: String,
    pub domain: String,
}

impl ParsedAddress {
    pub fn address(&self) -> String {
        format!("{}@{}", self.local, self.domain)
    }

    pub fn with_domain(&self, domain: impl Into<String>) -> Self {
        Self {
            original: self.original.clone(),
            local: self.local.clone(),
            domain: domain.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("invalid syntax: {}", reasons.join("; "))]
    InvalidSyntax { reasons: Vec<String> },
}
