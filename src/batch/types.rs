use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::scoring::{Classification, Verdict};

/// Final outcome for one input address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The input exactly as given.
    pub original: String,
    /// Trimmed address, with the domain corrected when a typo was found.
    pub address: String,
    pub classification: Classification,
    pub score: u8,
    pub reasons: Vec<String>,
}

impl VerificationResult {
    pub(crate) fn new(original: &str, address: String, verdict: Verdict, notes: Vec<String>) -> Self {
        let mut reasons = notes;
        reasons.extend(verdict.reasons);
        Self {
            original: original.to_string(),
            address,
            classification: verdict.classification,
            score: verdict.score,
            reasons,
        }
    }

    pub fn is_corrected(&self) -> bool {
        self.original.trim() != self.address
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Run the catch-all and recipient probes.
    pub smtp: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { smtp: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Completed results, in input order.
    pub results: Vec<VerificationResult>,
    /// `true` when the run stopped before every address was dispatched.
    pub cancelled: bool,
    pub total: usize,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.results.len()
    }

    pub fn all_valid(&self) -> bool {
        self.results.len() == self.total
            && self
                .results
                .iter()
                .all(|r| r.classification == Classification::Valid)
    }
}

/// Receives `(completed, total)` after each finished address. Calls are
/// made from the collecting task only, with `completed` strictly increasing.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Stops dispatch of new addresses; in-flight ones still finish.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
