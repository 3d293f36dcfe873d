use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

use super::types::Classification;

/// Bound on the absolute value of every weight. Twelve fields at this bound
/// stay far from `i32` overflow.
pub const MAX_WEIGHT: i32 = 1000;

/// Weights added to the score for each signal, plus the two thresholds.
/// Penalties are stored as negative numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringPolicy {
    pub base: i32,
    pub mx_found: i32,
    pub mx_missing: i32,
    pub disposable: i32,
    pub role_based: i32,
    pub catch_all: i32,
    pub smtp_accepted: i32,
    /// Replaces `smtp_accepted` when the domain accepts everything.
    pub smtp_accepted_catch_all: i32,
    pub smtp_rejected: i32,
    pub smtp_undetermined: i32,
    pub valid_threshold: i32,
    pub doubtful_threshold: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base: 20,
            mx_found: 40,
            mx_missing: -20,
            disposable: -20,
            role_based: -10,
            catch_all: -15,
            smtp_accepted: 40,
            smtp_accepted_catch_all: 0,
            smtp_rejected: -50,
            smtp_undetermined: -10,
            valid_threshold: 70,
            doubtful_threshold: 30,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.weights() {
            if !(-MAX_WEIGHT..=MAX_WEIGHT).contains(&value) {
                return Err(ConfigError::Weight { field, value });
            }
        }
        let ordered = 0 <= self.doubtful_threshold
            && self.doubtful_threshold <= self.valid_threshold
            && self.valid_threshold <= 100;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::Thresholds {
                doubtful: self.doubtful_threshold,
                valid: self.valid_threshold,
            })
        }
    }

    fn weights(&self) -> [(&'static str, i32); 10] {
        [
            ("base", self.base),
            ("mx_found", self.mx_found),
            ("mx_missing", self.mx_missing),
            ("disposable", self.disposable),
            ("role_based", self.role_based),
            ("catch_all", self.catch_all),
            ("smtp_accepted", self.smtp_accepted),
            ("smtp_accepted_catch_all", self.smtp_accepted_catch_all),
            ("smtp_rejected", self.smtp_rejected),
            ("smtp_undetermined", self.smtp_undetermined),
        ]
    }

    pub fn classify(&self, score: u8) -> Classification {
        let score = i32::from(score);
        if score >= self.valid_threshold {
            Classification::Valid
        } else if score >= self.doubtful_threshold {
            Classification::Doubtful
        } else {
            Classification::Invalid
        }
    }
}
