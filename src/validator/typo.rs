use std::collections::HashMap;

use crate::config::ConfigError;
use crate::config::defaults::TYPO_CORRECTIONS;

/// Static misspelling → domain corrections.
///
/// Construction guarantees no target is itself a misspelling, so
/// [`TypoTable::normalize`] is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypoTable {
    corrections: HashMap<String, String>,
}

impl TypoTable {
    pub fn new<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let corrections: HashMap<String, String> = entries
            .into_iter()
            .map(|(from, to)| {
                (
                    from.into().trim().to_ascii_lowercase(),
                    to.into().trim().to_ascii_lowercase(),
                )
            })
            .collect();

        for (from, to) in &corrections {
            if from == to {
                return Err(ConfigError::TypoSelfMapping(from.clone()));
            }
            if corrections.contains_key(to) {
                return Err(ConfigError::TypoChain {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }
        Ok(Self { corrections })
    }

    pub fn builtin() -> Self {
        let corrections = TYPO_CORRECTIONS
            .entries()
            .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
            .collect();
        Self { corrections }
    }

    /// Returns the corrected domain when `domain` is a known misspelling.
    pub fn correct(&self, domain: &str) -> Option<&str> {
        self.corrections
            .get(&domain.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Lower-cases `domain` and applies the correction, if any.
    pub fn normalize(&self, domain: &str) -> String {
        let lower = domain.to_ascii_lowercase();
        match self.corrections.get(&lower) {
            Some(fixed) => fixed.clone(),
            None => lower,
        }
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}
