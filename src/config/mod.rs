//! Runtime configuration for the verification pipeline.
//!
//! Every section has defaults, so an empty TOML document (or
//! [`VerifierConfig::default`]) yields a working setup. Tables declared in a
//! file are merged with the built-in ones unless `use_defaults = false`.

pub(crate) mod defaults;
mod error;

pub use error::ConfigError;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::heuristics::HeuristicSets;
use crate::mx::DnsOptions;
use crate::scoring::ScoringPolicy;
use crate::smtp_verify::SmtpProbeOptions;
use crate::validator::TypoTable;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    pub batch: BatchConfig,
    pub dns: DnsOptions,
    pub smtp: SmtpProbeOptions,
    pub scoring: ScoringPolicy,
    pub heuristics: HeuristicsConfig,
    pub typos: TyposConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of concurrent workers draining the address list.
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { workers: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicsConfig {
    /// Keep the built-in disposable domains and role prefixes.
    pub use_defaults: bool,
    pub disposable_domains: Vec<String>,
    pub role_prefixes: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            disposable_domains: Vec::new(),
            role_prefixes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TyposConfig {
    pub use_defaults: bool,
    pub corrections: BTreeMap<String, String>,
}

impl Default for TyposConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            corrections: BTreeMap::new(),
        }
    }
}

impl VerifierConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(ConfigError::parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.dns.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "dns.timeout_ms",
            });
        }
        if self.smtp.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "smtp.connect_timeout_ms",
            });
        }
        if self.smtp.command_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "smtp.command_timeout_ms",
            });
        }
        self.scoring.validate()?;
        self.typo_table().map(|_| ())
    }

    pub fn heuristic_sets(&self) -> HeuristicSets {
        let mut sets = if self.heuristics.use_defaults {
            HeuristicSets::builtin()
        } else {
            HeuristicSets::empty()
        };
        sets.extend_disposable(self.heuristics.disposable_domains.iter().cloned());
        sets.extend_roles(self.heuristics.role_prefixes.iter().cloned());
        sets
    }

    pub fn typo_table(&self) -> Result<TypoTable, ConfigError> {
        let mut entries: BTreeMap<String, String> = BTreeMap::new();
        if self.typos.use_defaults {
            for (from, to) in defaults::TYPO_CORRECTIONS.entries() {
                entries.insert((*from).to_string(), (*to).to_string());
            }
        }
        entries.extend(
            self.typos
                .corrections
                .iter()
                .map(|(from, to)| (from.clone(), to.clone())),
        );
        TypoTable::new(entries)
    }
}
