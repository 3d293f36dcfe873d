use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
    #[error("worker pool size must be at least 1")]
    NoWorkers,
    #[error("timeout `{field}` must be greater than zero")]
    ZeroTimeout { field: &'static str },
    #[error("scoring thresholds inconsistent: doubtful {doubtful} > valid {valid} or valid > 100")]
    Thresholds { doubtful: i32, valid: i32 },
    #[error("scoring weight `{field}` = {value} is outside -{max}..={max}", max = crate::scoring::MAX_WEIGHT)]
    Weight { field: &'static str, value: i32 },
    #[error("typo correction {from} -> {to} maps onto another corrected domain")]
    TypoChain { from: String, to: String },
    #[error("typo correction for {0} maps the domain onto itself")]
    TypoSelfMapping(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(source: toml::de::Error) -> Self {
        Self::Parse { source }
    }
}
