use thiserror::Error;

use crate::config::ConfigError;

/// Systemic failures: raised before any address is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
