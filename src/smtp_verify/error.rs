use thiserror::Error;

use super::types::ProbeStage;

#[derive(Debug, Error)]
pub enum SmtpVerifyError {
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out during {stage}")]
    Timeout { stage: ProbeStage },
    #[error("I/O error during {stage}: {source}")]
    Io {
        stage: ProbeStage,
        #[source]
        source: std::io::Error,
    },
    #[error("connection closed by server during {stage}")]
    Closed { stage: ProbeStage },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SmtpVerifyError {
    pub(crate) fn io(stage: ProbeStage, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
