use std::time::Duration;

use serde::Deserialize;

/// Configuration knobs for the SMTP probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpProbeOptions {
    pub port: u16,
    /// Name announced in `EHLO`/`HELO`.
    pub helo_name: String,
    /// Placeholder envelope sender. Never a real mailbox: nothing is sent.
    pub mail_from: String,
    pub connect_timeout_ms: u64,
    /// Applies to each command/reply round-trip, banner included.
    pub command_timeout_ms: u64,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_name: "localhost".to_string(),
            mail_from: "probe@example.com".to_string(),
            connect_timeout_ms: 5_000,
            command_timeout_ms: 5_000,
        }
    }
}

impl SmtpProbeOptions {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn helo_name(&self) -> &str {
        let trimmed = self.helo_name.trim();
        if trimmed.is_empty() { "localhost" } else { trimmed }
    }

    /// `MAIL FROM` argument; an empty sender yields the null reverse-path.
    pub fn envelope_sender(&self) -> String {
        format!("<{}>", self.mail_from.trim())
    }
}
