use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DnsOptions {
    /// Upper bound for a single MX query, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DnsOptions {
    fn default() -> Self {
        Self { timeout_ms: 3_000 }
    }
}

impl DnsOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
