//! SMTP recipient probing.
//!
//! [`SmtpProber`] opens one plain SMTP session per probe and stops after
//! `RCPT TO`: nothing is ever sent. The [`RecipientProber`] trait is the seam
//! the batch executor talks to, and [`probe_catch_all`] reuses it with a
//! synthetic recipient to detect accept-everything domains.

mod error;
mod options;
mod probe;
mod session;
mod types;
mod util;

pub use error::SmtpVerifyError;
pub use options::SmtpProbeOptions;
pub use probe::{RecipientProber, SmtpProber, classify_recipient, probe_catch_all};
pub use session::SmtpSession;
pub use types::{CatchAllStatus, ProbeOutcome, ProbeStage, SmtpReply};

#[cfg(test)]
pub(crate) mod tests;
