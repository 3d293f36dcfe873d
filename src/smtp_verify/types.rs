use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStage {
    Connect,
    Greeting,
    Ehlo,
    Helo,
    MailFrom,
    RcptTo,
    Quit,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Ehlo => "EHLO",
            Self::Helo => "HELO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Quit => "QUIT",
        })
    }
}

/// A raw SMTP reply, preserving the numeric status code and message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// What the server said about one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// 2xx on `RCPT TO`: the server is currently willing to take the recipient.
    Accepted { code: u16 },
    /// 5xx on `RCPT TO`.
    Rejected { code: u16, message: String },
    /// Anything else: 4xx, timeout, refused connection, protocol trouble.
    Undetermined(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { code } => write!(f, "accepted ({code})"),
            Self::Rejected { code, message } => write!(f, "rejected ({code} {message})"),
            Self::Undetermined(reason) => write!(f, "undetermined ({reason})"),
        }
    }
}

/// Catch-all behaviour of a domain, probed once per batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchAllStatus {
    /// SMTP probing disabled, or no exchanger to talk to.
    NotProbed,
    /// A synthetic recipient was accepted.
    Detected,
    /// The synthetic recipient was rejected.
    NotDetected,
    Undetermined(String),
}

impl CatchAllStatus {
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Self::Detected)
    }
}
