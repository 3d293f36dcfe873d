#![forbid(unsafe_code)]
//! mailverify_lib : vérification en masse de la délivrabilité e-mail
//!
//! Pipeline per address: syntax check, domain typo correction, MX lookup,
//! disposable/role heuristics, optional SMTP probing (catch-all + recipient),
//! then a weighted score and a `Valid` / `Doubtful` / `Invalid` verdict.
//! [`Verifier::verify_batch`] runs it over a list with bounded concurrency.

pub mod batch;
pub mod config;
pub mod heuristics;
pub mod mx;
pub mod scoring;
pub mod smtp_verify;
pub mod validator;

pub use batch::{
    BatchError, BatchOptions, BatchReport, CancelHandle, NoProgress, ProgressSink,
    VerificationResult, Verifier,
};
pub use config::{ConfigError, VerifierConfig};
pub use heuristics::HeuristicSets;
pub use mx::{DomainCache, DomainRecord, LookupMx, MxError, MxRecord, MxStatus};
pub use scoring::{Classification, ScoringPolicy, SignalSet, SmtpSignal, Verdict, score};
pub use smtp_verify::{CatchAllStatus, ProbeOutcome, RecipientProber, SmtpProber};
pub use validator::{
    EmailError, ParsedAddress, TypoTable, ValidationReport, parse_email, validate_email,
};
