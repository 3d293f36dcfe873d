use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::heuristics::HeuristicSets;
use crate::mx::{DomainCache, DomainRecord, LookupMx, MxResolution, MxStatus, resolve_with};
use crate::scoring::{Classification, ScoringPolicy, SignalSet, SmtpSignal, Verdict, score};
use crate::smtp_verify::{CatchAllStatus, RecipientProber, probe_catch_all};
use crate::validator::{EmailError, TypoTable, parse_email};

use super::types::VerificationResult;

/// The per-address chain: syntax → typo fix → domain facts → SMTP → score.
pub(crate) struct Pipeline {
    pub(crate) heuristics: HeuristicSets,
    pub(crate) typos: TypoTable,
    pub(crate) policy: ScoringPolicy,
    pub(crate) resolver: Arc<dyn LookupMx>,
    pub(crate) prober: Arc<dyn RecipientProber>,
}

impl Pipeline {
    pub(crate) async fn verify(&self, raw: &str, cache: &DomainCache, smtp: bool) -> VerificationResult {
        let parsed = match parse_email(raw) {
            Ok(parsed) => parsed,
            Err(EmailError::InvalidSyntax { reasons }) => {
                debug!(address = raw, "syntax check failed");
                let verdict = score(&SignalSet::syntax_failed(reasons), &self.policy);
                return VerificationResult::new(raw, raw.trim().to_string(), verdict, Vec::new());
            }
        };

        let mut notes = Vec::new();
        let address = match self.typos.correct(&parsed.domain) {
            Some(fixed) => {
                debug!(from = %parsed.domain, to = fixed, "domain typo corrected");
                notes.push(format!("domain corrected from {} to {fixed}", parsed.domain));
                parsed.with_domain(fixed)
            }
            None => parsed,
        };

        let record = cache
            .get_or_populate(&address.domain, || self.populate_domain(&address.domain, smtp))
            .await;

        let smtp_signal = if !smtp {
            SmtpSignal::NotAttempted
        } else {
            match record.primary_exchanger() {
                Some(exchanger) => {
                    let outcome = self.prober.probe(exchanger, &address.address()).await;
                    debug!(address = %address.address(), exchanger, %outcome, "recipient probed");
                    SmtpSignal::from(outcome)
                }
                None => SmtpSignal::Undetermined {
                    reason: "no mail exchanger to probe".to_string(),
                },
            }
        };

        let signals = SignalSet {
            syntax_ok: true,
            syntax_errors: Vec::new(),
            mx_found: record.has_mx(),
            mx_note: match &record.resolution {
                MxResolution::Found => None,
                MxResolution::Missing { reason } => Some(reason.clone()),
            },
            disposable: record.disposable,
            role_based: self.heuristics.is_role_based(&address.local),
            catch_all: record.catch_all.is_catch_all(),
            smtp: smtp_signal,
        };
        let verdict = score(&signals, &self.policy);
        VerificationResult::new(raw, address.address(), verdict, notes)
    }

    /// Resolves the domain and, when SMTP is on, runs the catch-all probe.
    /// Called at most once per domain per batch through the cache, so it
    /// never unwinds: a panicking resolver or prober leaves a record behind.
    async fn populate_domain(&self, domain: &str, smtp: bool) -> DomainRecord {
        let resolved = AssertUnwindSafe(resolve_with(self.resolver.as_ref(), domain))
            .catch_unwind()
            .await;
        let (exchangers, resolution) = match resolved {
            Err(payload) => {
                let detail = super::panic_detail(payload.as_ref());
                warn!(domain, detail = %detail, "MX resolution panicked");
                (
                    Vec::new(),
                    MxResolution::Missing {
                        reason: format!("MX lookup failed: {detail}"),
                    },
                )
            }
            Ok(Ok(MxStatus::Records(records))) => (
                records.into_iter().map(|record| record.exchange).collect(),
                MxResolution::Found,
            ),
            Ok(Ok(MxStatus::NoRecords)) => (
                Vec::new(),
                MxResolution::Missing {
                    reason: "domain publishes no MX".to_string(),
                },
            ),
            Ok(Err(err)) => {
                debug!(domain, error = %err, "MX resolution failed");
                (
                    Vec::new(),
                    MxResolution::Missing {
                        reason: err.to_string(),
                    },
                )
            }
        };

        let catch_all = match exchangers.first() {
            Some(exchanger) if smtp => {
                let probe = probe_catch_all(self.prober.as_ref(), exchanger, domain);
                let probed = AssertUnwindSafe(probe).catch_unwind().await;
                probed.unwrap_or_else(|payload| {
                    let detail = super::panic_detail(payload.as_ref());
                    warn!(domain, detail = %detail, "catch-all probe panicked");
                    CatchAllStatus::Undetermined(format!("catch-all probe failed: {detail}"))
                })
            }
            _ => CatchAllStatus::NotProbed,
        };
        debug!(domain, ?catch_all, "domain record ready");

        DomainRecord {
            domain: domain.to_string(),
            exchangers,
            resolution,
            catch_all,
            disposable: self.heuristics.is_disposable(domain),
        }
    }

    /// Result recorded for an address whose verification blew up.
    pub(crate) fn failure(&self, raw: &str, detail: &str) -> VerificationResult {
        let verdict = Verdict {
            score: self.policy.doubtful_threshold.clamp(0, 100) as u8,
            classification: Classification::Doubtful,
            reasons: vec![format!("verification failed: {detail}")],
        };
        VerificationResult::new(raw, raw.trim().to_string(), verdict, Vec::new())
    }
}
