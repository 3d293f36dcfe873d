//! Turns the signals gathered for one address into a score and a verdict.
//!
//! The scorer is a pure function: same [`SignalSet`] and [`ScoringPolicy`],
//! same [`Verdict`].

mod policy;
mod types;

pub use policy::{MAX_WEIGHT, ScoringPolicy};
pub use types::{Classification, SignalSet, SmtpSignal, Verdict};

pub(crate) const REASON_INVALID_SYNTAX: &str = "invalid syntax";
pub(crate) const REASON_NO_MX: &str = "no mail-exchange record";
pub(crate) const REASON_DISPOSABLE: &str = "disposable email domain";
pub(crate) const REASON_ROLE: &str = "role-based address";
pub(crate) const REASON_CATCH_ALL: &str = "domain accepts all recipients (catch-all)";
pub(crate) const REASON_CATCH_ALL_ACCEPT: &str =
    "recipient accepted but not conclusive on a catch-all domain";

pub fn score(signals: &SignalSet, policy: &ScoringPolicy) -> Verdict {
    if !signals.syntax_ok {
        let mut reasons = vec![REASON_INVALID_SYNTAX.to_string()];
        reasons.extend(signals.syntax_errors.iter().cloned());
        return Verdict {
            score: 0,
            classification: Classification::Invalid,
            reasons,
        };
    }

    // policies built in code skip validate(): saturate rather than overflow
    let mut total = policy.base;
    let mut reasons = Vec::new();

    if signals.mx_found {
        total = total.saturating_add(policy.mx_found);
    } else {
        total = total.saturating_add(policy.mx_missing);
        reasons.push(match &signals.mx_note {
            Some(note) => format!("{REASON_NO_MX} ({note})"),
            None => REASON_NO_MX.to_string(),
        });
    }

    if signals.disposable {
        total = total.saturating_add(policy.disposable);
        reasons.push(REASON_DISPOSABLE.to_string());
    }
    if signals.role_based {
        total = total.saturating_add(policy.role_based);
        reasons.push(REASON_ROLE.to_string());
    }

    // le catch-all n'a de sens que si la sonde SMTP a tourné
    let catch_all = signals.catch_all && signals.smtp != SmtpSignal::NotAttempted;
    if catch_all {
        total = total.saturating_add(policy.catch_all);
        reasons.push(REASON_CATCH_ALL.to_string());
    }

    let mut rejected = false;
    match &signals.smtp {
        SmtpSignal::NotAttempted => {}
        SmtpSignal::Accepted if catch_all => {
            total = total.saturating_add(policy.smtp_accepted_catch_all);
            reasons.push(REASON_CATCH_ALL_ACCEPT.to_string());
        }
        SmtpSignal::Accepted => total = total.saturating_add(policy.smtp_accepted),
        SmtpSignal::Rejected { code } => {
            rejected = true;
            total = total.saturating_add(policy.smtp_rejected);
            reasons.push(format!("recipient rejected by mail server ({code})"));
        }
        SmtpSignal::Undetermined { reason } => {
            total = total.saturating_add(policy.smtp_undetermined);
            reasons.push(format!("smtp check inconclusive: {reason}"));
        }
    }

    let score = total.clamp(0, 100) as u8;
    let mut classification = policy.classify(score);
    if signals.disposable && classification == Classification::Valid {
        classification = Classification::Doubtful;
    }
    if rejected {
        classification = Classification::Invalid;
    }

    Verdict {
        score,
        classification,
        reasons,
    }
}
