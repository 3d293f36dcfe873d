use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::smtp_verify::error::SmtpVerifyError;
use crate::smtp_verify::options::SmtpProbeOptions;
use crate::smtp_verify::session::SmtpSession;
use crate::smtp_verify::types::{CatchAllStatus, ProbeOutcome, ProbeStage, SmtpReply};
use crate::smtp_verify::util::random_local_part;

/// Asks an exchanger whether it would take mail for `recipient`.
#[async_trait]
pub trait RecipientProber: Send + Sync {
    async fn probe(&self, exchanger: &str, recipient: &str) -> ProbeOutcome;
}

/// Probes over real TCP connections.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    options: SmtpProbeOptions,
}

impl SmtpProber {
    pub fn new(options: SmtpProbeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SmtpProbeOptions {
        &self.options
    }
}

#[async_trait]
impl RecipientProber for SmtpProber {
    async fn probe(&self, exchanger: &str, recipient: &str) -> ProbeOutcome {
        let connected = SmtpSession::connect(
            exchanger,
            self.options.port,
            self.options.connect_timeout(),
            self.options.command_timeout(),
        )
        .await;
        let mut session = match connected {
            Ok(session) => session,
            Err(err) => {
                debug!(exchanger, recipient, error = %err, "smtp connect failed");
                return ProbeOutcome::Undetermined(err.to_string());
            }
        };

        let outcome = run_dialogue(&mut session, &self.options, recipient).await;
        debug!(
            exchanger,
            recipient,
            %outcome,
            transcript = ?session.transcript,
            "smtp probe finished"
        );
        outcome
    }
}

/// Runs greeting → EHLO/HELO → MAIL FROM → RCPT TO, then always QUITs.
pub(crate) async fn run_dialogue<S>(
    session: &mut SmtpSession<S>,
    options: &SmtpProbeOptions,
    recipient: &str,
) -> ProbeOutcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let outcome = match converse(session, options, recipient).await {
        Ok(outcome) => outcome,
        Err(err) => ProbeOutcome::Undetermined(err.to_string()),
    };
    session.quit().await;
    outcome
}

async fn converse<S>(
    session: &mut SmtpSession<S>,
    options: &SmtpProbeOptions,
    recipient: &str,
) -> Result<ProbeOutcome, SmtpVerifyError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let banner = session.read_banner().await?;
    if !banner.is_positive_completion() {
        return Ok(ProbeOutcome::Undetermined(format!(
            "greeting refused ({})",
            banner.code
        )));
    }

    let helo = options.helo_name();
    let ehlo = session
        .send_command(&format!("EHLO {helo}"), ProbeStage::Ehlo)
        .await?;
    if ehlo.is_permanent_failure() {
        // serveurs anciens : EHLO inconnu, on retente en HELO
        let reply = session
            .send_command(&format!("HELO {helo}"), ProbeStage::Helo)
            .await?;
        if !reply.is_positive_completion() {
            return Ok(ProbeOutcome::Undetermined(format!(
                "HELO refused ({})",
                reply.code
            )));
        }
    } else if !ehlo.is_positive_completion() {
        return Ok(ProbeOutcome::Undetermined(format!(
            "EHLO refused ({})",
            ehlo.code
        )));
    }

    let mail = session
        .send_command(
            &format!("MAIL FROM:{}", options.envelope_sender()),
            ProbeStage::MailFrom,
        )
        .await?;
    if !mail.is_positive_completion() {
        return Ok(ProbeOutcome::Undetermined(format!(
            "MAIL FROM refused ({})",
            mail.code
        )));
    }

    let rcpt = session
        .send_command(&format!("RCPT TO:<{recipient}>"), ProbeStage::RcptTo)
        .await?;
    Ok(classify_recipient(&rcpt))
}

pub fn classify_recipient(reply: &SmtpReply) -> ProbeOutcome {
    if reply.is_positive_completion() {
        ProbeOutcome::Accepted { code: reply.code }
    } else if reply.is_permanent_failure() {
        ProbeOutcome::Rejected {
            code: reply.code,
            message: reply.message.clone(),
        }
    } else if reply.is_transient_failure() {
        ProbeOutcome::Undetermined(format!("temporary failure {}", reply.code))
    } else {
        ProbeOutcome::Undetermined(format!("unexpected response {}", reply.code))
    }
}

/// Probes a synthetic recipient at `domain` to find out whether the
/// exchanger accepts everything.
pub async fn probe_catch_all<P>(prober: &P, exchanger: &str, domain: &str) -> CatchAllStatus
where
    P: RecipientProber + ?Sized,
{
    let synthetic = format!("{}@{domain}", random_local_part());
    match prober.probe(exchanger, &synthetic).await {
        ProbeOutcome::Accepted { .. } => CatchAllStatus::Detected,
        ProbeOutcome::Rejected { .. } => CatchAllStatus::NotDetected,
        ProbeOutcome::Undetermined(reason) => CatchAllStatus::Undetermined(reason),
    }
}
