use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::probe::run_dialogue;
use super::session::parse_reply_line;
use super::{
    CatchAllStatus, ProbeOutcome, ProbeStage, RecipientProber, SmtpProbeOptions, SmtpProber,
    SmtpReply, SmtpSession, SmtpVerifyError, classify_recipient, probe_catch_all,
};

type ProbeFn = dyn Fn(&str, &str) -> ProbeOutcome + Send + Sync;

/// Prober double answering from a closure; records every recipient asked.
pub(crate) struct StubProber {
    on_probe: Box<ProbeFn>,
    calls: AtomicUsize,
    recipients: Mutex<Vec<String>>,
    delay: Duration,
}

impl StubProber {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> ProbeOutcome + Send + Sync + 'static,
    {
        Self {
            on_probe: Box::new(f),
            calls: AtomicUsize::new(0),
            recipients: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn recipients(&self) -> Vec<String> {
        self.recipients.lock().expect("recipients lock").clone()
    }
}

#[async_trait]
impl RecipientProber for StubProber {
    async fn probe(&self, exchanger: &str, recipient: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recipients
            .lock()
            .expect("recipients lock")
            .push(recipient.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.on_probe)(exchanger, recipient)
    }
}

fn options() -> SmtpProbeOptions {
    SmtpProbeOptions {
        helo_name: "probe.test".to_string(),
        command_timeout_ms: 500,
        ..SmtpProbeOptions::default()
    }
}

/// Plays the server side: sends `banner`, then for each step reads one
/// command, checks its prefix and answers.
fn scripted_server(
    stream: DuplexStream,
    banner: &'static str,
    steps: Vec<(&'static str, &'static str)>,
) -> JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let mut stream = BufReader::new(stream);
        stream
            .get_mut()
            .write_all(banner.as_bytes())
            .await
            .expect("write banner");
        let mut received = Vec::new();
        for (expected, reply) in steps {
            let mut line = String::new();
            if stream.read_line(&mut line).await.expect("read command") == 0 {
                break;
            }
            let line = line.trim_end().to_string();
            assert!(line.starts_with(expected), "expected {expected}, got {line}");
            received.push(line);
            stream
                .get_mut()
                .write_all(reply.as_bytes())
                .await
                .expect("write reply");
        }
        received
    })
}

async fn dialogue(
    banner: &'static str,
    steps: Vec<(&'static str, &'static str)>,
    recipient: &str,
) -> (ProbeOutcome, Vec<String>) {
    let (client, server) = tokio::io::duplex(4096);
    let handle = scripted_server(server, banner, steps);
    let mut session = SmtpSession::new(client, "mx.test", Duration::from_millis(500));
    let outcome = run_dialogue(&mut session, &options(), recipient).await;
    let received = handle.await.expect("server task");
    (outcome, received)
}

#[tokio::test]
async fn accepted_recipient() {
    let (outcome, received) = dialogue(
        "220 mx.test ESMTP\r\n",
        vec![
            ("EHLO", "250-mx.test\r\n250-SIZE 1000000\r\n250 HELP\r\n"),
            ("MAIL FROM", "250 2.1.0 ok\r\n"),
            ("RCPT TO", "250 2.1.5 ok\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
        "alice@example.com",
    )
    .await;

    assert_eq!(outcome, ProbeOutcome::Accepted { code: 250 });
    assert_eq!(
        received,
        vec![
            "EHLO probe.test",
            "MAIL FROM:<probe@example.com>",
            "RCPT TO:<alice@example.com>",
            "QUIT",
        ]
    );
}

#[tokio::test]
async fn rejected_recipient_keeps_code_and_text() {
    let (outcome, received) = dialogue(
        "220 mx.test ESMTP\r\n",
        vec![
            ("EHLO", "250 mx.test\r\n"),
            ("MAIL FROM", "250 ok\r\n"),
            ("RCPT TO", "550 5.1.1 no such user\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
        "ghost@example.com",
    )
    .await;

    assert_eq!(
        outcome,
        ProbeOutcome::Rejected {
            code: 550,
            message: "5.1.1 no such user".to_string(),
        }
    );
    assert_eq!(received.last().map(String::as_str), Some("QUIT"));
}

#[tokio::test]
async fn greylisting_is_undetermined() {
    let (outcome, _) = dialogue(
        "220 mx.test ESMTP\r\n",
        vec![
            ("EHLO", "250 mx.test\r\n"),
            ("MAIL FROM", "250 ok\r\n"),
            ("RCPT TO", "451 4.7.1 try again later\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
        "bob@example.com",
    )
    .await;

    assert_eq!(
        outcome,
        ProbeOutcome::Undetermined("temporary failure 451".to_string())
    );
}

#[tokio::test]
async fn ehlo_rejection_falls_back_to_helo() {
    let (outcome, received) = dialogue(
        "220 old.mx.test\r\n",
        vec![
            ("EHLO", "502 5.5.1 command not recognized\r\n"),
            ("HELO", "250 old.mx.test\r\n"),
            ("MAIL FROM", "250 ok\r\n"),
            ("RCPT TO", "250 ok\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
        "carol@example.com",
    )
    .await;

    assert_eq!(outcome, ProbeOutcome::Accepted { code: 250 });
    assert_eq!(received[1], "HELO probe.test");
}

#[tokio::test]
async fn refused_banner_still_quits() {
    let (outcome, received) = dialogue(
        "554 no service here\r\n",
        vec![("QUIT", "221 bye\r\n")],
        "dave@example.com",
    )
    .await;

    assert_eq!(
        outcome,
        ProbeOutcome::Undetermined("greeting refused (554)".to_string())
    );
    assert_eq!(received, vec!["QUIT"]);
}

#[tokio::test]
async fn refused_sender_is_undetermined() {
    let (outcome, received) = dialogue(
        "220 mx.test\r\n",
        vec![
            ("EHLO", "250 mx.test\r\n"),
            ("MAIL FROM", "553 sender rejected\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
        "erin@example.com",
    )
    .await;

    assert_eq!(
        outcome,
        ProbeOutcome::Undetermined("MAIL FROM refused (553)".to_string())
    );
    assert!(!received.iter().any(|cmd| cmd.starts_with("RCPT")));
}

#[tokio::test]
async fn disconnect_is_undetermined() {
    let (outcome, received) = dialogue("220 mx.test\r\n", Vec::new(), "frank@example.com").await;
    assert!(received.is_empty());
    assert!(matches!(outcome, ProbeOutcome::Undetermined(_)));
}

#[tokio::test(start_paused = true)]
async fn silent_server_times_out() {
    let (client, mut server) = tokio::io::duplex(4096);
    server
        .write_all(b"220 mx.test\r\n")
        .await
        .expect("write banner");

    let mut session = SmtpSession::new(client, "mx.test", Duration::from_millis(500));
    let outcome = run_dialogue(&mut session, &options(), "gina@example.com").await;

    assert_eq!(
        outcome,
        ProbeOutcome::Undetermined(
            SmtpVerifyError::Timeout {
                stage: ProbeStage::Ehlo
            }
            .to_string()
        )
    );
    drop(server);
}

#[tokio::test]
async fn multiline_reply_is_joined() {
    let (client, server) = tokio::io::duplex(4096);
    let handle = scripted_server(
        server,
        "220-mx.test first\r\n220 mx.test second\r\n",
        vec![("EHLO", "250-mx.test\r\n250-PIPELINING\r\n250 8BITMIME\r\n")],
    );
    let mut session = SmtpSession::new(client, "mx.test", Duration::from_millis(500));

    let banner = session.read_banner().await.expect("banner");
    assert_eq!(banner.code, 220);
    assert_eq!(banner.message, "mx.test first\nmx.test second");

    let reply = session
        .send_command("EHLO probe.test", ProbeStage::Ehlo)
        .await
        .expect("ehlo");
    assert_eq!(reply.code, 250);
    assert_eq!(reply.message, "mx.test\nPIPELINING\n8BITMIME");
    assert!(
        session
            .transcript
            .iter()
            .any(|line| line == "[mx.test] C: EHLO probe.test")
    );
    handle.await.expect("server task");
}

#[tokio::test]
async fn inconsistent_codes_are_a_protocol_error() {
    let (client, mut server) = tokio::io::duplex(4096);
    server
        .write_all(b"220-mx.test\r\n250 mixed\r\n")
        .await
        .expect("write banner");
    let mut session = SmtpSession::new(client, "mx.test", Duration::from_millis(500));

    let err = session.read_banner().await.expect_err("codes differ");
    assert!(matches!(err, SmtpVerifyError::Protocol(_)));
}

#[test]
fn parse_reply_line_splits_fields() {
    assert_eq!(
        parse_reply_line("250-SIZE 100\r\n").expect("parse"),
        (250, true, "SIZE 100".to_string())
    );
    assert_eq!(
        parse_reply_line("221 bye\r\n").expect("parse"),
        (221, false, "bye".to_string())
    );
    assert_eq!(
        parse_reply_line("250\r\n").expect("parse"),
        (250, false, String::new())
    );
    assert!(parse_reply_line("2x0 nope").is_err());
    assert!(parse_reply_line("25").is_err());
}

#[test]
fn classify_recipient_by_code_class() {
    let reply = |code| SmtpReply {
        code,
        message: "text".to_string(),
    };
    assert_eq!(classify_recipient(&reply(251)), ProbeOutcome::Accepted { code: 251 });
    assert!(matches!(
        classify_recipient(&reply(553)),
        ProbeOutcome::Rejected { code: 553, .. }
    ));
    assert!(matches!(
        classify_recipient(&reply(452)),
        ProbeOutcome::Undetermined(_)
    ));
    assert!(matches!(
        classify_recipient(&reply(354)),
        ProbeOutcome::Undetermined(_)
    ));
}

#[tokio::test]
async fn catch_all_probe_uses_synthetic_recipient() {
    let prober = StubProber::new(|_, _| ProbeOutcome::Accepted { code: 250 });
    let status = probe_catch_all(&prober, "mx.example.com", "example.com").await;
    assert_eq!(status, CatchAllStatus::Detected);

    let recipients = prober.recipients();
    assert_eq!(recipients.len(), 1);
    let (local, domain) = recipients[0].split_once('@').expect("address");
    assert_eq!(domain, "example.com");
    let suffix = local.strip_prefix("verify-").expect("prefix");
    assert_eq!(suffix.len(), 24);
    assert!(
        suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );
}

#[tokio::test]
async fn catch_all_probe_maps_outcomes() {
    let rejecting = StubProber::new(|_, _| ProbeOutcome::Rejected {
        code: 550,
        message: "unknown".to_string(),
    });
    assert_eq!(
        probe_catch_all(&rejecting, "mx", "example.com").await,
        CatchAllStatus::NotDetected
    );

    let flaky = StubProber::new(|_, _| ProbeOutcome::Undetermined("timeout".to_string()));
    assert_eq!(
        probe_catch_all(&flaky, "mx", "example.com").await,
        CatchAllStatus::Undetermined("timeout".to_string())
    );
    assert_eq!(flaky.calls(), 1);
}

#[tokio::test]
async fn smtp_prober_over_loopback() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        let mut stream = BufReader::new(socket);
        stream
            .get_mut()
            .write_all(b"220 loopback\r\n")
            .await
            .expect("banner");
        for reply in ["250 hi\r\n", "250 ok\r\n", "250 ok\r\n", "221 bye\r\n"] {
            let mut line = String::new();
            if stream.read_line(&mut line).await.expect("read") == 0 {
                break;
            }
            stream
                .get_mut()
                .write_all(reply.as_bytes())
                .await
                .expect("reply");
        }
    });

    let prober = SmtpProber::new(SmtpProbeOptions {
        port,
        ..options()
    });
    let outcome = prober.probe("127.0.0.1", "henry@example.com").await;
    assert_eq!(outcome, ProbeOutcome::Accepted { code: 250 });
    server.await.expect("server task");
}
