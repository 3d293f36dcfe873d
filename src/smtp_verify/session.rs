use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::error::SmtpVerifyError;
use super::types::{ProbeStage, SmtpReply};

const MAX_REPLY_LINES: usize = 64;
const MAX_LINE_LEN: u64 = 1024;

/// One SMTP client connection. Every read and write is bounded by the
/// command timeout.
pub struct SmtpSession<S> {
    host: String,
    stream: BufReader<S>,
    command_timeout: Duration,
    pub transcript: Vec<String>,
}

impl SmtpSession<TcpStream> {
    pub async fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, SmtpVerifyError> {
        let stream = timeout(connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| SmtpVerifyError::Timeout {
                stage: ProbeStage::Connect,
            })?
            .map_err(|source| SmtpVerifyError::Connect {
                host: host.to_string(),
                source,
            })?;
        Ok(Self::new(stream, host, command_timeout))
    }
}

impl<S> SmtpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, host: &str, command_timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            stream: BufReader::new(stream),
            command_timeout,
            transcript: Vec::new(),
        }
    }

    pub async fn read_banner(&mut self) -> Result<SmtpReply, SmtpVerifyError> {
        self.read_reply(ProbeStage::Greeting).await
    }

    pub async fn send_command(
        &mut self,
        command: &str,
        stage: ProbeStage,
    ) -> Result<SmtpReply, SmtpVerifyError> {
        self.record("C", command);
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");

        let writer = self.stream.get_mut();
        let written = timeout(self.command_timeout, async {
            writer.write_all(&line).await?;
            writer.flush().await
        })
        .await
        .map_err(|_| SmtpVerifyError::Timeout { stage })?;
        written.map_err(|err| SmtpVerifyError::io(stage, err))?;

        self.read_reply(stage).await
    }

    /// Sends `QUIT` and closes the write side. Failures are only logged in
    /// the transcript: the connection is released either way.
    pub async fn quit(&mut self) {
        if let Err(err) = self.send_command("QUIT", ProbeStage::Quit).await {
            self.record("!", &err.to_string());
        }
        let _ = timeout(self.command_timeout, self.stream.get_mut().shutdown()).await;
    }

    async fn read_reply(&mut self, stage: ProbeStage) -> Result<SmtpReply, SmtpVerifyError> {
        let reply = timeout(self.command_timeout, read_reply_from(&mut self.stream, stage))
            .await
            .map_err(|_| SmtpVerifyError::Timeout { stage })??;
        self.record_reply(&reply);
        Ok(reply)
    }

    fn record(&mut self, direction: &str, message: &str) {
        self.transcript
            .push(format!("[{}] {direction}: {message}", self.host));
    }

    fn record_reply(&mut self, reply: &SmtpReply) {
        if reply.message.is_empty() {
            self.record("S", &reply.code.to_string());
        } else {
            for line in reply.message.lines() {
                self.record("S", &format!("{} {line}", reply.code));
            }
        }
    }
}

async fn read_reply_from<R>(reader: &mut R, stage: ProbeStage) -> Result<SmtpReply, SmtpVerifyError>
where
    R: AsyncBufRead + Unpin,
{
    let mut code: Option<u16> = None;
    let mut lines = Vec::new();
    loop {
        if lines.len() >= MAX_REPLY_LINES {
            return Err(SmtpVerifyError::protocol("reply has too many lines"));
        }
        let mut raw = String::new();
        let read = (&mut *reader)
            .take(MAX_LINE_LEN)
            .read_line(&mut raw)
            .await
            .map_err(|err| SmtpVerifyError::io(stage, err))?;
        if read == 0 {
            return Err(SmtpVerifyError::Closed { stage });
        }
        if !raw.ends_with('\n') && read as u64 >= MAX_LINE_LEN {
            return Err(SmtpVerifyError::protocol("reply line too long"));
        }

        let (parsed_code, continuation, text) = parse_reply_line(&raw)?;
        match code {
            Some(existing) if existing != parsed_code => {
                return Err(SmtpVerifyError::protocol(format!(
                    "inconsistent reply codes: {existing} vs {parsed_code}"
                )));
            }
            Some(_) => {}
            None => code = Some(parsed_code),
        }
        lines.push(text);
        if !continuation {
            break;
        }
    }
    let code = code.ok_or_else(|| SmtpVerifyError::protocol("reply missing status code"))?;
    Ok(SmtpReply {
        code,
        message: lines.join("\n"),
    })
}

/// Splits one reply line into `(code, has_continuation, text)`.
pub(crate) fn parse_reply_line(raw: &str) -> Result<(u16, bool, String), SmtpVerifyError> {
    let line = raw.trim_end_matches(['\r', '\n']);
    let code_part = line
        .get(..3)
        .ok_or_else(|| SmtpVerifyError::protocol(format!("invalid reply: '{line}'")))?;
    if !code_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SmtpVerifyError::protocol(format!(
            "invalid status code: '{code_part}'"
        )));
    }
    let code = code_part
        .parse::<u16>()
        .map_err(|_| SmtpVerifyError::protocol(format!("invalid status code: '{code_part}'")))?;
    let continuation = line.as_bytes().get(3).copied() == Some(b'-');
    let text = line.get(4..).unwrap_or_default().to_string();
    Ok((code, continuation, text))
}
