use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::reply::ReplyBuffer;
use super::{ProbeError, ProbeOptions, ProbeOutcome, Stage};

/// Opens the TCP connection to `exchange`, runs the transcript and closes
/// the socket on every exit path.
pub(crate) fn probe_exchange(
    recipient: &str,
    exchange: &str,
    options: &ProbeOptions,
) -> Result<ProbeOutcome, ProbeError> {
    let addrs = resolve_socket_addrs(exchange, options.port)?;
    let mut stream = connect(exchange, &addrs, options.timeout())?;
    let outcome = run_transcript(&mut stream, recipient, options);
    // The peer may already be gone; nothing left to report either way.
    stream.shutdown(Shutdown::Both).ok();
    outcome
}

fn resolve_socket_addrs(exchange: &str, port: u16) -> Result<Vec<SocketAddr>, ProbeError> {
    let unresolvable = |source| ProbeError::Unresolvable {
        host: exchange.to_string(),
        source,
    };
    let addrs: Vec<SocketAddr> = (exchange, port)
        .to_socket_addrs()
        .map_err(unresolvable)?
        .collect();
    if addrs.is_empty() {
        return Err(unresolvable(io::Error::new(
            io::ErrorKind::NotFound,
            "no socket address resolved",
        )));
    }
    Ok(addrs)
}

fn connect(
    host: &str,
    addrs: &[SocketAddr],
    timeout: Option<Duration>,
) -> Result<TcpStream, ProbeError> {
    let mut last_err = None;
    for addr in addrs {
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                tracing::debug!(exchange = host, peer = %addr, "socket connected");
                return arm_idle_timer(stream, timeout);
            }
            Err(err) => {
                tracing::debug!(exchange = host, peer = %addr, error = %err, "connect failed");
                last_err = Some(err);
            }
        }
    }
    let source = last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no socket address available",
        )
    });
    if is_timeout(&source) {
        return Err(ProbeError::Idle {
            stage: Stage::Greeting,
            replies: Vec::new(),
        });
    }
    Err(ProbeError::Refused {
        host: host.to_string(),
        source,
    })
}

fn arm_idle_timer(stream: TcpStream, timeout: Option<Duration>) -> Result<TcpStream, ProbeError> {
    let reset = |source| ProbeError::Reset {
        stage: Stage::Greeting,
        replies: Vec::new(),
        source,
    };
    stream.set_read_timeout(timeout).map_err(reset)?;
    stream.set_write_timeout(timeout).map_err(reset)?;
    Ok(stream)
}

/// Drives connect → EHLO → MAIL FROM → RCPT TO → QUIT over `stream`.
///
/// Stages 0-2 stop early on an unexpected reply code and still return the
/// replies gathered so far, including the rejecting one. The RCPT reply is
/// always followed by `QUIT`.
pub(crate) fn run_transcript<S>(
    stream: &mut S,
    recipient: &str,
    options: &ProbeOptions,
) -> Result<ProbeOutcome, ProbeError>
where
    S: Read + Write,
{
    let mut stage = Stage::Greeting;
    let mut buffer = ReplyBuffer::default();
    let mut replies: ProbeOutcome = Vec::with_capacity(5);
    let mut chunk = [0u8; 512];

    loop {
        let read = match stream.read(&mut chunk) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if is_timeout(&err) => {
                tracing::debug!(%stage, "socket was idle too long, closing");
                return Err(ProbeError::Idle { stage, replies });
            }
            Err(source) => {
                return Err(ProbeError::Reset {
                    stage,
                    replies,
                    source,
                });
            }
        };

        if read == 0 {
            return closed_by_peer(stage, buffer, replies);
        }

        buffer.push(&chunk[..read]);
        if !buffer.is_complete() && buffer.is_overflowing() {
            tracing::debug!(%stage, buffered = buffer.len(), "reply exceeds size limit");
            return Err(ProbeError::IncompleteReply {
                stage,
                partial: buffer.take(),
                replies,
            });
        }
        if !buffer.is_complete() {
            tracing::trace!(
                %stage,
                buffered = buffer.len(),
                "waiting for complete reply"
            );
            continue;
        }

        let reply = buffer.take();
        tracing::debug!(%stage, reply = reply.trim_end(), "handling reply");
        let command = command_after(stage, &reply, recipient, options);
        replies.push(reply);

        let Some(command) = command else {
            if stage != Stage::Quit {
                tracing::debug!(%stage, "exchange refused to continue, closing");
            }
            return Ok(replies);
        };

        stage = stage.next();
        if let Err(err) = send_command(stream, &command) {
            if is_timeout(&err) {
                return Err(ProbeError::Idle { stage, replies });
            }
            return Err(ProbeError::Reset {
                stage,
                replies,
                source: err,
            });
        }
    }
}

fn command_after(
    stage: Stage,
    reply: &str,
    recipient: &str,
    options: &ProbeOptions,
) -> Option<String> {
    if let Some(code) = stage.expected_code() {
        if !reply.starts_with(code) {
            return None;
        }
    }
    match stage {
        Stage::Greeting => Some(format!("EHLO {}", options.client_hostname)),
        Stage::Ehlo => Some(format!("MAIL FROM:<{}>", options.sender)),
        Stage::MailFrom => Some(format!("RCPT TO:<{recipient}>")),
        Stage::RcptTo => Some("QUIT".to_string()),
        Stage::Quit => None,
    }
}

fn send_command<S: Write>(stream: &mut S, command: &str) -> io::Result<()> {
    tracing::trace!(command, "sending command");
    let mut line = command.as_bytes().to_vec();
    line.extend_from_slice(b"\r\n");
    stream.write_all(&line)?;
    stream.flush()
}

fn closed_by_peer(
    stage: Stage,
    mut buffer: ReplyBuffer,
    replies: ProbeOutcome,
) -> Result<ProbeOutcome, ProbeError> {
    if buffer.is_empty() {
        tracing::debug!(%stage, "connection closed");
        return Ok(replies);
    }
    if stage == Stage::Greeting && buffer.starts_with_reply_code() {
        tracing::debug!("accepting bare greeting reply at close");
        return Ok(vec![buffer.take()]);
    }
    Err(ProbeError::IncompleteReply {
        stage,
        partial: buffer.take(),
        replies,
    })
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
