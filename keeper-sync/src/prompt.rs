//! Blocking text interface used by the interactive strategy.
//!
//! Reading the user's choice is the only place a sync run waits on a human.
//! Dropping the run future drops the pending read with it.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use keeper_types::SecretIdentity;
use std::io::{self, BufRead};
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadBuf,
    Stdout,
};
use tokio::sync::mpsc;

/// Answer that keeps the local copy (and overwrites the remote).
pub const KEEP_LOCAL: &str = "l";
/// Answer that keeps the remote copy.
pub const KEEP_REMOTE: &str = "r";

/// Both decrypted sides of a conflicting secret.
#[derive(Clone, Debug)]
pub struct Conflict {
    pub identity: SecretIdentity,
    pub local_text: String,
    pub local_updated_at: DateTime<Utc>,
    pub remote_text: String,
    pub remote_updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait Prompt: Send {
    /// Reports an action taken without asking.
    async fn notify(&mut self, message: &str) -> io::Result<()>;

    /// Presents a conflict and returns the user's raw answer, trimmed.
    /// End of input yields an empty answer. Bytes that are not UTF-8 are
    /// replaced, never rejected.
    async fn choose(&mut self, conflict: &Conflict) -> io::Result<String>;
}

/// Terminal input read on a detached OS thread and handed over line by line.
///
/// Tokio's own `Stdin` reads on the blocking pool, where a pending read keeps
/// runtime shutdown waiting until the user presses Enter. Here an abandoned
/// read only leaves a parked thread behind, which dies with the process.
pub struct StdinFeed {
    lines: mpsc::Receiver<io::Result<Vec<u8>>>,
    pending: Vec<u8>,
    pos: usize,
}

impl StdinFeed {
    /// Starts the reader thread for the process's standard input.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            loop {
                let mut line = Vec::new();
                match input.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.blocking_send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.blocking_send(Err(e));
                        break;
                    }
                }
            }
        });
        Self::from_receiver(rx)
    }

    /// Feed fed by any producer. The stream ends when every sender is gone.
    pub fn from_receiver(lines: mpsc::Receiver<io::Result<Vec<u8>>>) -> Self {
        Self {
            lines,
            pending: Vec::new(),
            pos: 0,
        }
    }
}

impl AsyncRead for StdinFeed {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        while this.pos == this.pending.len() {
            match ready!(this.lines.poll_recv(cx)) {
                Some(Ok(chunk)) => {
                    this.pending = chunk;
                    this.pos = 0;
                }
                Some(Err(e)) => return Poll::Ready(Err(e)),
                None => return Poll::Ready(Ok(())),
            }
        }

        let n = buf.remaining().min(this.pending.len() - this.pos);
        buf.put_slice(&this.pending[this.pos..this.pos + n]);
        this.pos += n;
        Poll::Ready(Ok(()))
    }
}

/// Line-oriented prompt over any async reader/writer pair.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl LinePrompt<BufReader<StdinFeed>, Stdout> {
    /// Prompt on the process terminal.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(StdinFeed::spawn()), tokio::io::stdout())
    }
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl<R, W> Prompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn notify(&mut self, message: &str) -> io::Result<()> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    async fn choose(&mut self, conflict: &Conflict) -> io::Result<String> {
        let screen = format!(
            "conflict on {}\n\
             --- local (updated {})\n{}\n\
             --- remote (updated {})\n{}\n\
             keep [{KEEP_LOCAL}]ocal or [{KEEP_REMOTE}]emote? ",
            conflict.identity,
            timestamp(&conflict.local_updated_at),
            conflict.local_text,
            timestamp(&conflict.remote_updated_at),
            conflict.remote_text,
        );
        self.writer.write_all(screen.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = Vec::new();
        self.reader.read_until(b'\n', &mut line).await?;
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }
}
