//! Line sources the collector reads answers from.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How often a blocked read re-checks the cancellation token.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of waiting for one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput {
    Line(String),
    /// A line arrived but was not valid UTF-8.
    Undecodable,
    /// The cancellation token fired while waiting.
    Interrupted,
    /// End of input (Ctrl-D or closed pipe).
    Closed,
}

/// Blocking source of answer lines. Implementations must return
/// `Interrupted` promptly once `cancel` fires.
pub trait LineSource {
    fn read_line(&mut self, cancel: &CancellationToken) -> io::Result<LineInput>;
}

/// Fixed sequence of lines standing in for stdin in tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    interrupt_after: Option<usize>,
    consumed: usize,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            interrupt_after: None,
            consumed: 0,
        }
    }

    /// Simulate an interrupt once `n` lines have been delivered.
    pub fn interrupt_after(mut self, n: usize) -> Self {
        self.interrupt_after = Some(n);
        self
    }

    /// Lines delivered so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, cancel: &CancellationToken) -> io::Result<LineInput> {
        if self.interrupt_after == Some(self.consumed) {
            cancel.cancel();
        }
        if cancel.is_cancelled() {
            return Ok(LineInput::Interrupted);
        }
        match self.lines.pop_front() {
            Some(line) => {
                self.consumed += 1;
                Ok(LineInput::Line(line))
            }
            None => Ok(LineInput::Closed),
        }
    }
}

/// Reads lines on a background thread so a blocked read can still observe
/// cancellation.
pub struct ReaderInput {
    rx: Receiver<io::Result<Vec<u8>>>,
}

impl ReaderInput {
    /// Spawn the reader thread over any buffered reader (stdin in the binary).
    ///
    /// Lines are forwarded as raw bytes and decoded in `read_line`.
    pub fn spawn<R>(mut reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            loop {
                let mut buf = Vec::new();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        trim_line_ending(&mut buf);
                        if tx.send(Ok(buf)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                }
            }
            tracing::debug!("input reader reached end of stream");
        });
        Self { rx }
    }

    /// Standard input.
    pub fn stdin() -> Self {
        Self::spawn(io::BufReader::new(io::stdin()))
    }
}

fn trim_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

impl LineSource for ReaderInput {
    fn read_line(&mut self, cancel: &CancellationToken) -> io::Result<LineInput> {
        loop {
            if cancel.is_cancelled() {
                return Ok(LineInput::Interrupted);
            }
            match self.rx.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok(Ok(bytes)) => {
                    return Ok(match String::from_utf8(bytes) {
                        Ok(line) => LineInput::Line(line),
                        Err(_) => LineInput::Undecodable,
                    });
                }
                Ok(Err(e)) => return Err(e),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(LineInput::Closed),
            }
        }
    }
}
