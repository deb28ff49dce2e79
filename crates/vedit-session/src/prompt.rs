//! Interactive questions asked during a session.
//!
//! [`TerminalPrompter`] reads answers on a background thread so it can
//! notice an interrupt while the user has not typed anything yet.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::debug;
use vedit_checkers::ValidationFailure;

use crate::interrupt::InterruptFlag;

const PROMPT_TARGET: &str = "vedit_session::prompt";

/// How often a waiting prompt checks the interrupt flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Answer to a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Open the editor again.
    ReEdit,
    /// Commit despite the failure.
    SaveAnyway,
    /// Discard the working copy.
    Quit,
}

impl Decision {
    /// Parses an answer such as `r`, `save` or `Q`.
    #[must_use]
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "r" | "re-edit" | "reedit" | "edit" => Some(Self::ReEdit),
            "s" | "save" | "save anyway" => Some(Self::SaveAnyway),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Parses a yes/no answer.
#[must_use]
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Source of user decisions.
pub trait Prompter {
    /// Asks what to do about `failure`.
    ///
    /// End of input counts as [`Decision::Quit`].
    fn decide(&mut self, failure: &ValidationFailure) -> Decision;

    /// Asks a yes/no `question`. End of input counts as no.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Prompts on a terminal.
///
/// Input is read on a helper thread, one line per question, so nothing
/// reads the terminal while the editor owns it.
pub struct TerminalPrompter<W> {
    requests: Sender<()>,
    lines: Receiver<io::Result<Option<String>>>,
    pending: bool,
    output: W,
    interrupt: InterruptFlag,
}

impl TerminalPrompter<io::Stderr> {
    /// Reads standard input and writes prompts to standard error.
    #[must_use]
    pub fn stdio(interrupt: InterruptFlag) -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stderr(), interrupt)
    }
}

impl<W: Write> TerminalPrompter<W> {
    /// Reads answers from `input` and writes prompts to `output`.
    #[must_use]
    pub fn new<R>(input: R, output: W, interrupt: InterruptFlag) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (requests, wanted) = mpsc::channel::<()>();
        let (sender, lines) = mpsc::channel();
        thread::spawn(move || read_on_request(input, &wanted, &sender));
        Self {
            requests,
            lines,
            pending: false,
            output,
            interrupt,
        }
    }

    /// Returns the prompt output.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Waits for one line; `None` on end of input, read error or interrupt.
    fn next_line(&mut self) -> Option<String> {
        if !self.pending {
            self.requests.send(()).ok()?;
            self.pending = true;
        }
        loop {
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(line)) => {
                    self.pending = false;
                    return line;
                }
                Ok(Err(err)) => {
                    self.pending = false;
                    debug!(target: PROMPT_TARGET, error = %err, "prompt input failed");
                    return None;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.interrupt.is_raised() {
                        return None;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Writes `prompt` and reads answers until `parse` accepts one.
    fn ask<T>(&mut self, prompt: &str, retry: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let mut message = prompt;
        loop {
            if let Err(err) = write!(self.output, "{message}").and_then(|()| self.output.flush()) {
                debug!(target: PROMPT_TARGET, error = %err, "prompt could not be shown");
            }
            let line = self.next_line()?;
            if let Some(answer) = parse(&line) {
                return Some(answer);
            }
            message = retry;
        }
    }
}

impl<W: Write> Prompter for TerminalPrompter<W> {
    fn decide(&mut self, _failure: &ValidationFailure) -> Decision {
        self.ask(
            "[r]e-edit, [s]ave anyway, or [q]uit? ",
            "Please answer r, s or q: ",
            Decision::parse,
        )
        .unwrap_or(Decision::Quit)
    }

    fn confirm(&mut self, question: &str) -> bool {
        let prompt = format!("{question} (y/n) ");
        self.ask(&prompt, "Please answer y or n: ", parse_yes_no)
            .unwrap_or(false)
    }
}

/// Reads one line from `input` each time a request arrives.
///
/// Stops after end of input, a read error, or when the prompter is gone.
fn read_on_request<R: BufRead>(
    mut input: R,
    wanted: &Receiver<()>,
    answers: &Sender<io::Result<Option<String>>>,
) {
    for () in wanted {
        let mut buffer = String::new();
        let read = input.read_line(&mut buffer).map(|count| {
            (count > 0).then(|| buffer.trim_end_matches(['\r', '\n']).to_owned())
        });
        let finished = !matches!(read, Ok(Some(_)));
        if answers.send(read).is_err() || finished {
            break;
        }
    }
}
