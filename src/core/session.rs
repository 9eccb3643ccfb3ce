use crate::core::command::{Command, Reply};
use crate::core::dispatcher::{tokenize, CommandDispatcher, ParseError};
use crate::core::parking_lot::{LotError, ParkingLot};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const EXIT_TOKEN: &str = "exit";

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub executed: usize,
    pub skipped: usize,
    pub timed_out: bool,
}

/// Owns the lot for one run and feeds it commands one at a time.
///
/// The lot is only ever reached through `&mut self`, so commands are applied
/// strictly in sequence. When the deadline passes, remaining input is
/// dropped; commands that already ran stay applied.
pub struct Session<W: Write> {
    dispatcher: CommandDispatcher,
    lot: Option<ParkingLot>,
    out: W,
    deadline: Instant,
    prompt: String,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, timeout: Duration) -> Self {
        Self {
            dispatcher: CommandDispatcher::new(),
            lot: None,
            out,
            deadline: Instant::now() + timeout,
            prompt: String::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(out: W, config: &C) -> Self {
        Self::new(out, config.timeout()).with_prompt(config.prompt())
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn lot(&self) -> Option<&ParkingLot> {
        self.lot.as_ref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    fn emit(&mut self, outcome: std::result::Result<Reply, LotError>) -> std::io::Result<()> {
        match outcome {
            Ok(reply) => writeln!(self.out, "{reply}")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        self.out.flush()
    }

    fn execute(&mut self, command: &Command) -> Result<()> {
        tracing::debug!(
            command = command.name(),
            mutating = command.is_mutating(),
            "executing"
        );
        let outcome = command.execute(&mut self.lot);
        if let Err(e) = &outcome {
            tracing::debug!(command = command.name(), error = %e, "command refused");
        }
        self.emit(outcome)?;
        Ok(())
    }

    /// Batch mode: builds the whole command list from `lines`, then runs it.
    ///
    /// Fails without running anything if the source does not open with a
    /// usable `create_parking_lot`.
    pub fn run_batch<I>(&mut self, lines: I) -> Result<SessionReport>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
    {
        let plan = self
            .dispatcher
            .build_from_source(lines, &mut self.lot, &mut self.out)?;
        self.out.flush()?;
        let commands = plan.commands;
        tracing::info!(queued = commands.len(), skipped = plan.skipped, "batch loaded");

        let mut report = SessionReport {
            executed: 1,
            skipped: plan.skipped,
            timed_out: false,
        };
        for (index, command) in commands.iter().enumerate() {
            if self.expired() {
                report.timed_out = true;
                report.skipped += commands.len() - index;
                tracing::warn!(remaining = commands.len() - index, "deadline reached, stopping batch");
                break;
            }
            self.execute(command)?;
            report.executed += 1;
        }

        Ok(report)
    }

    /// Interactive mode: one line at a time until `exit`, EOF or the deadline.
    ///
    /// Everything except `create_parking_lot` is refused until a lot exists.
    /// Lines that are not valid UTF-8 are reported and skipped.
    pub async fn run_interactive<R>(&mut self, reader: R) -> Result<SessionReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.split(b'\n');
        let deadline = tokio::time::Instant::from_std(self.deadline);
        let mut report = SessionReport::default();

        loop {
            if !self.prompt.is_empty() {
                write!(self.out, "{}", self.prompt)?;
                self.out.flush()?;
            }

            let raw = match tokio::time::timeout_at(deadline, lines.next_segment()).await {
                Ok(Ok(Some(raw))) => raw,
                Ok(Ok(None)) => break,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    tracing::warn!("deadline reached, closing session");
                    report.timed_out = true;
                    break;
                }
            };

            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(_) => {
                    tracing::warn!("{}", ParseError::InvalidEncoding);
                    writeln!(self.out, "{}", ParseError::InvalidEncoding)?;
                    self.out.flush()?;
                    report.skipped += 1;
                    continue;
                }
            };
            let (name, args) = tokenize(&line);
            if name.eq_ignore_ascii_case(EXIT_TOKEN) {
                break;
            }

            let dispatch = self.dispatcher.parse(name, &args);
            if let Some(issue) = dispatch.issue() {
                writeln!(self.out, "{issue}")?;
                self.out.flush()?;
            }
            let Some(command) = dispatch.into_command() else {
                report.skipped += 1;
                continue;
            };

            if self.lot.is_none() && !matches!(command, Command::CreateLot { .. }) {
                self.emit(Err(LotError::NoLot))?;
                report.skipped += 1;
                continue;
            }

            self.execute(&command)?;
            report.executed += 1;
        }

        Ok(report)
    }
}
