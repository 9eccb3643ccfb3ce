use crate::core::command::{
    Command, TOKEN_CREATE_PARKING_LOT, TOKEN_LEAVE, TOKEN_PARK, TOKEN_REGISTRATIONS_BY_COLOR,
    TOKEN_SLOTS_BY_COLOR, TOKEN_SLOT_BY_REGISTRATION, TOKEN_STATUS,
};
use crate::core::parking_lot::ParkingLot;
use crate::domain::model::Vehicle;
use crate::utils::error::{ParkingError, Result};
use std::io::Write;
use thiserror::Error;

/// Why a line did not produce a clean command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no command provided")]
    EmptyCommand,

    #[error("invalid command: {0}, skipping...")]
    UnknownCommand(String),

    #[error("args missing for command: {command}")]
    MissingArgs {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid args provided for command: {command}")]
    InvalidNumber { command: String, value: String },

    #[error("invalid input line: not valid UTF-8, skipping...")]
    InvalidEncoding,
}

/// Commands queued from a batch source, after the opening create has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    pub commands: Vec<Command>,
    /// Lines that produced no command.
    pub skipped: usize,
}

/// Outcome of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ready(Command),
    /// A numeric argument did not parse and was replaced by zero.
    Coerced { command: Command, issue: ParseError },
    Skip(ParseError),
}

impl Dispatch {
    pub fn command(&self) -> Option<&Command> {
        match self {
            Dispatch::Ready(command) | Dispatch::Coerced { command, .. } => Some(command),
            Dispatch::Skip(_) => None,
        }
    }

    pub fn into_command(self) -> Option<Command> {
        match self {
            Dispatch::Ready(command) | Dispatch::Coerced { command, .. } => Some(command),
            Dispatch::Skip(_) => None,
        }
    }

    pub fn issue(&self) -> Option<&ParseError> {
        match self {
            Dispatch::Ready(_) => None,
            Dispatch::Coerced { issue, .. } | Dispatch::Skip(issue) => Some(issue),
        }
    }
}

fn is_undecodable(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::InvalidData
}

/// Splits a raw line into a command name and its arguments.
pub fn tokenize(line: &str) -> (&str, Vec<&str>) {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().unwrap_or("");
    (name, tokens.collect())
}

/// Turns command tokens into [`Command`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Minimum argument count for commands that take arguments.
    pub fn required_args(name: &str) -> usize {
        match name {
            TOKEN_PARK => 2,
            TOKEN_CREATE_PARKING_LOT
            | TOKEN_LEAVE
            | TOKEN_REGISTRATIONS_BY_COLOR
            | TOKEN_SLOT_BY_REGISTRATION
            | TOKEN_SLOTS_BY_COLOR => 1,
            _ => 0,
        }
    }

    /// Parses a command name and its arguments. Never fails hard: anything
    /// unusable comes back as [`Dispatch::Skip`].
    pub fn parse(&self, name: &str, args: &[&str]) -> Dispatch {
        if name.is_empty() {
            return Dispatch::Skip(ParseError::EmptyCommand);
        }

        let expected = Self::required_args(name);
        if args.len() < expected {
            return Dispatch::Skip(ParseError::MissingArgs {
                command: name.to_string(),
                expected,
                got: args.len(),
            });
        }

        match name {
            TOKEN_CREATE_PARKING_LOT => {
                coerce_number(name, args[0], |capacity| Command::CreateLot { capacity })
            }
            TOKEN_PARK => Dispatch::Ready(Command::Park {
                vehicle: Vehicle::new(args[0], args[1]),
            }),
            TOKEN_LEAVE => coerce_number(name, args[0], |slot| Command::Leave { slot }),
            TOKEN_STATUS => Dispatch::Ready(Command::Status),
            TOKEN_REGISTRATIONS_BY_COLOR => Dispatch::Ready(Command::RegistrationsByColor {
                color: args[0].to_string(),
            }),
            TOKEN_SLOT_BY_REGISTRATION => Dispatch::Ready(Command::SlotByRegistration {
                registration_number: args[0].to_string(),
            }),
            TOKEN_SLOTS_BY_COLOR => Dispatch::Ready(Command::SlotsByColor {
                color: args[0].to_string(),
            }),
            unknown => Dispatch::Skip(ParseError::UnknownCommand(unknown.to_string())),
        }
    }

    pub fn parse_line(&self, line: &str) -> Dispatch {
        let (name, args) = tokenize(line);
        self.parse(name, &args)
    }

    /// Reads a batch source.
    ///
    /// The first non-empty line must be `create_parking_lot <capacity>`; it
    /// is executed right away against `lot`. Every later line is parsed and
    /// the usable commands are returned in order. Diagnostics for skipped or
    /// coerced lines, and the creation reply, go to `out`. A line that is not
    /// valid UTF-8 is skipped like any other malformed line.
    pub fn build_from_source<I, W>(
        &self,
        lines: I,
        lot: &mut Option<ParkingLot>,
        out: &mut W,
    ) -> Result<BatchPlan>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
        W: Write,
    {
        let mut lines = lines.into_iter().enumerate();

        let first = loop {
            match lines.next() {
                Some((_, Err(e))) if is_undecodable(&e) => {
                    return Err(ParkingError::MissingCreateCommand {
                        found: "<invalid UTF-8>".to_string(),
                    });
                }
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(ParkingError::EmptySource),
            }
        };

        let (name, args) = tokenize(&first);
        if name != TOKEN_CREATE_PARKING_LOT {
            return Err(ParkingError::MissingCreateCommand {
                found: name.to_string(),
            });
        }
        let create = match self.parse(name, &args) {
            Dispatch::Ready(command) => command,
            Dispatch::Coerced { command, issue } => {
                writeln!(out, "{issue}")?;
                command
            }
            Dispatch::Skip(issue) => {
                writeln!(out, "{issue}")?;
                return Err(ParkingError::MissingCreateCommand {
                    found: first.trim().to_string(),
                });
            }
        };
        match create.execute(lot) {
            Ok(reply) => writeln!(out, "{reply}")?,
            Err(e) => {
                writeln!(out, "{e}")?;
                return Err(ParkingError::InitialLotRejected(e));
            }
        }

        let mut plan = BatchPlan::default();
        for (index, line) in lines {
            let dispatch = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.parse_line(&line),
                Err(e) if is_undecodable(&e) => Dispatch::Skip(ParseError::InvalidEncoding),
                Err(e) => return Err(e.into()),
            };
            if let Some(issue) = dispatch.issue() {
                tracing::warn!(line = index + 1, "{}", issue);
                writeln!(out, "{issue}")?;
            }
            match dispatch.into_command() {
                Some(command) => {
                    tracing::debug!(command = command.name(), "queued");
                    plan.commands.push(command);
                }
                None => plan.skipped += 1,
            }
        }

        Ok(plan)
    }
}

fn coerce_number(name: &str, raw: &str, build: impl FnOnce(i64) -> Command) -> Dispatch {
    match raw.parse::<i64>() {
        Ok(value) => Dispatch::Ready(build(value)),
        Err(_) => Dispatch::Coerced {
            command: build(0),
            issue: ParseError::InvalidNumber {
                command: name.to_string(),
                value: raw.to_string(),
            },
        },
    }
}
