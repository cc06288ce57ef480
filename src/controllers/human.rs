/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt, io,
    str::FromStr,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};

use super::{ensure_moves, Controller, Difficulty};
use crate::{Board, Move, Side, Square};

/// How long a [`HumanController`] waits for a move before forfeiting.
pub const DEFAULT_INPUT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A move as entered by a person: where the piece is, and where it should go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: Square,
    pub end: Square,
}

impl Selection {
    pub const fn new(start: Square, end: Square) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `mv` goes from this selection's start to its end.
    #[inline(always)]
    pub fn matches(&self, mv: &Move) -> bool {
        mv.start == self.start && mv.end == self.end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.end)
    }
}

impl FromStr for Selection {
    type Err = anyhow::Error;

    /// Parses a selection formatted as `x,y x,y`.
    ///
    /// The two squares may also be separated by `-` or `*`, as in the [`fmt::Display`] impl of [`Move`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = s
            .split(|c: char| c.is_ascii_whitespace() || c == '-' || c == '*')
            .filter(|part| !part.is_empty());

        let (Some(start), Some(end), None) = (squares.next(), squares.next(), squares.next()) else {
            bail!("Invalid selection {s:?}: expected the format `x,y x,y`");
        };

        Ok(Self::new(start.parse()?, end.parse()?))
    }
}

/// A person choosing moves.
///
/// Selections arrive through a channel, fed either by a thread reading `stdin` or by whatever else holds the sender.
/// Selections that don't match any legal move are rejected and the controller keeps waiting,
/// until `timeout` has passed since it was asked to pick, at which point it gives up with an error.
#[derive(Debug)]
pub struct HumanController {
    input: Receiver<Selection>,
    timeout: Duration,
    status: String,
}

impl HumanController {
    /// Creates a controller that reads selections from `input`.
    pub fn new(input: Receiver<Selection>, timeout: Duration) -> Self {
        Self {
            input,
            timeout,
            status: String::from(Self::PROMPT),
        }
    }

    /// Creates a controller along with the sender that feeds it.
    pub fn channel(timeout: Duration) -> (Sender<Selection>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self::new(receiver, timeout))
    }

    /// Creates a controller that reads selections from `stdin`, one per line.
    ///
    /// This spawns a thread that lives until `stdin` closes or the controller is dropped.
    pub fn stdin(timeout: Duration) -> Self {
        let (sender, controller) = Self::channel(timeout);

        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping: {err}");
            }
        });

        controller
    }

    const PROMPT: &str = "Enter a move as `x,y x,y`.";
}

impl Controller for HumanController {
    fn name(&self) -> &str {
        "Human"
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Human
    }

    fn description(&self) -> &str {
        "Moves are entered by a person."
    }

    fn status(&self) -> String {
        self.status.clone()
    }

    fn pick_move(&mut self, moves: &[Move], _board: &mut Board, _us: Side) -> Result<usize> {
        ensure_moves(self.name(), moves)?;
        self.status = String::from(Self::PROMPT);

        // A timeout too large to represent just means waiting forever
        let deadline = Instant::now().checked_add(self.timeout);

        loop {
            let received = match deadline {
                Some(deadline) => self
                    .input
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self
                    .input
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            let selection = match received {
                Ok(selection) => selection,
                Err(RecvTimeoutError::Timeout) => {
                    bail!("No move was entered within {:?}", self.timeout)
                }
                Err(RecvTimeoutError::Disconnected) => {
                    bail!("Input closed before a move was entered")
                }
            };

            if let Some(index) = moves.iter().position(|mv| selection.matches(mv)) {
                return Ok(index);
            }

            self.status = format!("{selection} is not a legal move. {}", Self::PROMPT);
            eprintln!("{}", self.status);
        }
    }
}

/// Loops until `stdin` closes, sending every successfully-parsed selection through the supplied `sender`.
fn input_handler(sender: Sender<Selection>) -> Result<()> {
    let mut buffer = String::with_capacity(64);

    loop {
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read a move from stdin")?;

        // For ctrl + d
        if bytes == 0 {
            bail!("Received input of 0 bytes");
        }

        let buf = buffer.trim();
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<Selection>() {
            Ok(selection) => sender
                .send(selection)
                .context("Controller stopped listening for moves")?,

            Err(err) => eprintln!("{err}"),
        }
    }
}
