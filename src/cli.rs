/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{ControllerKind, SearchLimits, Side, DEFAULT_BOARD_SIZE, DEFAULT_INPUT_TIMEOUT};

/// Plays checkers between two controllers.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: MatchConfig,
}

/// Something to do other than play a match.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "lower")]
pub enum Command {
    /// Play a match between the two selected controllers. This is the default.
    Play,

    /// Count every turn sequence of the given length from the starting position, printing the total.
    Perft { depth: usize },

    /// Like `perft`, but also prints the count after each of the first mover's moves.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print the starting position and the first mover's legal moves.
    #[command(alias = "d")]
    Display,
}

/// How much to print while playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    /// Only the final board and result.
    Quiet,

    /// Every move, along with its controller's status.
    #[default]
    Info,

    /// Search diagnostics as well.
    Debug,
}

/// Everything needed to set up a match.
#[derive(Debug, Clone, Args)]
pub struct MatchConfig {
    /// Side length of the board. Must be even, and between 4 and 16.
    #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub size: u8,

    /// Controller of the top team.
    #[arg(short, long, value_enum, default_value = "engine")]
    pub top: ControllerKind,

    /// Controller of the bottom team, which moves first.
    #[arg(short, long, value_enum, default_value = "random")]
    pub bottom: ControllerKind,

    /// Seed for every random choice, making the whole match reproducible.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Declare a draw after this many turns.
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Node allowance of each engine search.
    #[arg(long)]
    pub max_nodes: Option<u64>,

    /// Time allowance of each engine search, in milliseconds.
    #[arg(long)]
    pub movetime: Option<u64>,

    /// How long to wait for a human to enter a move, in seconds.
    #[arg(long, default_value_t = DEFAULT_INPUT_TIMEOUT.as_secs())]
    pub input_timeout: u64,

    #[arg(short, long, value_enum, default_value_t = Verbosity::Info)]
    pub verbosity: Verbosity,
}

impl MatchConfig {
    /// Search limits derived from `max_nodes` and `movetime`.
    pub fn limits(&self) -> SearchLimits {
        let default = SearchLimits::default();

        SearchLimits {
            max_nodes: self.max_nodes.unwrap_or(default.max_nodes),
            hard_timeout: self
                .movetime
                .map(Duration::from_millis)
                .unwrap_or(default.hard_timeout),
        }
    }

    pub fn input_timeout(&self) -> Duration {
        Duration::from_secs(self.input_timeout)
    }

    /// The seed for the controller of `side`, if seeded.
    ///
    /// Each side gets its own seed, so that two identical controllers don't mirror each other.
    pub fn seed_for(&self, side: Side) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(side.index() as u64))
    }

    /// The kind of controller playing for `side`.
    pub fn controller(&self, side: Side) -> ControllerKind {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["draughts"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.size, 8);
        assert_eq!(cli.config.controller(Side::Top), ControllerKind::Engine);
        assert_eq!(cli.config.controller(Side::Bottom), ControllerKind::Random);
        assert!(cli.config.limits().is_unlimited());
        assert_eq!(cli.config.input_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_match_options() {
        let cli = Cli::try_parse_from([
            "draughts",
            "--top",
            "hard",
            "-b",
            "very-easy",
            "--seed",
            "7",
            "--max-nodes",
            "1000",
            "-v",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.config.top, ControllerKind::Hard);
        assert_eq!(cli.config.bottom, ControllerKind::Random);
        assert_eq!(cli.config.seed_for(Side::Top), Some(7));
        assert_eq!(cli.config.seed_for(Side::Bottom), Some(8));
        assert_eq!(cli.config.limits().max_nodes, 1000);
        assert_eq!(cli.config.verbosity, Verbosity::Debug);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["draughts", "--size", "6", "perft", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Perft { depth: 3 })));
        assert_eq!(cli.config.size, 6);
    }
}
