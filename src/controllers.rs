/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, time::Duration};

use anyhow::{bail, Result};
use clap::{builder::PossibleValue, ValueEnum};

use crate::{Board, EngineOptions, LogLevel, Move, SearchLimits, Side, XoShiRo};

/// Proximity heuristic.
mod easy;

/// Full search.
mod engine;

/// Moves supplied from outside the process.
mod human;

/// Loss-avoidance heuristic.
mod medium;

/// Uniformly random moves.
mod random;

pub use easy::*;
pub use engine::*;
pub use human::*;
pub use medium::*;
pub use random::*;

/// How strong a [`Controller`] plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,

    /// Varies with whoever is at the keyboard.
    Human,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VeryEasy => "Very Easy",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::VeryHard => "Very Hard",
            Self::Human => "Varies",
        };
        write!(f, "{s}")
    }
}

/// Something that chooses which move a team plays.
///
/// Given a non-empty list of legal moves for `us`, a controller returns an index into that list.
/// The board may be used as scratch space for simulating moves, but must be left exactly as it was found.
///
/// Choosing may block (a human controller waits for input), but every controller either yields a valid index
/// or fails with an error; none of them hang forever.
pub trait Controller: fmt::Debug {
    /// Short name of this controller.
    fn name(&self) -> &str;

    /// How strong this controller plays.
    fn difficulty(&self) -> Difficulty;

    /// A brief description of how this controller plays.
    fn description(&self) -> &str;

    /// A one-line status message about the most recent decision.
    fn status(&self) -> String;

    /// Picks one of `moves` for `us` to play, returning its index.
    fn pick_move(&mut self, moves: &[Move], board: &mut Board, us: Side) -> Result<usize>;
}

/// Fails if there is nothing to pick from.
#[inline(always)]
pub(crate) fn ensure_moves(name: &str, moves: &[Move]) -> Result<()> {
    if moves.is_empty() {
        bail!("{name} controller was asked to pick from an empty move list");
    }
    Ok(())
}

/// The kinds of [`Controller`] that can be built by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Random,
    Easy,
    Medium,
    Hard,
    Engine,
    Human,
}

impl ControllerKind {
    /// Builds a controller of this kind.
    ///
    /// `seed` fixes the random source, so the same seed always produces the same choices;
    /// without one, the source is seeded from the clock.
    /// `limits` only affect the search-based controllers, and `input_timeout` only affects [`HumanController`],
    /// which reads its moves from `stdin`.
    pub fn build<Log: LogLevel>(
        self,
        seed: Option<u64>,
        limits: SearchLimits,
        input_timeout: Duration,
    ) -> Result<Box<dyn Controller>> {
        let rng = seed.map(XoShiRo::from_seed).unwrap_or_else(XoShiRo::from_clock);

        let controller: Box<dyn Controller> = match self {
            Self::Random => Box::new(RandomController::new(rng)),
            Self::Easy => Box::new(EasyController::new(rng)),
            Self::Medium => Box::new(MediumController::new(rng)),
            Self::Hard => Box::new(EngineController::<Log, _>::hard(rng)?.with_limits(limits)),
            Self::Engine => Box::new(
                EngineController::<Log, _>::new(2, EngineOptions::default(), rng)?
                    .with_limits(limits),
            ),
            Self::Human => Box::new(HumanController::stdin(input_timeout)),
        };

        Ok(controller)
    }
}

impl ValueEnum for ControllerKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Random,
            Self::Easy,
            Self::Medium,
            Self::Hard,
            Self::Engine,
            Self::Human,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        // Some variants have additional aliases, named after their difficulty
        let value = match self {
            Self::Random => PossibleValue::new("random").alias("very-easy"),
            Self::Easy => PossibleValue::new("easy"),
            Self::Medium => PossibleValue::new("medium"),
            Self::Hard => PossibleValue::new("hard"),
            Self::Engine => PossibleValue::new("engine").alias("very-hard"),
            Self::Human => PossibleValue::new("human").alias("player"),
        };

        Some(value)
    }
}
