/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::Result;

use super::{ensure_moves, Controller, Difficulty};
use crate::{Board, Move, RandomSource, Side, XoShiRo};

/// Plays a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomController<R = XoShiRo> {
    rng: R,
}

impl<R: RandomSource> RandomController<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RandomSource + fmt::Debug> Controller for RandomController<R> {
    fn name(&self) -> &str {
        "Random"
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::VeryEasy
    }

    fn description(&self) -> &str {
        "Plays random moves."
    }

    fn status(&self) -> String {
        self.description().to_string()
    }

    fn pick_move(&mut self, moves: &[Move], _board: &mut Board, _us: Side) -> Result<usize> {
        ensure_moves(self.name(), moves)?;
        Ok(self.rng.below(moves.len()))
    }
}
