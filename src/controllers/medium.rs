/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{ensure_moves, Controller, Difficulty};
use crate::{distance_to_centroid, inverted_weights, Board, Move, RandomSource, Side, XoShiRo};

/// Chance of a [`MediumController`] overlooking that a move loses its piece.
pub const DEFAULT_BLUNDER_CHANCE: f64 = 0.2;

/// Avoids losing pieces, but not always.
///
/// Moves are filtered in three passes:
/// 1. Drop moves that let the opponent capture the moved piece straight away, unless every move does.
///    Each move has a small chance of slipping through this check anyway.
/// 2. If the opponent is threatening a capture right now, keep only moves that leave it without one, if any exist.
/// 3. Pick randomly among the rest, favoring moves that end close to the opponent's pieces.
#[derive(Debug, Clone)]
pub struct MediumController<R = XoShiRo> {
    rng: R,
    blunder_chance: f64,
}

impl<R: RandomSource> MediumController<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            blunder_chance: DEFAULT_BLUNDER_CHANCE,
        }
    }

    /// Sets the chance, within `[0, 1]`, of skipping the recapture check for a move.
    pub fn with_blunder_chance(mut self, chance: f64) -> Self {
        self.blunder_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Returns `true` if the opponent could capture the moved piece after `mv`.
    fn loses_piece(board: &mut Board, mv: &Move, us: Side) -> bool {
        let mut scope = board.virtual_scope(0);
        scope.apply(mv);

        let replies = scope.legal_moves(us.opponent());
        replies.iter().any(|reply| reply.captured == Some(mv.piece))
    }

    /// Returns `true` if the opponent has any capture available after `mv`.
    fn leaves_threat(board: &mut Board, mv: &Move, us: Side) -> bool {
        let mut scope = board.virtual_scope(0);
        scope.apply(mv);

        let replies = scope.legal_moves(us.opponent());
        replies.iter().any(Move::is_capture)
    }
}

impl<R: RandomSource + fmt::Debug> Controller for MediumController<R> {
    fn name(&self) -> &str {
        "Medium"
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Medium
    }

    fn description(&self) -> &str {
        "Doesn't like to lose pieces, but occasionally messes up."
    }

    fn status(&self) -> String {
        self.description().to_string()
    }

    fn pick_move(&mut self, moves: &[Move], board: &mut Board, us: Side) -> Result<usize> {
        ensure_moves(self.name(), moves)?;

        let mut candidates = Vec::with_capacity(moves.len());
        for (i, mv) in moves.iter().enumerate() {
            let blunder = self.rng.next_f64() < self.blunder_chance;
            if blunder || !Self::loses_piece(board, mv, us) {
                candidates.push(i);
            }
        }

        if candidates.is_empty() {
            candidates = (0..moves.len()).collect();
        }

        // Save a threatened piece if possible
        let threatened = board.legal_moves(us.opponent()).iter().any(Move::is_capture);
        if threatened {
            let safe = candidates
                .iter()
                .copied()
                .filter(|&i| !Self::leaves_threat(board, &moves[i], us))
                .collect::<Vec<_>>();

            if !safe.is_empty() {
                candidates = safe;
            }
        }

        let distances = candidates
            .iter()
            .map(|&i| distance_to_centroid(board, us.opponent(), moves[i].end))
            .collect::<Vec<_>>();

        let Some(pick) = self.rng.weighted(&inverted_weights(&distances)) else {
            bail!("{} controller found no move to weigh", self.name());
        };

        Ok(candidates[pick])
    }
}
