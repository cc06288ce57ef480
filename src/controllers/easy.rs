/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::Result;

use super::{ensure_moves, Controller, Difficulty};
use crate::{Board, Move, RandomSource, Side, XoShiRo};

/// Moves its pieces towards the opponent's.
///
/// Every move is ranked by how close it brings the centroid of our team to the centroid of theirs,
/// plus some random jitter of up to half the largest distance.
#[derive(Debug, Clone)]
pub struct EasyController<R = XoShiRo> {
    rng: R,
}

impl<R: RandomSource> EasyController<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Distance between the two teams' centroids if `mv` were played.
    fn distance_after(board: &Board, mv: &Move, us: Side) -> f64 {
        let Some((their_x, their_y)) = board.centroid(us.opponent()) else {
            return 0.0;
        };

        let (mut x, mut y, mut count) = (0.0, 0.0, 0.0);
        for piece in board.team_pieces(us) {
            let square = if piece.id() == mv.piece {
                Some(mv.end)
            } else {
                piece.square()
            };

            if let Some(square) = square {
                x += square.x as f64;
                y += square.y as f64;
                count += 1.0;
            }
        }

        if count == 0.0 {
            return 0.0;
        }

        ((x / count - their_x).powi(2) + (y / count - their_y).powi(2)).sqrt()
    }
}

impl<R: RandomSource + fmt::Debug> Controller for EasyController<R> {
    fn name(&self) -> &str {
        "Easy"
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Easy
    }

    fn description(&self) -> &str {
        "Moves its pieces towards yours."
    }

    fn status(&self) -> String {
        self.description().to_string()
    }

    fn pick_move(&mut self, moves: &[Move], board: &mut Board, us: Side) -> Result<usize> {
        ensure_moves(self.name(), moves)?;

        let distances = moves
            .iter()
            .map(|mv| Self::distance_after(board, mv, us))
            .collect::<Vec<_>>();

        let max = distances.iter().copied().fold(0.0, f64::max);

        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, distance) in distances.into_iter().enumerate() {
            let jittered = distance + (self.rng.next_f64() * (max / 2.0)).floor();
            if jittered < best_distance {
                best = i;
                best_distance = jittered;
            }
        }

        Ok(best)
    }
}
