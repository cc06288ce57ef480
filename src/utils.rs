/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{cmp::Ordering, fmt};

use crate::{Board, Side, Square};

/// The heuristic value of a move, from the perspective of the side making it.
///
/// Scores are fractional, since every ply of the search divides by the decay factor.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Score(pub f64);

impl Score {
    /// A neutral score.
    pub const ZERO: Self = Self(0.0);

    /// Returns the inner value of this score.
    #[inline(always)]
    pub const fn inner(&self) -> f64 {
        self.0
    }

    /// Total ordering over scores, so they can be sorted and compared with `max_by`.
    #[inline(always)]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$fn(rhs.0))
            }
        }

        impl std::ops::$trait<f64> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: f64) -> Self::Output {
                Self(self.0.$fn(rhs))
            }
        }
    };
}

macro_rules! impl_binary_op_assign {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: Self) {
                self.0.$fn(rhs.0);
            }
        }

        impl std::ops::$trait<f64> for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: f64) {
                self.0.$fn(rhs);
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl_binary_op_assign!(AddAssign, add_assign);
impl_binary_op_assign!(SubAssign, sub_assign);

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(self.0.neg())
    }
}

impl std::iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, s| acc + s)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Compile-time verbosity of a component.
///
/// Components generic over a [`LogLevel`] check these constants before formatting anything,
/// so a [`LogNone`] component pays nothing for its logging.
pub trait LogLevel: fmt::Debug + Default + Clone + Copy + Send + Sync + 'static {
    /// Print status lines, such as which move was chosen and why.
    const INFO: bool;

    /// Print diagnostics about the search.
    const DEBUG: bool;
}

/// Print nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNone;
impl LogLevel for LogNone {
    const INFO: bool = false;
    const DEBUG: bool = false;
}

/// Print status lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInfo;
impl LogLevel for LogInfo {
    const INFO: bool = true;
    const DEBUG: bool = false;
}

/// Print everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDebug;
impl LogLevel for LogDebug {
    const INFO: bool = true;
    const DEBUG: bool = true;
}

/// Sends a single line of diagnostic output.
#[inline(always)]
pub fn send_string<T: fmt::Display>(info: T) {
    println!("info string {info}");
}

/// Distance from `square` to the centroid of the team on `side`, rounded up to a whole number of cells.
///
/// A team with no pieces has no centroid; every square is considered to be at distance `0` from it.
pub fn distance_to_centroid(board: &Board, side: Side, square: Square) -> u64 {
    board
        .centroid(side)
        .map(|(x, y)| square.distance_to(x, y).ceil() as u64)
        .unwrap_or_default()
}

/// Converts distances into weights that favor shorter distances.
///
/// Each weight is `max - distance + 1`, so the farthest entry weighs `1` and no entry is ever excluded.
///
/// # Example
/// ```
/// # use draughts::inverted_weights;
/// assert_eq!(inverted_weights(&[3, 1, 5]), [3, 5, 1]);
/// ```
pub fn inverted_weights(distances: &[u64]) -> Vec<u64> {
    let max = distances.iter().copied().max().unwrap_or_default();
    distances.iter().map(|&d| (max - d) + 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn test_score_ops() {
        let mut score = Score(1.0) + Score(7.0);
        score -= 2.0;
        assert_eq!(score / 4.0, Score(1.5));
        assert_eq!(-score, Score(-6.0));
        assert_eq!([Score(1.0), Score(0.5)].into_iter().sum::<Score>(), Score(1.5));
    }

    #[test]
    fn test_distance_to_centroid() {
        let mut board = Board::new(8).unwrap();
        assert_eq!(distance_to_centroid(&board, Side::Top, Square::new(0, 7)), 0);

        board
            .place(Side::Top, Square::new(1, 0), PieceKind::Regular)
            .unwrap();
        // sqrt(1 + 49) = 7.07, rounded up
        assert_eq!(distance_to_centroid(&board, Side::Top, Square::new(0, 7)), 8);
        assert_eq!(distance_to_centroid(&board, Side::Top, Square::new(1, 0)), 0);
    }

    #[test]
    fn test_inverted_weights_floor_is_one() {
        assert_eq!(inverted_weights(&[4, 4, 4]), [1, 1, 1]);
        assert!(inverted_weights(&[]).is_empty());
    }
}
