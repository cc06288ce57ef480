/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{PieceId, Square};

/// A list of moves, in generation order.
pub type MoveList = Vec<Move>;

/// A single diagonal step or jump.
///
/// A capture is a jump over an opposing piece, so `captured` is present if and only if the move is a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Where the moving piece starts.
    pub start: Square,

    /// Where the moving piece lands.
    pub end: Square,

    /// The piece being moved.
    pub piece: PieceId,

    /// The piece being jumped, if this is a capture.
    pub captured: Option<PieceId>,
}

impl Move {
    /// Creates a new non-capturing move.
    #[inline(always)]
    pub const fn step(piece: PieceId, start: Square, end: Square) -> Self {
        Self {
            start,
            end,
            piece,
            captured: None,
        }
    }

    /// Creates a new capturing move, jumping `captured`.
    #[inline(always)]
    pub const fn jump(piece: PieceId, start: Square, end: Square, captured: PieceId) -> Self {
        Self {
            start,
            end,
            piece,
            captured: Some(captured),
        }
    }

    /// Returns `true` if this move captures a piece.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    /// Moves are displayed as `x,y-x,y` for steps and `x,y*x,y` for captures.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { '*' } else { '-' };
        write!(f, "{}{sep}{}", self.start, self.end)
    }
}
