/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Side, Square};

/// Stable handle to a piece stored on a [`crate::Board`].
///
/// Handles stay valid for the whole game, even after the piece they refer to has been captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    /// Index of this piece in the board's piece storage.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The rank of a piece.
///
/// Regular pieces only move towards the opposing baseline. Kings move in both directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    #[default]
    Regular,
    King,
}

impl PieceKind {
    /// Returns `true` if this is a [`PieceKind::King`].
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self, Self::King)
    }
}

/// A single checker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    /// Handle of this piece.
    pub(crate) id: PieceId,

    /// The side whose team owns this piece.
    pub(crate) side: Side,

    /// Whether this piece has been promoted.
    pub(crate) kind: PieceKind,

    /// Where this piece currently sits.
    ///
    /// `None` means the piece has no board association, which happens once it has been captured (really or virtually).
    pub(crate) square: Option<Square>,
}

impl Piece {
    #[inline(always)]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline(always)]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline(always)]
    pub const fn square(&self) -> Option<Square> {
        self.square
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        self.kind.is_king()
    }

    /// Returns the character used to display this piece.
    ///
    /// Top pieces are `t`, bottom pieces are `b`. Kings are uppercase.
    pub const fn char(&self) -> char {
        match (self.side, self.kind) {
            (Side::Top, PieceKind::Regular) => 't',
            (Side::Top, PieceKind::King) => 'T',
            (Side::Bottom, PieceKind::Regular) => 'b',
            (Side::Bottom, PieceKind::King) => 'B',
        }
    }

    /// Computes the on-board diagonal neighbors this piece may step towards.
    ///
    /// Off-board diagonals are dropped, and regular pieces lose the two diagonals leading back towards their own baseline.
    /// Neighbors are produced in the order `(+1,+1)`, `(-1,+1)`, `(+1,-1)`, `(-1,-1)`.
    pub fn diagonals(&self, size: u8) -> impl Iterator<Item = (Square, i16, i16)> + '_ {
        const DELTAS: [(i16, i16); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

        DELTAS.into_iter().filter_map(move |(dx, dy)| {
            let from = self.square?;

            if !self.is_king() && dy != self.side.forward() {
                return None;
            }

            from.offset(dx, dy, size).map(|to| (to, dx, dy))
        })
    }
}

/// One of the two players.
///
/// A team owns the ordered set of its active pieces; captured pieces are removed from this set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Team {
    /// Which edge of the board this team started on.
    pub(crate) side: Side,

    /// Display name of the team.
    pub(crate) name: String,

    /// Color/identity tag of the team.
    pub(crate) color: String,

    /// Handles of all active pieces, in the order they were placed.
    pub(crate) pieces: Vec<PieceId>,
}

impl Team {
    /// Creates a new, empty team on `side`.
    pub fn new(side: Side, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            side,
            name: name.into(),
            color: color.into(),
            pieces: Vec::new(),
        }
    }

    #[inline(always)]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Handles of every active piece on this team.
    #[inline(always)]
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    /// Number of active pieces.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns `true` if this team has no active pieces left.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.color, self.side)
    }
}
