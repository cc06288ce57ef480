/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{Piece, PieceId, PieceKind, Side, Snapshot, Square, Team, MAX_BOARD_SIZE};

/// Side length of a standard checkers board.
pub const DEFAULT_BOARD_SIZE: u8 = 8;

/// A read-only view of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Location of this cell.
    pub square: Square,

    /// Whether this cell is dark. Only dark cells are ever occupied.
    pub dark: bool,

    /// The piece occupying this cell, if any.
    pub piece: Option<PieceId>,
}

/// An `N x N` checkers board (with `N` even), along with both teams and every piece ever placed on it.
///
/// The board is the single owner of all game state:
/// cells refer to pieces by [`PieceId`], and teams list the handles of their active pieces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    /// Side length of the board.
    pub(crate) size: u8,

    /// Occupancy of every cell, indexed by `y * size + x`.
    pub(crate) cells: Vec<Option<PieceId>>,

    /// Storage for every piece placed on this board, indexed by [`PieceId`].
    pub(crate) pieces: Vec<Piece>,

    /// Both teams, indexed by [`Side`].
    pub(crate) teams: [Team; Side::COUNT],

    /// Per-piece stacks of virtual snapshots, indexed by [`PieceId`].
    pub(crate) snapshots: Vec<Vec<Snapshot>>,
}

impl Board {
    /// Creates a new, empty board with `size` rows and columns.
    ///
    /// The top team is named "Red" and the bottom team is named "Blue".
    ///
    /// # Example
    /// ```
    /// # use draughts::Board;
    /// let board = Board::new(8).unwrap();
    /// assert_eq!(board.size(), 8);
    ///
    /// assert!(Board::new(7).is_err());
    /// ```
    pub fn new(size: u8) -> Result<Self> {
        if size % 2 != 0 {
            bail!("Invalid board size {size}: board size must be even");
        }
        if !(4..=MAX_BOARD_SIZE).contains(&size) {
            bail!("Invalid board size {size}: board size must be between 4 and {MAX_BOARD_SIZE}");
        }

        let cells = size as usize * size as usize;

        Ok(Self {
            size,
            cells: vec![None; cells],
            pieces: Vec::new(),
            teams: [
                Team::new(Side::Top, "Red", "red"),
                Team::new(Side::Bottom, "Blue", "blue"),
            ],
            snapshots: Vec::new(),
        })
    }

    /// Creates a board of `size` with both teams set up in their starting positions.
    ///
    /// Each side fills the `(size - 2) / 2` rows nearest its own baseline, on dark cells only.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Board, Side};
    /// let board = Board::standard(8).unwrap();
    /// assert_eq!(board.team(Side::Top).len(), 12);
    /// assert_eq!(board.team(Side::Bottom).len(), 12);
    /// ```
    pub fn standard(size: u8) -> Result<Self> {
        let mut board = Self::new(size)?;
        let rows = (size - 2) / 2;

        for side in Side::all() {
            for level in 0..rows {
                let y = match side {
                    Side::Top => level,
                    Side::Bottom => size - 1 - level,
                };

                for x in 0..size {
                    let square = Square::new(x, y);
                    if square.is_dark() {
                        board.place(side, square, PieceKind::Regular)?;
                    }
                }
            }
        }

        Ok(board)
    }

    /// Renames the team on `side`.
    pub fn set_team_identity(
        &mut self,
        side: Side,
        name: impl Into<String>,
        color: impl Into<String>,
    ) {
        let team = &mut self.teams[side.index()];
        team.name = name.into();
        team.color = color.into();
    }

    /// Places a new piece of `kind` for `side` on `square`, returning its handle.
    ///
    /// Fails if `square` is off the board, is a light cell, or is already occupied.
    pub fn place(&mut self, side: Side, square: Square, kind: PieceKind) -> Result<PieceId> {
        let Some(cell) = self.get_cell(square.x, square.y) else {
            bail!("Cannot place a piece on {square}: square is off the board");
        };
        if !cell.dark {
            bail!("Cannot place a piece on {square}: pieces may only occupy dark cells");
        }
        if let Some(occupant) = cell.piece {
            bail!("Cannot place a piece on {square}: already occupied by {occupant}");
        }

        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Piece {
            id,
            side,
            kind,
            square: Some(square),
        });
        self.snapshots.push(Vec::new());
        self.teams[side.index()].pieces.push(id);
        self.set_occupant(square, Some(id));

        Ok(id)
    }

    /// Side length of the board.
    #[inline(always)]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Looks up the cell at `(x, y)`, or `None` if that cell does not exist.
    ///
    /// # Example
    /// ```
    /// # use draughts::Board;
    /// let board = Board::standard(8).unwrap();
    /// let cell = board.get_cell(1, 0).unwrap();
    /// assert!(cell.dark);
    /// assert!(cell.piece.is_some());
    ///
    /// assert!(board.get_cell(8, 0).is_none());
    /// ```
    pub fn get_cell(&self, x: u8, y: u8) -> Option<Cell> {
        if x >= self.size || y >= self.size {
            return None;
        }

        let square = Square::new(x, y);
        Some(Cell {
            square,
            dark: square.is_dark(),
            piece: self.cells[self.cell_index(square)],
        })
    }

    /// Returns the handle of the piece on `square`, if any.
    #[inline(always)]
    pub fn occupant(&self, square: Square) -> Option<PieceId> {
        self.get_cell(square.x, square.y).and_then(|cell| cell.piece)
    }

    /// Returns the piece on `square`, if any.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.occupant(square).map(|id| self.piece(id))
    }

    /// Fetches the piece referred to by `id`.
    ///
    /// # Panics
    /// If `id` was not produced by this board.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Returns the team playing on `side`.
    #[inline(always)]
    pub fn team(&self, side: Side) -> &Team {
        &self.teams[side.index()]
    }

    /// Iterates over the active pieces of the team on `side`.
    pub fn team_pieces(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        self.team(side).pieces.iter().map(|&id| self.piece(id))
    }

    /// Number of active pieces on each side, indexed by [`Side`].
    pub fn material(&self) -> [usize; Side::COUNT] {
        Side::all().map(|side| self.team(side).len())
    }

    /// Fraction of all active pieces that belong to `side`, in the range `[0, 1]`.
    ///
    /// An empty board is considered even.
    pub fn material_share(&self, side: Side) -> f64 {
        let [top, bottom] = self.material();
        let total = top + bottom;
        if total == 0 {
            return 0.5;
        }

        self.team(side).len() as f64 / total as f64
    }

    /// Average position of the active pieces on `side`, or `None` if that team has no pieces.
    pub fn centroid(&self, side: Side) -> Option<(f64, f64)> {
        let team = self.team(side);
        if team.is_empty() {
            return None;
        }

        let (sum_x, sum_y) = self
            .team_pieces(side)
            .filter_map(Piece::square)
            .fold((0.0, 0.0), |(sx, sy), sq| (sx + sq.x as f64, sy + sq.y as f64));

        let n = team.len() as f64;
        Some((sum_x / n, sum_y / n))
    }

    /// Index into `self.cells` for `square`.
    #[inline(always)]
    pub(crate) fn cell_index(&self, square: Square) -> usize {
        square.y as usize * self.size as usize + square.x as usize
    }

    /// Sets the occupant of `square`.
    #[inline(always)]
    pub(crate) fn set_occupant(&mut self, square: Square, piece: Option<PieceId>) {
        let index = self.cell_index(square);
        self.cells[index] = piece;
    }

    /// Moves `id` onto `to`, vacating the cell it currently occupies.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Square) {
        if let Some(from) = self.pieces[id.index()].square {
            if self.occupant(from) == Some(id) {
                self.set_occupant(from, None);
            }
        }

        self.pieces[id.index()].square = Some(to);
        self.set_occupant(to, Some(id));
    }

    /// Takes `id` off the board and out of its team's active set.
    ///
    /// Returns the index the piece held within its team, if it was still active.
    pub(crate) fn detach(&mut self, id: PieceId) -> Option<usize> {
        let piece = &mut self.pieces[id.index()];
        let side = piece.side;

        if let Some(square) = piece.square.take() {
            if self.occupant(square) == Some(id) {
                self.set_occupant(square, None);
            }
        }

        let team = &mut self.teams[side.index()];
        let index = team.pieces.iter().position(|&p| p == id)?;
        team.pieces.remove(index);

        Some(index)
    }
}

impl Default for Board {
    /// A standard 8x8 board, set up for a new game.
    fn default() -> Self {
        // Safe unwrap: the default size is valid
        Self::standard(DEFAULT_BOARD_SIZE).unwrap()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, "{:>2}", x % 10)?;
        }
        writeln!(f)?;

        for y in 0..self.size {
            write!(f, "{y:>2} ")?;
            for x in 0..self.size {
                let square = Square::new(x, y);
                let c = match self.piece_at(square) {
                    Some(piece) => piece.char(),
                    None if square.is_dark() => '_',
                    None => '.',
                };
                write!(f, " {c}")?;
            }

            // Print some extra info alongside the first rows
            if y == 0 {
                write!(f, "    {}: {}", self.team(Side::Top), self.team(Side::Top).len())?;
            } else if y == 1 {
                let bottom = self.team(Side::Bottom);
                write!(f, "    {}: {}", bottom, bottom.len())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
