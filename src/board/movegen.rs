/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{bail, Result};

use super::{Board, Move, MoveList, PieceId, PieceKind, Side};

/// The result of applying a move to the board with [`Board::make_move`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveOutcome {
    /// The piece removed from the board, if the move was a capture.
    pub captured: Option<PieceId>,

    /// Whether the moving piece was promoted to a king by this move.
    pub promoted: bool,

    /// Captures the moving piece is forced to continue with before the turn passes.
    ///
    /// Always empty if the move was not a capture.
    pub continuation: MoveList,
}

impl MoveOutcome {
    /// Returns `true` if the same piece must capture again before the turn passes.
    #[inline(always)]
    pub fn must_continue(&self) -> bool {
        !self.continuation.is_empty()
    }
}

impl Board {
    /// Generates every move available to the piece `id`, ignoring the rest of its team.
    ///
    /// For each diagonal neighbor the piece may step towards:
    /// an empty cell yields a step, a friendly piece blocks, and an opposing piece yields a jump
    /// if and only if the cell beyond it exists and is empty.
    ///
    /// A piece with no board association (i.e. one that was captured) has no moves.
    pub fn legal_moves_for(&self, id: PieceId) -> MoveList {
        let piece = self.piece(id);
        let Some(start) = piece.square() else {
            return MoveList::new();
        };

        let mut moves = MoveList::with_capacity(4);
        for (to, dx, dy) in piece.diagonals(self.size) {
            let Some(occupant) = self.occupant(to) else {
                moves.push(Move::step(id, start, to));
                continue;
            };

            // Friendly pieces block the way
            if self.piece(occupant).side() == piece.side() {
                continue;
            }

            // The only possibility left is an opposing piece, which may be jumped if there is room behind it
            if let Some(landing) = to.offset(dx, dy, self.size) {
                if self.occupant(landing).is_none() {
                    moves.push(Move::jump(id, start, landing, occupant));
                }
            }
        }

        moves
    }

    /// Generates only the captures available to the piece `id`.
    pub fn capture_moves_for(&self, id: PieceId) -> MoveList {
        let mut moves = self.legal_moves_for(id);
        moves.retain(Move::is_capture);
        moves
    }

    /// Returns `true` if the piece `id` can capture something right now.
    pub fn can_capture(&self, id: PieceId) -> bool {
        self.legal_moves_for(id).iter().any(Move::is_capture)
    }

    /// Generates every legal move for the team on `side`.
    ///
    /// Moves are ordered by the team's piece order, and then by each piece's diagonal order.
    /// If any capture is available, only captures are returned, so the result is either all captures or all steps.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Board, Side};
    /// let board = Board::standard(8).unwrap();
    /// assert_eq!(board.legal_moves(Side::Bottom).len(), 7);
    /// assert_eq!(board.legal_moves(Side::Top).len(), 7);
    /// ```
    pub fn legal_moves(&self, side: Side) -> MoveList {
        let mut moves = self
            .team(side)
            .pieces()
            .iter()
            .flat_map(|&id| self.legal_moves_for(id))
            .collect::<MoveList>();

        // Captures are mandatory
        if moves.iter().any(Move::is_capture) {
            moves.retain(Move::is_capture);
        }

        moves
    }

    /// Returns `true` if `mv` would promote its piece.
    ///
    /// That is, the piece is a regular piece and `mv` ends on the far row for its side.
    pub fn promotes(&self, mv: &Move) -> bool {
        let piece = self.piece(mv.piece);
        !piece.is_king() && mv.end.y == piece.side().promotion_row(self.size)
    }

    /// Applies `mv` to the board, capturing and promoting as necessary.
    ///
    /// This is the authoritative mutation; it fails if `mv` does not describe the current state of the board,
    /// or if a search still holds virtual state.
    ///
    /// If the move was a capture and the same piece can capture again, the returned [`MoveOutcome`] lists the
    /// captures the piece must choose from before the turn passes.
    pub fn make_move(&mut self, mv: &Move) -> Result<MoveOutcome> {
        if self.has_virtual_state() {
            bail!("Cannot make move {mv} while virtual moves are still being simulated");
        }

        let piece = self.piece(mv.piece);
        if piece.square() != Some(mv.start) {
            bail!(
                "Cannot make move {mv}: piece {} is on {:?}, not {}",
                mv.piece,
                piece.square(),
                mv.start
            );
        }
        if let Some(occupant) = self.occupant(mv.end) {
            bail!("Cannot make move {mv}: destination is occupied by {occupant}");
        }
        if let Some(captured) = mv.captured {
            let victim = self.piece(captured);
            if victim.side() == piece.side() || victim.square().is_none() {
                bail!("Cannot make move {mv}: {captured} is not an opposing piece on the board");
            }
        }

        let promoted = self.promotes(mv);

        self.relocate(mv.piece, mv.end);
        if let Some(captured) = mv.captured {
            self.detach(captured);
        }

        // Promotion is permanent
        if promoted {
            self.pieces[mv.piece.index()].kind = PieceKind::King;
        }

        let continuation = if mv.is_capture() {
            self.capture_moves_for(mv.piece)
        } else {
            MoveList::new()
        };

        Ok(MoveOutcome {
            captured: mv.captured,
            promoted,
            continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn test_detached_piece_has_no_moves() {
        let mut board = Board::standard(8).unwrap();
        let id = board.team(Side::Bottom).pieces()[0];
        board.detach(id);
        assert!(board.legal_moves_for(id).is_empty());
    }

    #[test]
    fn test_friendly_pieces_block() {
        let board = Board::standard(8).unwrap();

        // Back-row pieces are boxed in by their own team
        let back = board.occupant(Square::new(0, 7)).unwrap();
        assert!(board.legal_moves_for(back).is_empty());
    }

    #[test]
    fn test_jump_needs_empty_landing() {
        let mut board = Board::new(8).unwrap();
        let mover = board
            .place(Side::Bottom, Square::new(2, 5), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(3, 4), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(4, 3), PieceKind::Regular)
            .unwrap();

        let moves = board.legal_moves_for(mover);
        assert_eq!(moves, [Move::step(mover, Square::new(2, 5), Square::new(1, 4))]);
    }

    #[test]
    fn test_jump_off_the_edge_is_dropped() {
        let mut board = Board::new(8).unwrap();
        let mover = board
            .place(Side::Bottom, Square::new(1, 2), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(0, 1), PieceKind::Regular)
            .unwrap();

        let moves = board.legal_moves_for(mover);
        assert_eq!(moves, [Move::step(mover, Square::new(1, 2), Square::new(2, 1))]);
    }

    #[test]
    fn test_make_move_rejects_stale_moves() {
        let mut board = Board::standard(8).unwrap();
        let mv = board.legal_moves(Side::Bottom)[0];
        assert!(board.make_move(&mv).is_ok());
        assert!(board.make_move(&mv).is_err());
    }

    #[test]
    fn test_make_move_rejected_during_simulation() {
        let mut board = Board::standard(8).unwrap();
        let mv = board.legal_moves(Side::Bottom)[0];
        board.virtual_move(mv.piece, mv.end, 0);
        assert!(board.make_move(&mv).is_err());
        board.virtual_reset(mv.piece, 0).unwrap();
    }
}
