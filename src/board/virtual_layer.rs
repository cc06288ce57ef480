/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ops::Deref;

use anyhow::{bail, Result};

use super::{Board, Move, PieceId, Side, Square};

/// State of a piece saved before its first virtual mutation at some layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    /// Search depth at which this snapshot was taken.
    pub layer: usize,

    /// Where the piece was.
    pub square: Option<Square>,

    /// Where the piece was within its team's active set, if it was virtually captured at this layer.
    pub team_index: Option<usize>,

    /// How many of its teammates were already virtually captured when this piece was.
    ///
    /// A captured piece can only be put back while exactly that many remain captured;
    /// otherwise `team_index` would point into a differently shaped team.
    pub captured_before: usize,
}

impl Board {
    /// Saves the state of `id` for `layer`, unless a snapshot for `layer` already exists.
    ///
    /// Returns `true` if a new snapshot was pushed.
    fn snapshot_if_absent(&mut self, id: PieceId, layer: usize) -> bool {
        let stack = &self.snapshots[id.index()];
        if let Some(top) = stack.last() {
            debug_assert!(
                top.layer <= layer,
                "Piece {id} mutated at layer {layer} while a snapshot at layer {} is still live",
                top.layer
            );

            if top.layer == layer {
                return false;
            }
        }

        let snapshot = Snapshot {
            layer,
            square: self.pieces[id.index()].square,
            team_index: None,
            captured_before: 0,
        };
        self.snapshots[id.index()].push(snapshot);

        true
    }

    /// Moves `id` onto `to` without affecting authoritative state, recording a snapshot for `layer` if one is absent.
    ///
    /// Promotion never happens virtually.
    pub fn virtual_move(&mut self, id: PieceId, to: Square, layer: usize) {
        debug_assert!(
            !matches!(self.occupant(to), Some(occupant) if occupant != id),
            "Virtual move of {id} onto occupied square {to}"
        );

        self.snapshot_if_absent(id, layer);
        self.relocate(id, to);
    }

    /// Removes `id` from the board and from its team's active set, recording a snapshot for `layer` if one is absent.
    ///
    /// The piece itself is retained, so that it can be restored by [`Board::virtual_reset`].
    pub fn virtual_capture(&mut self, id: PieceId, layer: usize) {
        self.snapshot_if_absent(id, layer);

        let captured_before = self.virtually_captured(self.pieces[id.index()].side, id);
        if let Some(index) = self.detach(id) {
            if let Some(snapshot) = self.snapshots[id.index()].last_mut() {
                snapshot.team_index = Some(index);
                snapshot.captured_before = captured_before;
            }
        }
    }

    /// Number of pieces on `side`, other than `except`, that are currently virtually captured.
    fn virtually_captured(&self, side: Side, except: PieceId) -> usize {
        self.pieces
            .iter()
            .filter(|p| p.side == side && p.id != except && p.square.is_none())
            .filter(|p| !self.snapshots[p.id.index()].is_empty())
            .count()
    }

    /// Restores `id` to the state saved by its snapshot for `layer`, discarding that snapshot.
    ///
    /// Fails if the most recent snapshot of `id` was not taken at `layer`, or if `id` was virtually captured and
    /// teammates captured after it are still off the board.
    /// Either means the snapshots were not released in the reverse order of their acquisition.
    pub fn virtual_reset(&mut self, id: PieceId, layer: usize) -> Result<()> {
        let Some(snapshot) = self.snapshots[id.index()].last().copied() else {
            bail!("Cannot reset piece {id} at layer {layer}: it has no snapshots");
        };

        if snapshot.layer != layer {
            bail!(
                "Cannot reset piece {id} at layer {layer}: its most recent snapshot is from layer {}",
                snapshot.layer
            );
        }

        let side = self.pieces[id.index()].side;
        let returning =
            snapshot.team_index.is_some() && !self.teams[side.index()].pieces.contains(&id);

        // Teammates captured after this piece must be put back first
        if returning {
            let captured = self.virtually_captured(side, id);
            if captured != snapshot.captured_before {
                bail!(
                    "Cannot reset piece {id} at layer {layer}: {captured} teammates are captured, but {} were when it was",
                    snapshot.captured_before
                );
            }
        }
        self.snapshots[id.index()].pop();

        // Vacate wherever the piece currently is
        if let Some(current) = self.pieces[id.index()].square {
            if self.occupant(current) == Some(id) {
                self.set_occupant(current, None);
            }
        }

        // Put it back where it was
        self.pieces[id.index()].square = snapshot.square;
        if let Some(square) = snapshot.square {
            self.set_occupant(square, Some(id));
        }

        // Re-add it to its team, in the same position, if it had been captured
        if let (true, Some(index)) = (returning, snapshot.team_index) {
            let team = &mut self.teams[side.index()].pieces;
            team.insert(index.min(team.len()), id);
        }

        Ok(())
    }

    /// Returns `true` if any piece holds a live virtual snapshot.
    pub fn has_virtual_state(&self) -> bool {
        self.snapshots.iter().any(|stack| !stack.is_empty())
    }

    /// Opens a [`VirtualScope`] at `layer`.
    ///
    /// Every piece mutated through the scope is restored when the scope is dropped.
    pub fn virtual_scope(&mut self, layer: usize) -> VirtualScope<'_> {
        VirtualScope {
            board: self,
            layer,
            touched: Vec::new(),
        }
    }
}

/// Scoped access to a [`Board`] for simulating moves at a single search layer.
///
/// All mutations go through the virtual layer, and are undone in reverse order when the scope is dropped.
/// This holds on every exit path, including early returns via `?` and unwinding.
///
/// Deeper layers are opened with [`VirtualScope::nested`], which borrows this scope mutably,
/// so the borrow checker guarantees that a deeper layer is always released before a shallower one.
///
/// # Example
/// ```
/// # use draughts::{Board, Side};
/// let mut board = Board::standard(8).unwrap();
/// let before = board.clone();
/// let mv = board.legal_moves(Side::Bottom)[0];
///
/// {
///     let mut scope = board.virtual_scope(0);
///     scope.apply(&mv);
///     assert_eq!(scope.occupant(mv.end), Some(mv.piece));
/// }
///
/// assert_eq!(board, before);
/// ```
#[derive(Debug)]
pub struct VirtualScope<'a> {
    board: &'a mut Board,
    layer: usize,
    touched: Vec<PieceId>,
}

impl VirtualScope<'_> {
    /// The layer this scope records snapshots at.
    #[inline(always)]
    pub const fn layer(&self) -> usize {
        self.layer
    }

    /// Opens a scope one layer deeper than this one.
    pub fn nested(&mut self) -> VirtualScope<'_> {
        let layer = self.layer + 1;
        self.board.virtual_scope(layer)
    }

    /// Remember that `id` must be reset when this scope ends.
    ///
    /// Pieces are kept in order of their most recent mutation, so they are reset in the reverse of that order.
    fn touch(&mut self, id: PieceId) {
        if let Some(i) = self.touched.iter().position(|&p| p == id) {
            self.touched.remove(i);
        }
        self.touched.push(id);
    }

    /// See [`Board::virtual_move`].
    pub fn virtual_move(&mut self, id: PieceId, to: Square) {
        self.touch(id);
        self.board.virtual_move(id, to, self.layer);
    }

    /// See [`Board::virtual_capture`].
    pub fn virtual_capture(&mut self, id: PieceId) {
        self.touch(id);
        self.board.virtual_capture(id, self.layer);
    }

    /// Virtually plays a single step or jump, capturing the jumped piece if there is one.
    pub fn apply(&mut self, mv: &Move) {
        if let Some(captured) = mv.captured {
            self.virtual_capture(captured);
        }
        self.virtual_move(mv.piece, mv.end);
    }
}

impl Deref for VirtualScope<'_> {
    type Target = Board;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl Drop for VirtualScope<'_> {
    fn drop(&mut self) {
        let layer = self.layer;
        for id in self.touched.drain(..).rev() {
            if let Err(err) = self.board.virtual_reset(id, layer) {
                // A second panic while unwinding would abort, so only report the first one.
                if !std::thread::panicking() {
                    panic!("{err}");
                }
            }
        }
    }
}
