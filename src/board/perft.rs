/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Move, Side, VirtualScope};

/// Perform a perft at the specified depth, counting the number of distinct turn sequences `side` and its opponent can play.
///
/// A turn is a single step, or a capture followed by every forced continuation of the same piece,
/// so each distinct chain of jumps counts as its own turn.
/// The board is left exactly as it was found.
///
/// Promotion does not happen during the simulation, so counts are only exact for depths too shallow to promote.
///
/// # Example
/// ```
/// # use draughts::{perft, Board, Side};
/// let mut board = Board::standard(8).unwrap();
/// assert_eq!(perft(&mut board, Side::Bottom, 2), 49);
/// ```
pub fn perft(board: &mut Board, side: Side, depth: usize) -> u64 {
    perft_generic::<false>(board, side, depth)
}

/// Perform a splitperft at the specified depth, printing the number of sequences reachable after each root move.
pub fn splitperft(board: &mut Board, side: Side, depth: usize) -> u64 {
    perft_generic::<true>(board, side, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform a splitperft.
pub fn perft_generic<const SPLIT: bool>(board: &mut Board, side: Side, depth: usize) -> u64 {
    let mut scope = board.virtual_scope(0);
    turns::<SPLIT>(&mut scope, side, depth)
}

/// Counts the turn sequences reachable from the position held by `scope`.
fn turns<const SPLIT: bool>(scope: &mut VirtualScope<'_>, side: Side, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    scope.legal_moves(side).into_iter().fold(0, |nodes, mv| {
        let mut child = scope.nested();
        child.apply(&mv);
        let new_nodes = chain(&mut child, side, &mv, depth);

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

/// Follows every forced continuation of `mv` before handing the turn to the opponent.
fn chain(scope: &mut VirtualScope<'_>, side: Side, mv: &Move, depth: usize) -> u64 {
    let continuation = if mv.is_capture() {
        scope.capture_moves_for(mv.piece)
    } else {
        Vec::new()
    };

    if continuation.is_empty() {
        return turns::<false>(scope, side.opponent(), depth - 1);
    }

    continuation.into_iter().fold(0, |nodes, next| {
        let mut child = scope.nested();
        child.apply(&next);
        nodes + chain(&mut child, side, &next, depth)
    })
}
