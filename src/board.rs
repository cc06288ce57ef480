/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board itself: cells, occupancy, and team setup.
mod grid;

/// Legal move generation and authoritative move application.
mod movegen;

/// The move type.
mod moves;

/// Move-sequence counting, used to validate move generation.
mod perft;

/// Pieces and teams.
mod piece;

/// Pseudo-random number generation.
mod prng;

/// Coordinates and sides.
mod square;

/// Restorable, depth-indexed simulation of moves on top of the board.
mod virtual_layer;

pub use grid::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use prng::*;
pub use square::*;
pub use virtual_layer::*;
