/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board, its pieces, and the rules of movement.
mod board;

/// Command-line interface of the `draughts` binary.
mod cli;

/// Everything that can choose a move.
mod controllers;

/// Running a match between two controllers.
mod game;

/// Heuristic search over candidate moves.
mod search;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use cli::*;
pub use controllers::*;
pub use game::*;
pub use search::*;
pub use utils::*;
