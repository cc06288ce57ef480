/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, marker::PhantomData};

use anyhow::{Context, Result};

use crate::{send_string, Board, Controller, LogLevel, Move, Side};

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// The other side ran out of pieces, or had no legal move on its turn.
    Win(Side),

    /// The turn limit was reached.
    Draw,

    /// A controller failed to produce a legal move, and its side lost.
    Forfeit { loser: Side, reason: String },
}

impl GameResult {
    /// The side that won, if any.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Self::Win(side) => Some(*side),
            Self::Draw => None,
            Self::Forfeit { loser, .. } => Some(loser.opponent()),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(side) => write!(f, "{side} wins"),
            Self::Draw => write!(f, "draw"),
            Self::Forfeit { loser, reason } => {
                write!(f, "{} wins by forfeit ({reason})", loser.opponent())
            }
        }
    }
}

/// A single move that was played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub side: Side,
    pub mv: Move,

    /// Whether this move continued a capture chain begun by the previous entry.
    pub continuation: bool,
}

/// Drives a game between two [`Controller`]s.
///
/// The bottom side moves first. A turn lasts until the moving piece's capture chain ends,
/// so the side to move only changes once a move and every forced follow-up capture have been applied.
#[derive(Debug)]
pub struct Game<Log> {
    board: Board,

    /// Indexed by [`Side`].
    controllers: [Box<dyn Controller>; Side::COUNT],

    history: Vec<HistoryEntry>,
    side_to_move: Side,

    /// Number of completed turns.
    turns: usize,
    max_turns: Option<usize>,
    result: Option<GameResult>,
    log: PhantomData<Log>,
}

impl<Log: LogLevel> Game<Log> {
    /// Creates a new game on `board`, with `bottom` to move first.
    ///
    /// Each team is renamed after the controller playing it, keeping its color.
    pub fn new(mut board: Board, top: Box<dyn Controller>, bottom: Box<dyn Controller>) -> Self {
        for (side, controller) in [(Side::Top, &top), (Side::Bottom, &bottom)] {
            let color = board.team(side).color().to_string();
            board.set_team_identity(side, controller.name(), color);
        }

        Self {
            board,
            controllers: [top, bottom],
            history: Vec::new(),
            side_to_move: Side::Bottom,
            turns: 0,
            max_turns: None,
            result: None,
            log: PhantomData,
        }
    }

    /// Ends the game in a draw once `max_turns` turns have been played.
    pub fn with_max_turns(mut self, max_turns: Option<usize>) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn turns(&self) -> usize {
        self.turns
    }

    #[inline(always)]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// The controller playing for `side`.
    #[inline(always)]
    pub fn controller(&self, side: Side) -> &dyn Controller {
        self.controllers[side.index()].as_ref()
    }

    /// Determines whether the game has been won in the current position.
    ///
    /// A side loses if it has no pieces left, or if it is its turn and it has no legal moves.
    pub fn winner(&self) -> Option<Side> {
        for side in Side::all() {
            if self.board.team(side).is_empty() {
                return Some(side.opponent());
            }
        }

        if self.board.legal_moves(self.side_to_move).is_empty() {
            return Some(self.side_to_move.opponent());
        }

        None
    }

    /// Checks for the end of the game, recording the result if there is one.
    fn adjudicate(&mut self) -> Option<GameResult> {
        if self.result.is_none() {
            if let Some(side) = self.winner() {
                self.result = Some(GameResult::Win(side));
            } else if self.max_turns.is_some_and(|max| self.turns >= max) {
                self.result = Some(GameResult::Draw);
            }
        }

        self.result.clone()
    }

    /// Plays a single turn for the side to move.
    ///
    /// Returns the result of the game if it is over, either before or after this turn.
    /// A controller that fails to pick a legal move forfeits the game.
    /// Errors are reserved for a move that passed legality checks but could not be applied.
    pub fn play_turn(&mut self) -> Result<Option<GameResult>> {
        if let Some(result) = self.adjudicate() {
            return Ok(Some(result));
        }

        let us = self.side_to_move;
        let mut moves = self.board.legal_moves(us);
        let mut continuation = false;

        loop {
            let mv = match self.pick(&moves, us) {
                Ok(mv) => mv,
                Err(err) => {
                    let result = GameResult::Forfeit {
                        loser: us,
                        reason: format!("{err:#}"),
                    };
                    if Log::INFO {
                        send_string(&result);
                    }
                    self.result = Some(result.clone());
                    return Ok(Some(result));
                }
            };

            let outcome = self
                .board
                .make_move(&mv)
                .with_context(|| format!("Failed to apply {us}'s move {mv}"))?;

            self.history.push(HistoryEntry {
                side: us,
                mv,
                continuation,
            });

            if Log::INFO {
                send_string(format!(
                    "{} ({us}) played {mv}: {}",
                    self.board.team(us).name(),
                    self.controller(us).status()
                ));
            }

            if !outcome.must_continue() {
                break;
            }

            // The same piece has to keep capturing
            moves = outcome.continuation;
            continuation = true;
        }

        self.side_to_move = us.opponent();
        self.turns += 1;

        Ok(self.adjudicate())
    }

    /// Asks the controller for `us` to choose one of `moves`.
    fn pick(&mut self, moves: &[Move], us: Side) -> Result<Move> {
        let controller = &mut self.controllers[us.index()];
        let index = controller.pick_move(moves, &mut self.board, us)?;

        moves.get(index).copied().with_context(|| {
            format!(
                "{} picked move {index}, but only {} were available",
                controller.name(),
                moves.len()
            )
        })
    }

    /// Plays turns until the game is over.
    pub fn play(&mut self) -> Result<GameResult> {
        loop {
            if let Some(result) = self.play_turn()? {
                return Ok(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{HumanController, LogNone, PieceKind, RandomController, Sequence, Square, XoShiRo};

    fn random(seed: u64) -> Box<dyn Controller> {
        Box::new(RandomController::new(XoShiRo::from_seed(seed)))
    }

    #[test]
    fn test_turn_limit_draws() {
        let mut game =
            Game::<LogNone>::new(Board::standard(8).unwrap(), random(1), random(2))
                .with_max_turns(Some(4));

        assert_eq!(game.play().unwrap(), GameResult::Draw);
        assert_eq!(game.turns(), 4);
        assert_eq!(game.history()[0].side, Side::Bottom);
        assert_eq!(game.history()[1].side, Side::Top);
    }

    #[test]
    fn test_teams_named_after_controllers() {
        let (_sender, human) = HumanController::channel(Duration::from_secs(1));
        let game = Game::<LogNone>::new(Board::standard(8).unwrap(), random(1), Box::new(human));

        assert_eq!(game.board().team(Side::Top).name(), "Random");
        assert_eq!(game.board().team(Side::Bottom).name(), "Human");
        assert_eq!(game.board().team(Side::Top).color(), "red");
        assert_eq!(game.board().team(Side::Bottom).color(), "blue");
    }

    #[test]
    fn test_stuck_side_loses() {
        let mut board = Board::new(8).unwrap();
        board
            .place(Side::Bottom, Square::new(0, 1), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(1, 0), PieceKind::Regular)
            .unwrap();

        let mut game = Game::<LogNone>::new(board, random(1), random(2));
        assert_eq!(game.play_turn().unwrap(), Some(GameResult::Win(Side::Top)));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_chain_stays_in_one_turn() {
        let mut board = Board::new(8).unwrap();
        board
            .place(Side::Bottom, Square::new(0, 7), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(1, 6), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(3, 4), PieceKind::Regular)
            .unwrap();

        let bottom = Box::new(RandomController::new(Sequence::zeros()));
        let mut game = Game::<LogNone>::new(board, random(1), bottom);

        let result = game.play_turn().unwrap();
        assert_eq!(result, Some(GameResult::Win(Side::Bottom)));
        assert_eq!(game.turns(), 1);

        let history = game.history();
        assert_eq!(history.len(), 2);
        assert!(!history[0].continuation);
        assert!(history[1].continuation);
        assert_eq!(history[1].mv.end, Square::new(4, 3));
    }

    #[test]
    fn test_failing_controller_forfeits() {
        let (sender, human) = HumanController::channel(Duration::from_secs(1));
        drop(sender);

        let mut game = Game::<LogNone>::new(Board::standard(8).unwrap(), random(1), Box::new(human));
        let result = game.play().unwrap();

        assert!(matches!(result, GameResult::Forfeit { loser: Side::Bottom, .. }));
        assert_eq!(result.winner(), Some(Side::Top));
    }
}
