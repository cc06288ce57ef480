/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{ensure_moves, Controller, Difficulty};
use crate::{
    inverted_weights, send_string, Board, Engine, EngineOptions, LogLevel, Move, MoveAnalysis,
    RandomSource, Score, SearchLimits, Side, XoShiRo,
};

/// Plays the move an [`Engine`] ranks highest.
///
/// Ties at the top are broken randomly, weighted towards moves that end closer to the opponent's pieces.
#[derive(Debug, Clone)]
pub struct EngineController<Log, R = XoShiRo> {
    engine: Engine<Log>,
    rng: R,
    name: &'static str,
    difficulty: Difficulty,
    description: &'static str,

    /// Score of the most recently chosen move.
    last_score: Option<Score>,
}

impl<Log: LogLevel, R: RandomSource> EngineController<Log, R> {
    /// Creates a controller backed by an engine searching `depth` full rounds.
    ///
    /// Fails if the engine rejects `depth` or `options`.
    pub fn new(depth: usize, options: EngineOptions, rng: R) -> Result<Self> {
        Ok(Self {
            engine: Engine::new(depth, options)?,
            rng,
            name: "Engine",
            difficulty: Difficulty::VeryHard,
            description: "Advanced checkers engine.",
            last_score: None,
        })
    }

    /// A shallower engine that greatly overvalues kings and doesn't discount the future.
    pub fn hard(rng: R) -> Result<Self> {
        let options = EngineOptions {
            king_capture_value: 2.0,
            promotion_value: 4.0,
            no_moves_value: 0.0,
            decay: 1.0,
            dead_piece_penalty: 0.0,
        };

        let mut controller = Self::new(1, options, rng)?;
        controller.name = "Hard";
        controller.difficulty = Difficulty::Hard;
        controller.description = "Weaker checkers engine.";
        Ok(controller)
    }

    /// Sets the work allowance of every search.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.engine = self.engine.with_limits(limits);
        self
    }

    #[inline(always)]
    pub const fn engine(&self) -> &Engine<Log> {
        &self.engine
    }

    /// Scores every move in `moves`, without choosing one.
    pub fn analyze(&self, moves: &[Move], board: &mut Board, us: Side) -> Vec<MoveAnalysis> {
        self.engine.analyze(moves, board, us)
    }

    /// Picks among the highest-scoring entries of `analysis`.
    fn choose(&mut self, analysis: &[MoveAnalysis]) -> Result<MoveAnalysis> {
        let Some(best) = analysis.iter().map(|a| a.score).max_by(Score::total_cmp) else {
            bail!("{} controller has nothing to choose from", self.name);
        };

        let tied = analysis
            .iter()
            .filter(|a| a.score == best)
            .copied()
            .collect::<Vec<_>>();

        let distances = tied.iter().map(|a| a.distance).collect::<Vec<_>>();
        let Some(pick) = self.rng.weighted(&inverted_weights(&distances)) else {
            bail!("{} controller found no move to weigh", self.name);
        };

        Ok(tied[pick])
    }
}

impl<Log: LogLevel, R: RandomSource + fmt::Debug> Controller for EngineController<Log, R> {
    fn name(&self) -> &str {
        self.name
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn description(&self) -> &str {
        self.description
    }

    fn status(&self) -> String {
        match self.last_score {
            Some(score) => format!("Last move ranking: {:.3}", score.inner()),
            None => self.description.to_string(),
        }
    }

    fn pick_move(&mut self, moves: &[Move], board: &mut Board, us: Side) -> Result<usize> {
        ensure_moves(self.name, moves)?;

        let result = self.engine.search(moves, board, us);
        if Log::DEBUG {
            send_string(format!(
                "{} searched {} nodes to depth {}",
                self.name, result.nodes, result.depth
            ));
        }

        let choice = self.choose(&result.analysis)?;
        self.last_score = Some(choice.score);

        Ok(choice.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogNone, PieceKind, Sequence, Square};

    #[test]
    fn test_prefers_the_longer_chain() {
        let mut board = Board::new(8).unwrap();
        board
            .place(Side::Bottom, Square::new(2, 5), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Bottom, Square::new(6, 7), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(3, 4), PieceKind::Regular)
            .unwrap();
        board
            .place(Side::Top, Square::new(5, 6), PieceKind::King)
            .unwrap();

        let moves = board.legal_moves(Side::Bottom);
        assert_eq!(moves.len(), 2);

        // Taking the king on (5,6) continues over (3,4) and wipes out the opponent
        let mut controller =
            EngineController::<LogNone, _>::new(1, EngineOptions::default(), Sequence::zeros())
                .unwrap();
        let i = controller
            .pick_move(&moves, &mut board, Side::Bottom)
            .unwrap();

        assert_eq!(moves[i].end, Square::new(4, 5));
        assert_eq!(controller.status(), "Last move ranking: 2.750");
    }

    #[test]
    fn test_hard_metadata() {
        let controller = EngineController::<LogNone, _>::hard(XoShiRo::new()).unwrap();
        assert_eq!(controller.name(), "Hard");
        assert_eq!(controller.difficulty(), Difficulty::Hard);
        assert_eq!(controller.engine().depth(), 1);
        assert_eq!(controller.status(), "Weaker checkers engine.");
    }

    #[test]
    fn test_tie_break_never_excludes() {
        let analysis = [
            MoveAnalysis {
                score: Score(1.0),
                distance: 2,
                index: 0,
            },
            MoveAnalysis {
                score: Score(0.5),
                distance: 0,
                index: 1,
            },
            MoveAnalysis {
                score: Score(1.0),
                distance: 6,
                index: 2,
            },
        ];

        // The farthest tied move still has weight 1, so the highest draw lands on it
        let mut controller =
            EngineController::<LogNone, _>::new(1, EngineOptions::default(), Sequence::new([u64::MAX]))
                .unwrap();
        assert_eq!(controller.choose(&analysis).unwrap().index, 2);

        let mut controller =
            EngineController::<LogNone, _>::new(1, EngineOptions::default(), Sequence::zeros())
                .unwrap();
        assert_eq!(controller.choose(&analysis).unwrap().index, 0);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut board = Board::standard(8).unwrap();
        let moves = board.legal_moves(Side::Bottom);

        let mut a = EngineController::<LogNone, _>::hard(XoShiRo::from_seed(3)).unwrap();
        let mut b = EngineController::<LogNone, _>::hard(XoShiRo::from_seed(3)).unwrap();
        for _ in 0..5 {
            assert_eq!(
                a.pick_move(&moves, &mut board, Side::Bottom).unwrap(),
                b.pick_move(&moves, &mut board, Side::Bottom).unwrap()
            );
        }
    }
}
