/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use draughts::{
    Board, ControllerKind, Engine, EngineOptions, LogNone, PieceKind, Score, SearchLimits, Side,
    Square,
};

/// A lone bottom piece about to capture the last top piece, which is of `kind`.
fn last_capture(kind: PieceKind) -> Board {
    let mut board = Board::new(8).unwrap();
    board
        .place(Side::Bottom, Square::new(2, 5), PieceKind::Regular)
        .unwrap();
    board.place(Side::Top, Square::new(3, 4), kind).unwrap();
    board
}

fn score_of_only_move(options: EngineOptions, kind: PieceKind) -> Score {
    let mut board = last_capture(kind);
    let moves = board.legal_moves(Side::Bottom);
    assert_eq!(moves.len(), 1);

    let engine = Engine::<LogNone>::new(1, options).unwrap();
    engine.analyze(&moves, &mut board, Side::Bottom)[0].score
}

#[test]
fn test_king_capture_worth_exactly_its_value() {
    for king_capture_value in [1.0, 3.0] {
        let options = EngineOptions {
            king_capture_value,
            ..Default::default()
        };

        let regular = score_of_only_move(options, PieceKind::Regular);
        let king = score_of_only_move(options, PieceKind::King);

        // Undo the decay to compare raw scores
        let difference = (king - regular) * options.decay;
        assert_eq!(difference, Score(king_capture_value));
    }
}

/// A top piece one step away from promoting, facing a bottom piece that has nowhere to go.
fn about_to_promote() -> Board {
    let mut board = Board::new(8).unwrap();
    board
        .place(Side::Top, Square::new(1, 6), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Bottom, Square::new(5, 0), PieceKind::Regular)
        .unwrap();
    board
}

fn top_scores(board: &mut Board, options: EngineOptions) -> Vec<Score> {
    let moves = board.legal_moves(Side::Top);
    let engine = Engine::<LogNone>::new(1, options).unwrap();
    engine
        .analyze(&moves, board, Side::Top)
        .into_iter()
        .map(|a| a.score)
        .collect()
}

#[test]
fn test_promotion_value() {
    // Promotion, plus the opponent left without moves: (1 + 8) / 4
    let defaults = top_scores(&mut about_to_promote(), EngineOptions::default());
    assert_eq!(defaults, [Score(2.25), Score(2.25)]);

    let options = EngineOptions {
        promotion_value: 5.0,
        ..Default::default()
    };
    let boosted = top_scores(&mut about_to_promote(), options);
    assert_eq!(boosted, [Score(3.25), Score(3.25)]);
}

#[test]
fn test_dead_piece_penalty() {
    // A regular piece on the far row has no moves left, since promotion is never simulated
    let options = EngineOptions {
        dead_piece_penalty: 3.0,
        ..Default::default()
    };
    let scores = top_scores(&mut about_to_promote(), options);
    assert_eq!(scores, [Score(1.5), Score(1.5)]);
}

#[test]
fn test_reply_scores_are_subtracted() {
    let mut board = Board::new(8).unwrap();
    board
        .place(Side::Top, Square::new(0, 1), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Bottom, Square::new(2, 3), PieceKind::Regular)
        .unwrap();

    // The only move walks into a capture worth (1 + 8) / 4 to the opponent
    let scores = top_scores(&mut board, EngineOptions::default());
    assert_eq!(scores, [Score(-2.25 / 4.0)]);
}

#[test]
fn test_virtual_round_trip() {
    let mut board = Board::standard(8).unwrap();
    let before = board.clone();

    let moves = board.legal_moves(Side::Bottom);
    let mover = moves[0].piece;
    let victim = board.team(Side::Top).pieces()[5];
    let bystander = board.team(Side::Top).pieces()[0];

    board.virtual_move(mover, Square::new(4, 3), 2);
    board.virtual_capture(victim, 2);
    board.virtual_move(mover, Square::new(3, 4), 2);
    board.virtual_capture(bystander, 2);
    assert_ne!(board, before);

    board.virtual_reset(bystander, 2).unwrap();
    board.virtual_reset(victim, 2).unwrap();
    board.virtual_reset(mover, 2).unwrap();

    assert_eq!(board, before);
    assert!(!board.has_virtual_state());
}

#[test]
fn test_search_round_trip() {
    let mut board = Board::standard(8).unwrap();
    let before = board.clone();
    let moves = board.legal_moves(Side::Bottom);

    for depth in 1..=2 {
        let engine = Engine::<LogNone>::new(depth, EngineOptions::default()).unwrap();
        engine.analyze(&moves, &mut board, Side::Bottom);
        assert_eq!(board, before, "depth {depth} left state behind");
    }
}

#[test]
fn test_timeout_still_yields_analysis() {
    let mut board = Board::standard(8).unwrap();
    let before = board.clone();
    let moves = board.legal_moves(Side::Bottom);

    let limits = SearchLimits {
        hard_timeout: Duration::ZERO,
        ..Default::default()
    };
    let engine = Engine::<LogNone>::new(3, EngineOptions::default())
        .unwrap()
        .with_limits(limits);
    let result = engine.search(&moves, &mut board, Side::Bottom);

    assert_eq!(result.analysis.len(), moves.len());
    assert_eq!(result.depth, 0);
    assert_eq!(board, before);
}

#[test]
fn test_controllers_are_deterministic() {
    let kinds = [
        ControllerKind::Random,
        ControllerKind::Easy,
        ControllerKind::Medium,
        ControllerKind::Hard,
        ControllerKind::Engine,
    ];

    for kind in kinds {
        for seed in [0, 1, 99] {
            let build = || {
                kind.build::<LogNone>(Some(seed), SearchLimits::default(), Duration::from_secs(1))
                    .unwrap()
            };
            let (mut a, mut b) = (build(), build());

            let mut board = Board::standard(8).unwrap();
            for side in [Side::Bottom, Side::Top, Side::Bottom] {
                let moves = board.legal_moves(side);
                let first = a.pick_move(&moves, &mut board, side).unwrap();
                let second = b.pick_move(&moves, &mut board, side).unwrap();
                assert_eq!(first, second, "{} diverged with seed {seed}", a.name());

                let outcome = board.make_move(&moves[first]).unwrap();
                assert!(!outcome.must_continue());
            }
        }
    }
}
