/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use draughts::{Board, Move, PieceKind, RandomSource, Side, Square, XoShiRo};

/// Asserts that every active piece sits on a dark cell that refers back to it, and nothing else is occupied.
fn assert_occupancy_consistent(board: &Board) {
    let mut active = 0;
    for side in Side::all() {
        for piece in board.team_pieces(side) {
            let square = piece.square().expect("active pieces are on the board");
            assert!(square.is_dark(), "{} sits on light cell {square}", piece.id());
            assert_eq!(board.occupant(square), Some(piece.id()));
            active += 1;
        }
    }

    let mut occupied = 0;
    for y in 0..board.size() {
        for x in 0..board.size() {
            if board.get_cell(x, y).unwrap().piece.is_some() {
                occupied += 1;
            }
        }
    }
    assert_eq!(occupied, active);
}

/// Asserts the properties every generated move list must have.
fn assert_moves_well_formed(board: &Board, side: Side, moves: &[Move]) {
    for mv in moves {
        assert!(mv.end.x < board.size() && mv.end.y < board.size());
        assert_eq!(board.occupant(mv.end), None, "{mv} lands on an occupied cell");
        assert_eq!(board.piece(mv.piece).square(), Some(mv.start));

        if let Some(captured) = mv.captured {
            assert_eq!(board.piece(captured).side(), side.opponent());
        }
    }

    // Captures are mandatory, so the list is homogeneous
    let any_capture = board
        .team(side)
        .pieces()
        .iter()
        .any(|&id| board.can_capture(id));
    if any_capture {
        assert!(moves.iter().all(Move::is_capture));
    } else {
        assert!(moves.iter().all(|mv| !mv.is_capture()));
    }
}

#[test]
fn test_capture_scenario() {
    let mut board = Board::new(8).unwrap();
    let king = board
        .place(Side::Bottom, Square::new(2, 5), PieceKind::King)
        .unwrap();
    board
        .place(Side::Bottom, Square::new(6, 5), PieceKind::Regular)
        .unwrap();
    let victim = board
        .place(Side::Top, Square::new(3, 6), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Top, Square::new(1, 0), PieceKind::Regular)
        .unwrap();

    let moves = board.legal_moves(Side::Bottom);
    assert_eq!(
        moves,
        [Move::jump(king, Square::new(2, 5), Square::new(4, 7), victim)]
    );
}

#[test]
fn test_capture_scenario_for_top() {
    let mut board = Board::new(8).unwrap();
    let mover = board
        .place(Side::Top, Square::new(2, 5), PieceKind::Regular)
        .unwrap();
    let victim = board
        .place(Side::Bottom, Square::new(3, 6), PieceKind::Regular)
        .unwrap();

    let moves = board.legal_moves(Side::Top);
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].start, Square::new(2, 5));
    assert_eq!(moves[0].end, Square::new(4, 7));
    assert_eq!(moves[0].piece, mover);
    assert_eq!(moves[0].captured, Some(victim));
}

#[test]
fn test_promotion_is_permanent() {
    let mut board = Board::new(8).unwrap();
    let mover = board
        .place(Side::Top, Square::new(1, 6), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Bottom, Square::new(7, 0), PieceKind::Regular)
        .unwrap();

    let mv = board.legal_moves(Side::Top)[0];
    assert!(board.promotes(&mv));
    let outcome = board.make_move(&mv).unwrap();
    assert!(outcome.promoted);
    assert!(board.piece(mover).is_king());

    // Kings may head back the way they came, and stay kings
    let back = board
        .legal_moves(Side::Top)
        .into_iter()
        .find(|mv| mv.end.y < mv.start.y)
        .expect("a king can move backwards");
    let outcome = board.make_move(&back).unwrap();
    assert!(!outcome.promoted);
    assert_eq!(board.piece(mover).kind(), PieceKind::King);
}

#[test]
fn test_chain_capture_must_continue() {
    let mut board = Board::new(8).unwrap();
    let mover = board
        .place(Side::Bottom, Square::new(0, 7), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Top, Square::new(1, 6), PieceKind::Regular)
        .unwrap();
    let second = board
        .place(Side::Top, Square::new(3, 4), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Top, Square::new(7, 0), PieceKind::Regular)
        .unwrap();

    let first = board.legal_moves(Side::Bottom)[0];
    let outcome = board.make_move(&first).unwrap();

    assert!(outcome.must_continue());
    assert_eq!(
        outcome.continuation,
        [Move::jump(mover, Square::new(2, 5), Square::new(4, 3), second)]
    );

    let outcome = board.make_move(&outcome.continuation[0]).unwrap();
    assert!(!outcome.must_continue());
    assert_eq!(board.team(Side::Top).len(), 1);
}

#[test]
fn test_blocked_team_has_no_moves() {
    let mut board = Board::new(8).unwrap();
    board
        .place(Side::Bottom, Square::new(0, 1), PieceKind::Regular)
        .unwrap();
    board
        .place(Side::Top, Square::new(1, 0), PieceKind::Regular)
        .unwrap();

    assert!(!board.team(Side::Bottom).is_empty());
    assert!(board.legal_moves(Side::Bottom).is_empty());
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..8 {
        let mut rng = XoShiRo::from_seed(seed);
        let mut board = Board::standard(8).unwrap();
        let mut side = Side::Bottom;

        for _ in 0..150 {
            let mut moves = board.legal_moves(side);
            assert_moves_well_formed(&board, side, &moves);
            if moves.is_empty() {
                break;
            }

            loop {
                let mv = moves[rng.below(moves.len())];
                let outcome = board.make_move(&mv).unwrap();
                assert_occupancy_consistent(&board);

                if !outcome.must_continue() {
                    break;
                }

                // Only the piece that just captured may keep going
                assert!(outcome.continuation.iter().all(|next| next.piece == mv.piece));
                moves = outcome.continuation;
            }

            side = side.opponent();
        }
    }
}
