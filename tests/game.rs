/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use draughts::{
    Board, ControllerKind, Game, GameResult, HumanController, LogNone, SearchLimits, Selection,
    Side, Square,
};

fn game(top: ControllerKind, bottom: ControllerKind, seed: u64) -> Game<LogNone> {
    let build = |kind: ControllerKind, seed| {
        kind.build::<LogNone>(Some(seed), SearchLimits::default(), Duration::from_secs(1))
            .unwrap()
    };

    Game::new(
        Board::standard(8).unwrap(),
        build(top, seed),
        build(bottom, seed + 1),
    )
    .with_max_turns(Some(400))
}

#[test]
fn test_engine_beats_random() {
    let mut wins = [0; Side::COUNT];
    for seed in 0..3 {
        let mut game = game(ControllerKind::Hard, ControllerKind::Random, seed);
        let result = game.play().unwrap();

        assert!(!matches!(result, GameResult::Forfeit { .. }));
        assert!(!game.board().has_virtual_state());
        if let Some(winner) = result.winner() {
            wins[winner.index()] += 1;
        }
    }

    let [top, bottom] = wins;
    assert!(top > bottom, "Hard won {top} games, Random won {bottom}");
}

#[test]
fn test_seeded_games_repeat() {
    let mut a = game(ControllerKind::Medium, ControllerKind::Easy, 17);
    let mut b = game(ControllerKind::Medium, ControllerKind::Easy, 17);

    assert_eq!(a.play().unwrap(), b.play().unwrap());
    assert_eq!(a.history(), b.history());
    assert_eq!(a.board(), b.board());
}

#[test]
fn test_history_alternates_turns() {
    let mut game = game(ControllerKind::Random, ControllerKind::Random, 5);
    game.play().unwrap();

    let mut expected = Side::Bottom;
    for entry in game.history() {
        if entry.continuation {
            assert_eq!(entry.side, expected.opponent());
        } else {
            assert_eq!(entry.side, expected);
            expected = expected.opponent();
        }
    }
}

#[test]
fn test_human_plays_through_channel() {
    let (sender, human) = HumanController::channel(Duration::from_secs(5));
    let top = ControllerKind::Random
        .build::<LogNone>(Some(3), SearchLimits::default(), Duration::from_secs(1))
        .unwrap();

    let mut game = Game::<LogNone>::new(Board::standard(8).unwrap(), top, Box::new(human));

    // An illegal selection is ignored, then a legal one is played
    sender
        .send(Selection::new(Square::new(0, 7), Square::new(1, 6)))
        .unwrap();
    sender
        .send(Selection::new(Square::new(2, 5), Square::new(3, 4)))
        .unwrap();

    assert_eq!(game.play_turn().unwrap(), None);
    assert_eq!(game.history()[0].mv.end, Square::new(3, 4));
    assert_eq!(game.side_to_move(), Side::Top);
    assert!(game
        .controller(Side::Bottom)
        .status()
        .contains("not a legal move"));
}
