/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Result;
use clap::Parser;
use draughts::{
    perft, splitperft, Board, Cli, Command, Game, LogDebug, LogInfo, LogLevel, LogNone,
    MatchConfig, Side, Verbosity,
};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => match config.verbosity {
            Verbosity::Quiet => play::<LogNone>(&config),
            Verbosity::Info => play::<LogInfo>(&config),
            Verbosity::Debug => play::<LogDebug>(&config),
        },

        Command::Perft { depth } => {
            let mut board = Board::standard(config.size)?;
            println!("{}", perft(&mut board, Side::Bottom, depth));
            Ok(())
        }

        Command::Splitperft { depth } => {
            let mut board = Board::standard(config.size)?;
            splitperft(&mut board, Side::Bottom, depth);
            Ok(())
        }

        Command::Display => {
            let board = Board::standard(config.size)?;
            let moves = board
                .legal_moves(Side::Bottom)
                .into_iter()
                .map(|mv| mv.to_string())
                .collect::<Vec<_>>();

            println!("{board}");
            println!("{}", moves.join(", "));
            Ok(())
        }
    }
}

/// Plays a full match as described by `config`, printing the outcome.
fn play<Log: LogLevel>(config: &MatchConfig) -> Result<()> {
    let board = Board::standard(config.size)?;

    let [top, bottom] = Side::all().map(|side| {
        config
            .controller(side)
            .build::<Log>(config.seed_for(side), config.limits(), config.input_timeout())
    });

    let mut game = Game::<Log>::new(board, top?, bottom?).with_max_turns(config.max_turns);

    if Log::INFO {
        for side in Side::all() {
            let controller = game.controller(side);
            println!(
                "{}: [{}] {}",
                game.board().team(side),
                controller.difficulty(),
                controller.description()
            );
        }
        println!("{}", game.board());
    }

    let result = game.play()?;

    let board = game.board();
    println!("{board}");
    println!("{result} after {} turns", game.turns());

    let [top, bottom] = Side::all().map(|side| board.team(side));
    println!(
        "Material: {} {:.0}%, {} {:.0}%",
        top.name(),
        board.material_share(Side::Top) * 100.0,
        bottom.name(),
        board.material_share(Side::Bottom) * 100.0
    );

    Ok(())
}
