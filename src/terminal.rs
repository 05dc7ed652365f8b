//! Terminal interface for the deepmate chess engine.
//!
//! A thin front-end over the core API: a colored board printer that scales
//! with the board dimensions, an interactive human-vs-engine loop, and an
//! engine-vs-engine driver. No chess rules live here — every decision flows
//! through [`Game`] and [`Searcher`].

use colored::Colorize;
use std::io::{self, Write};

use crate::game::Game;
use crate::search::{Searcher, Strategy};
use crate::types::{Piece, Player, Position};

/// Renders the board with row/column indices, bottom row last.
///
/// Bottom's pieces are shown white and bold, Top's blue and bold, matching
/// the uppercase/lowercase letter convention.
pub fn print_board(game: &Game) {
    let (height, width) = game.dimensions();
    let rule = format!("   +{}", "---+".repeat(width));

    println!();
    println!("{rule}");
    for row in (0..height).rev() {
        print!("{row:>2} ");
        for col in 0..width {
            let cell = match game.board().get(row, col).expect("in-bounds square") {
                Some(piece) => colored_letter(piece),
                None => {
                    if (row + col) % 2 == 0 {
                        "·".dimmed().to_string()
                    } else {
                        " ".to_string()
                    }
                }
            };
            print!("| {cell} ");
        }
        println!("|");
        println!("{rule}");
    }

    print!("   ");
    for col in 0..width {
        print!("  {col} ");
    }
    println!();
    println!();
}

fn colored_letter(piece: Piece) -> String {
    let letter = piece.letter().to_string();
    match piece.owner {
        Player::Bottom => letter.white().bold().to_string(),
        Player::Top => letter.blue().bold().to_string(),
    }
}

/// Prints the turn/check/move-count status line.
pub fn print_status(game: &Game) {
    let turn = match game.current_player() {
        Player::Bottom => "bottom".white().bold(),
        Player::Top => "top".blue().bold(),
    };
    print!("move {} — {} to play", game.history().len() + 1, turn);
    if game.is_in_check() {
        print!("  {}", "CHECK".red().bold());
    }
    println!("  ({} legal moves)", game.legal_moves().len());
}

/// Announces the result of a finished game: the side to move has no legal
/// move and has lost.
fn announce_result(game: &Game) {
    let loser = game.current_player();
    println!(
        "{} has no legal moves — {} wins!",
        loser,
        loser.opponent().to_string().bold()
    );
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}

/// Parses "sr sc dr dc" into two positions.
fn parse_move(input: &str) -> Option<(Position, Position)> {
    let mut numbers = input.split_whitespace().map(str::parse::<usize>);
    let sr = numbers.next()?.ok()?;
    let sc = numbers.next()?.ok()?;
    let dr = numbers.next()?.ok()?;
    let dc = numbers.next()?.ok()?;
    if numbers.next().is_some() {
        return None;
    }
    Some((Position::new(sr, sc), Position::new(dr, dc)))
}

/// Interactive loop: the human plays one side, the engine the other.
///
/// Input is `sr sc dr dc` (row and column of the source, then of the
/// target), `undo` to take back the last full move, or `quit`.
pub fn play(mut game: Game, human: Player, strategy: Strategy, depth: u32) {
    let mut engine = Searcher::new(strategy, depth, human.opponent());
    println!(
        "You play {human}; the engine answers with {strategy} at depth {depth}."
    );

    loop {
        print_board(&game);

        if game.is_game_over() {
            announce_result(&game);
            match read_line("play again? [y/N] ").as_deref() {
                Some("y") | Some("Y") => {
                    game.restart();
                    engine = Searcher::new(strategy, depth, human.opponent());
                    continue;
                }
                _ => return,
            }
        }

        print_status(&game);

        if game.current_player() == human {
            let Some(input) = read_line("> ") else { return };
            match input.as_str() {
                "quit" | "q" => return,
                "undo" => {
                    // Take back the engine's reply and the human's move.
                    for _ in 0..2 {
                        if let Err(err) = game.undo_last_move() {
                            println!("{err}");
                            break;
                        }
                    }
                }
                _ => match parse_move(&input) {
                    Some((src, dst)) => {
                        if let Err(err) = game.make_move(src.row, src.col, dst.row, dst.col) {
                            println!("{err}");
                        }
                    }
                    None => println!("enter a move as 'sr sc dr dc', or 'undo' / 'quit'"),
                },
            }
        } else {
            let mv = engine.best_move(&game);
            println!("engine plays {mv}");
            game.make_move(mv.src().row, mv.src().col, mv.dst().row, mv.dst().col)
                .expect("the engine picked a legal move");
        }
    }
}

/// Engine-vs-engine driver: plays until game over or `max_moves` half-moves.
pub fn selfplay(
    mut game: Game,
    bottom: Strategy,
    top: Strategy,
    depth: u32,
    max_moves: usize,
) {
    let mut bottom_engine = Searcher::new(bottom, depth, Player::Bottom);
    let mut top_engine = Searcher::new(top, depth, Player::Top);
    println!("bottom ({bottom}) vs top ({top}), depth {depth}");

    while !game.is_game_over() && game.history().len() < max_moves {
        let side = game.current_player();
        let engine = match side {
            Player::Bottom => &mut bottom_engine,
            Player::Top => &mut top_engine,
        };
        let mv = engine.best_move(&game);
        println!("{:>3}. {side} plays {mv}", game.history().len() + 1);
        game.make_move(mv.src().row, mv.src().col, mv.dst().row, mv.dst().col)
            .expect("the engine picked a legal move");
        print_board(&game);
    }

    if game.is_game_over() {
        announce_result(&game);
    } else {
        println!("stopped after {max_moves} half-moves");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_input_parses_four_numbers() {
        assert_eq!(
            parse_move("1 4 3 4"),
            Some((Position::new(1, 4), Position::new(3, 4)))
        );
        assert_eq!(parse_move("  0 0   7 7 "), Some((Position::new(0, 0), Position::new(7, 7))));
        assert_eq!(parse_move("1 4 3"), None);
        assert_eq!(parse_move("1 4 3 4 5"), None);
        assert_eq!(parse_move("a b c d"), None);
        assert_eq!(parse_move(""), None);
    }
}
