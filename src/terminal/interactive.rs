use std::io::{self, Write};
use std::str::FromStr;

use log::error;

use crate::board::Coordinate;
use crate::input::ClickOutcome;
use crate::session::{GameSession, SessionError, TurnOutcome};
use crate::{BoardRenderer, EngineTransport};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Two-click input on one square
    Click(Coordinate),
    /// Drag a piece from one square to another
    Drag(Coordinate, Coordinate),
    /// Typed UCI move
    Move(String),
    Fen,
    Reset,
    Refresh,
    Quit,
}

/// Why a line of input was not understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid square: {0}")]
    Square(#[from] crate::board::ParseSquareError),
    #[error("Unknown command")]
    Unknown,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["c" | "click", square] => Ok(Command::Click(square.parse()?)),
            ["c" | "click", ..] => Err(CommandError::Usage("click <square>")),
            ["d" | "drag", from, to] => Ok(Command::Drag(from.parse()?, to.parse()?)),
            ["d" | "drag", ..] => Err(CommandError::Usage("drag <from> <to>")),
            ["m" | "move", uci] => Ok(Command::Move(uci.to_string())),
            ["m" | "move", ..] => Err(CommandError::Usage("move <uci>")),
            ["fen"] => Ok(Command::Fen),
            ["r" | "reset"] => Ok(Command::Reset),
            ["p"] => Ok(Command::Refresh),
            ["q" | "quit"] => Ok(Command::Quit),
            _ => Err(CommandError::Unknown),
        }
    }
}

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs an interactive terminal game against the backend engine.
///
/// Every accepted player move is sent to the engine straight away; the board
/// is redrawn with the thinking indicator before the request goes out.
pub fn run_interactive_terminal<T, R>(mut session: GameSession<T>, mut renderer: R)
where
    T: EngineTransport,
    R: BoardRenderer,
{
    redraw(&session, &mut renderer);

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            error!("Failed to flush stdout: {e}");
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read input: {e}");
                break;
            }
        }
        if input.trim().is_empty() {
            continue;
        }

        let command = match input.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let submitted = match command {
            Command::Click(coord) => match session.click(coord) {
                Ok(ClickOutcome::Submitted(_)) => Ok(true),
                Ok(ClickOutcome::Selected(_)) => {
                    redraw(&session, &mut renderer);
                    Ok(false)
                }
                Ok(ClickOutcome::Ignored) => Ok(false),
                Err(e) => {
                    redraw(&session, &mut renderer);
                    Err(e)
                }
            },
            Command::Drag(from, to) => session.drop_piece(from, to).map(|_| true),
            Command::Move(uci) => session.submit_uci(&uci).map(|_| true),
            Command::Fen => {
                println!("{}", session.state().to_fen());
                Ok(false)
            }
            Command::Reset => {
                session.reset();
                redraw(&session, &mut renderer);
                println!("\n🔄 Reset to initial position (game {})", session.game_id());
                Ok(false)
            }
            Command::Refresh => {
                redraw(&session, &mut renderer);
                Ok(false)
            }
            Command::Quit => break,
        };

        match submitted {
            Ok(true) => {
                redraw(&session, &mut renderer);
                let result = session.finish_turn();
                redraw(&session, &mut renderer);
                report_turn(&session, result);
            }
            Ok(false) => {}
            Err(e) => println!("❌ Invalid move: {e}"),
        }

        if session.is_game_over() {
            println!("Game over!");
            break;
        }
    }
}

fn report_turn<T>(session: &GameSession<T>, result: Result<TurnOutcome, SessionError>)
where
    T: EngineTransport,
{
    match result {
        Ok(turn) => {
            println!("You played: {}", turn.player_move);
            println!("Engine plays: {}", turn.engine_move);
        }
        Err(e @ SessionError::NetworkFailure(_)) => {
            println!("❌ {e}");
            println!("Use 'reset' to start over in game {}", session.game_id());
        }
        Err(e) => println!("❌ {e}"),
    }
}

/// Draws the help text and the board.
fn redraw<T, R>(session: &GameSession<T>, renderer: &mut R)
where
    T: EngineTransport,
    R: BoardRenderer,
{
    clear_screen();
    println!("♟️  Chess vs Engine");
    println!();
    println!("Commands: click <sq> | drag <from> <to> | move <uci> | fen | reset | p | q");
    println!();
    if let Err(e) = renderer.show(&session.view()) {
        error!("Failed to render board: {e}");
    }
}
