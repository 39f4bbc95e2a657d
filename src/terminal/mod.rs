mod display;
mod interactive;

pub use display::{DisplayError, TerminalRenderer, glyph, render_board};
pub use interactive::{Command, CommandError, run_interactive_terminal};
