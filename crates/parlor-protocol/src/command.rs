//! The terminal command grammar.
//!
//! One line of input per turn: character 0 is the command code,
//! character 1 is a separator, characters 2+ are the free-text
//! argument. Rather than threading the raw code byte around, parsing
//! produces a closed [`Command`] enum so the dispatch site can match
//! exhaustively and unknown codes are an explicit variant instead of a
//! fall-through.

use crate::ParseError;

/// A parsed command, produced once per input line and consumed exactly
/// once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `e <topic>` — enter (join) a room.
    Enter(String),
    /// `l` — leave the current room.
    Leave,
    /// `s <text>` — publish a message to the current room.
    Say(String),
    /// `r <name>` — set the display name.
    Register(String),
    /// `q` — leave (if active) and terminate.
    Quit,
    /// `h` — print the command help.
    Help,
    /// Any unrecognized code. Carried so the dispatcher can name it in
    /// the "invalid option" notice.
    Unknown(char),
}

/// Parses one line of terminal input.
///
/// Returns `Ok(None)` for empty (or all-whitespace) lines, which are
/// silently ignored. Codes that require an argument (`e`, `s`, `r`)
/// fail with [`ParseError::MissingArgument`] when the trailing argument
/// is absent or empty — the check is on the argument itself, not on a
/// minimum line length, so short inputs like `e a` parse fine.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut chars = line.chars();
    let code = chars.next().unwrap_or_default();
    // Skip the conventional separator; everything after it is the argument.
    chars.next();
    let arg = chars.as_str().trim();

    let cmd = match code {
        'e' => Command::Enter(required(code, arg)?),
        'l' => Command::Leave,
        's' => Command::Say(required(code, arg)?),
        'r' => Command::Register(required(code, arg)?),
        'q' => Command::Quit,
        'h' => Command::Help,
        other => Command::Unknown(other),
    };
    Ok(Some(cmd))
}

fn required(code: char, arg: &str) -> Result<String, ParseError> {
    if arg.is_empty() {
        Err(ParseError::MissingArgument(code))
    } else {
        Ok(arg.to_string())
    }
}
