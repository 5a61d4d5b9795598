use std::fmt;
use std::io;

use crate::parser::SyntaxError;

/// The single diagnostic line shown to the user for every failure.
pub const ERROR_MESSAGE: &str = "An error has occurred";

/// Internal classification of the ways processing a line can fail.
///
/// The user always sees [`ERROR_MESSAGE`]; the variants exist so tests and
/// the debug log can tell failures apart.
#[derive(Debug)]
pub enum ShellError {
    /// A malformed redirection segment.
    Syntax(SyntaxError),
    /// No built-in matched and the search path yielded no executable.
    UnknownCommand(String),
    /// The OS refused to create a process.
    Spawn(io::Error),
    /// A built-in was given the wrong number or shape of arguments.
    BuiltinUsage(String),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Syntax(e) => write!(f, "syntax error: {e}"),
            ShellError::UnknownCommand(name) => write!(f, "command not found: {name}"),
            ShellError::Spawn(e) => write!(f, "failed to spawn: {e}"),
            ShellError::BuiltinUsage(text) => {
                write!(f, "bad arguments: {}", text.lines().next().unwrap_or_default())
            }
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

/// Single reporting point for local failures: the rich error goes to the
/// debug log, the user sees the fixed line on stderr.
pub(crate) fn report(err: &anyhow::Error) {
    log::debug!("{err:#}");
    eprintln!("{ERROR_MESSAGE}");
}
