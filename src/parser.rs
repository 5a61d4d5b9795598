use std::fmt;

use crate::lexer;

/// Separator for commands that run concurrently on one line.
pub const PARALLEL_OP: char = '&';
/// Operator that reroutes a command's standard output into a file.
pub const REDIRECT_OP: char = '>';

/// A tokenized command ready for dispatch.
///
/// The first `argv` entry is the command name; `argv` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    /// Target filename when the segment carried a `>` redirect.
    pub redirect: Option<String>,
}

/// Ways a segment can be syntactically malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// `>` did not split the segment into exactly a command half and a
    /// target half (covers `cmd >`, `> file`, `cmd > a > b`, `cmd >> f`).
    MalformedRedirect,
    /// The target half of a redirect was not exactly one word.
    MalformedTarget,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::MalformedRedirect => {
                write!(f, "redirection needs one command and one target")
            }
            SyntaxError::MalformedTarget => {
                write!(f, "redirection target must be a single name")
            }
        }
    }
}

/// Split a line on `&`, dropping empty segments (a trailing `&` is fine).
pub fn split_parallel(line: &str) -> Vec<&str> {
    line.split(PARALLEL_OP).filter(|s| !s.is_empty()).collect()
}

/// Parse one segment into a dispatchable [`Command`].
///
/// Returns `Ok(None)` when the segment tokenizes to nothing; such segments
/// are no-ops, and no redirect target is opened for them. The empty-command
/// check deliberately precedes any use of the target, so `"  > file"` stays
/// a silent no-op while `"> file"` is a syntax error.
pub fn parse_segment(segment: &str) -> Result<Option<Command>, SyntaxError> {
    if !segment.contains(REDIRECT_OP) {
        let argv = lexer::split_into_tokens(segment);
        return Ok((!argv.is_empty()).then_some(Command { argv, redirect: None }));
    }

    let halves: Vec<&str> = segment.split(REDIRECT_OP).collect();
    if halves.len() != 2 || halves.iter().any(|half| half.is_empty()) {
        return Err(SyntaxError::MalformedRedirect);
    }

    let mut target = lexer::split_into_tokens(halves[1]);
    if target.len() != 1 {
        return Err(SyntaxError::MalformedTarget);
    }

    let argv = lexer::split_into_tokens(halves[0]);
    Ok((!argv.is_empty()).then(|| Command {
        argv,
        redirect: Some(target.remove(0)),
    }))
}
