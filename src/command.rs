use crate::env::Environment;
use anyhow::Result;
use std::fs::File;
use std::io::{self, Write};
use std::process::{Child, Stdio};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Where a command's standard output goes.
///
/// Redirection is scoped to a single dispatch: the shell's own output stream
/// is never rerouted, so dropping a [`Output::Redirect`] closes the file and
/// later lines and segments are unaffected.
pub enum Output {
    /// The shell's inherited standard output.
    Inherit,
    /// A file opened in truncate/create mode by a `>` redirect.
    Redirect(File),
}

impl Output {
    /// Writer handed to built-ins, which run in-process.
    pub fn writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Output::Inherit => Box::new(io::stdout()),
            Output::Redirect(file) => Box::new(file),
        }
    }

    /// Stdout handle handed to spawned external programs.
    pub fn stdio(self) -> Stdio {
        match self {
            Output::Inherit => Stdio::inherit(),
            Output::Redirect(file) => Stdio::from(file),
        }
    }
}

/// What dispatching a command produced.
#[derive(Debug)]
pub enum Execution {
    /// A built-in that ran to completion in-process.
    Completed(ExitCode),
    /// A spawned child; the caller owns the obligation to wait on it.
    Spawned(Child),
}

/// Object-safe trait for any command that can be dispatched by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external
/// commands.
pub trait ExecutableCommand {
    /// Start the command with its standard output routed to `output`.
    ///
    /// Built-ins complete before returning; external programs are spawned
    /// and handed back unwaited inside [`Execution::Spawned`].
    fn launch(self: Box<Self>, output: Output, env: &mut Environment) -> Result<Execution>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Implementations can use the environment to resolve executables against
/// the search path.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
