use crate::command::{CommandFactory, ExecutableCommand, Execution, ExitCode, Output};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Built-ins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Executes the command against the provided output stream and
    /// environment.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn launch(self: Box<Self>, mut output: Output, env: &mut Environment) -> Result<Execution> {
        let mut stdout = output.writer();
        let code = T::execute(*self, &mut *stdout, env)?;
        Ok(Execution::Completed(code))
    }
}

/// Stand-in created when argument parsing fails; dispatching it surfaces
/// the usage problem without running anything.
struct BadUsage {
    usage: String,
}

impl ExecutableCommand for BadUsage {
    fn launch(self: Box<Self>, _output: Output, _env: &mut Environment) -> Result<Execution> {
        Err(ShellError::BuiltinUsage(self.usage).into())
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, .. }) => Box::new(BadUsage { usage: output }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Leave the shell. Takes no arguments.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the working directory for the shell and the programs it launches.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = PathBuf::from(&self.target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: can't canonicalize {}", new_dir.display()))?;

        std::env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Replace the search path used to resolve external programs.
/// With no arguments the path becomes empty and nothing external resolves.
pub struct Path {
    #[argh(positional, greedy)]
    /// directories to consult, in order.
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.search_path = self.dirs.iter().map(PathBuf::from).collect();
        log::debug!("search path replaced: {:?}", env.search_path);
        Ok(0)
    }
}
