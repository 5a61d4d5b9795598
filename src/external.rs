use crate::command::{CommandFactory, ExecutableCommand, Execution, Output};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A program resolved against the search path, ready to spawn.
pub struct ExternalCommand {
    executable: PathBuf,
    args: Vec<String>,
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let executable = resolve_program(&env.search_path, name)?;
        Some(Box::new(ExternalCommand {
            executable,
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn launch(self: Box<Self>, output: Output, env: &mut Environment) -> Result<Execution> {
        log::debug!("spawning {}", self.executable.display());
        let child = std::process::Command::new(&self.executable)
            .args(&self.args)
            .stdout(output.stdio())
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(ShellError::Spawn)?;
        Ok(Execution::Spawned(child))
    }
}

/// Walk the search path in order and return the first entry that joins with
/// `name` into an executable candidate.
///
/// Ordering is significant: a same-named executable in a later directory is
/// never considered once an earlier one matches.
pub fn resolve_program(search_path: &[PathBuf], name: &str) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
