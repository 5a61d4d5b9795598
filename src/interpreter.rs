use crate::command::{CommandFactory, Execution, ExitCode, Output};
use crate::env::Environment;
use crate::error::{self, ShellError};
use crate::parser;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process::Child;

/// Prompt shown in interactive mode.
const PROMPT: &str = "lsh> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: the built-ins and
/// ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The shell's line-processing pipeline, plus its two input adapters.
///
/// The interpreter owns the [`Environment`] and a list of [`CommandFactory`]
/// objects that are queried in order to create commands by name. See
/// [`Default`] for the stock factories.
///
/// Example
/// ```
/// use lsh::Interpreter;
/// let mut shell = Interpreter::default();
/// shell.run_line("path /bin /usr/bin");
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// Run one raw input line through operator detection, splitting,
    /// tokenization and dispatch.
    ///
    /// `&` takes precedence over `>`; a `>` inside a parallel segment is
    /// honored for that segment alone. Failures are reported per segment and
    /// never stop the shell. Every child spawned while processing the line
    /// has been waited on by the time this returns.
    pub fn run_line(&mut self, line: &str) {
        if line.contains(parser::PARALLEL_OP) {
            self.run_parallel(line);
        } else {
            match self.run_segment(line) {
                Ok(Some(mut child)) => Self::await_child(&mut child),
                Ok(None) => {}
                Err(err) => error::report(&err),
            }
        }
    }

    /// `&`-separated commands: spawn every external segment first, then
    /// block on all of them as a barrier. One bad segment never stops the
    /// others; completion order is left to the OS.
    fn run_parallel(&mut self, line: &str) {
        let mut children = Vec::new();
        for segment in parser::split_parallel(line) {
            match self.run_segment(segment) {
                Ok(Some(child)) => children.push(child),
                Ok(None) => {}
                Err(err) => error::report(&err),
            }
        }
        for child in &mut children {
            Self::await_child(child);
        }
    }

    /// Process a single segment: redirection split, tokenization, dispatch.
    ///
    /// Built-ins complete before this returns; a spawned external child is
    /// handed back so the caller decides when to wait on it. `Ok(None)`
    /// means there was nothing to do (blank segment or completed built-in).
    fn run_segment(&mut self, segment: &str) -> Result<Option<Child>> {
        let Some(command) = parser::parse_segment(segment).map_err(ShellError::Syntax)? else {
            return Ok(None);
        };

        let output = match &command.redirect {
            Some(target) => Output::Redirect(
                File::create(target)
                    .with_context(|| format!("can't open redirect target {target}"))?,
            ),
            None => Output::Inherit,
        };

        match self.dispatch(&command.argv, output)? {
            Execution::Completed(code) => {
                log::trace!("{} finished with code {code}", command.argv[0]);
                Ok(None)
            }
            Execution::Spawned(child) => Ok(Some(child)),
        }
    }

    /// First factory that recognizes the name wins; the built-ins are
    /// consulted before the search path.
    fn dispatch(&mut self, argv: &[String], output: Output) -> Result<Execution> {
        let name = argv[0].as_str();
        let args: Vec<&str> = argv[1..].iter().map(String::as_str).collect();
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, &args) {
                return cmd.launch(output, &mut self.env);
            }
        }
        Err(ShellError::UnknownCommand(name.to_owned()).into())
    }

    fn await_child(child: &mut Child) {
        match child.wait() {
            Ok(status) => log::trace!("child exited: {status}"),
            Err(err) => error::report(&err.into()),
        }
    }

    /// Interactive mode: prompt, read, run, until end of input or `exit`.
    pub fn repl(&mut self) -> Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;
        while !self.env.should_exit {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.run_line(&line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(0)
    }

    /// Batch mode: run every line of the script in order, then finish.
    /// An `exit` line stops the script early.
    pub fn run_script(&mut self, script: &str) -> Result<ExitCode> {
        let file =
            File::open(script).with_context(|| format!("can't open script {script}"))?;
        for line in BufReader::new(file).lines() {
            self.run_line(&line?);
            if self.env.should_exit {
                break;
            }
        }
        Ok(0)
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the stock commands: the `exit`, `cd` and
    /// `path` built-ins, then the external program launcher.
    fn default() -> Self {
        use crate::builtin::{Cd, Exit, Path};
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Path>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SyntaxError;
    use std::fs;
    use std::io::Write as _;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("lsh_{}_{}_{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[cfg(unix)]
    fn install_program(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "#!/bin/sh\n{body}\n").unwrap();
        drop(file);
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    fn shell_error(err: &anyhow::Error) -> Option<&ShellError> {
        err.downcast_ref::<ShellError>()
    }

    #[test]
    fn blank_lines_are_noops() {
        let mut shell = Interpreter::default();
        assert!(shell.run_segment("").unwrap().is_none());
        assert!(shell.run_segment(" \t ").unwrap().is_none());
    }

    #[test]
    fn whitespace_command_with_redirect_creates_no_file() {
        let dir = make_unique_temp_dir("noop_redirect");
        let target = dir.join("never.txt");
        let line = format!("  > {}", target.display());

        let mut shell = Interpreter::default();
        assert!(shell.run_segment(&line).unwrap().is_none());
        assert!(!target.exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_redirects_launch_nothing() {
        let mut shell = Interpreter::default();
        for segment in ["ls > a > b", "ls >", "> file", "ls > a b"] {
            let err = shell.run_segment(segment).unwrap_err();
            assert!(
                matches!(shell_error(&err), Some(ShellError::Syntax(_))),
                "{segment} should be a syntax error"
            );
        }
    }

    #[test]
    fn syntax_kinds_are_distinguished() {
        let mut shell = Interpreter::default();
        let err = shell.run_segment("ls > a b").unwrap_err();
        assert!(matches!(
            shell_error(&err),
            Some(ShellError::Syntax(SyntaxError::MalformedTarget))
        ));
    }

    #[test]
    fn unresolved_commands_report_resolution_failure() {
        let mut shell = Interpreter::default();
        shell.env.search_path.clear();
        let err = shell.run_segment("ls").unwrap_err();
        assert!(matches!(
            shell_error(&err),
            Some(ShellError::UnknownCommand(name)) if name == "ls"
        ));
    }

    #[test]
    fn exit_sets_the_flag_only_when_bare() {
        let mut shell = Interpreter::default();
        shell.run_line("exit now");
        assert!(!shell.env.should_exit);
        shell.run_line("exit");
        assert!(shell.env.should_exit);
    }

    #[test]
    fn path_builtin_rewires_resolution() {
        let mut shell = Interpreter::default();
        shell.run_line("path");
        assert!(shell.env.search_path.is_empty());

        shell.run_line("path /dirA /dirB");
        assert_eq!(
            shell.env.search_path,
            vec![PathBuf::from("/dirA"), PathBuf::from("/dirB")]
        );
    }

    #[test]
    #[cfg(unix)]
    fn redirect_captures_program_output() {
        let dir = make_unique_temp_dir("redirect");
        install_program(&dir, "greet", "echo hello");
        let out = dir.join("out.txt");

        let mut shell = Interpreter::default();
        shell.run_line(&format!("path {}", dir.display()));
        shell.run_line(&format!("greet > {}", out.display()));

        assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn redirect_truncates_previous_contents() {
        let dir = make_unique_temp_dir("truncate");
        install_program(&dir, "greet", "echo hi");
        let out = dir.join("out.txt");
        fs::write(&out, "old contents that are longer\n").unwrap();

        let mut shell = Interpreter::default();
        shell.run_line(&format!("path {}", dir.display()));
        shell.run_line(&format!("greet > {}", out.display()));

        assert_eq!(fs::read_to_string(&out).unwrap(), "hi\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn parallel_segments_all_run_before_returning() {
        let dir = make_unique_temp_dir("parallel");
        install_program(&dir, "one", "echo first");
        install_program(&dir, "two", "echo second");
        let f1 = dir.join("f1.txt");
        let f2 = dir.join("f2.txt");

        let mut shell = Interpreter::default();
        shell.run_line(&format!("path {}", dir.display()));
        shell.run_line(&format!(
            "one > {} & two > {} &",
            f1.display(),
            f2.display()
        ));

        // run_line is the barrier: both children have been waited on.
        assert_eq!(fs::read_to_string(&f1).unwrap(), "first\n");
        assert_eq!(fs::read_to_string(&f2).unwrap(), "second\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn bad_parallel_segment_does_not_stop_the_others() {
        let dir = make_unique_temp_dir("parallel_err");
        install_program(&dir, "one", "echo still here");
        let f1 = dir.join("f1.txt");

        let mut shell = Interpreter::default();
        shell.run_line(&format!("path {}", dir.display()));
        shell.run_line(&format!("nosuchprog & one > {}", f1.display()));

        assert_eq!(fs::read_to_string(&f1).unwrap(), "still here\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn second_search_directory_is_found() {
        let a = make_unique_temp_dir("order_a");
        let b = make_unique_temp_dir("order_b");
        install_program(&b, "onlyb", "echo from b");
        let out = b.join("out.txt");

        let mut shell = Interpreter::default();
        shell.run_line(&format!("path {} {}", a.display(), b.display()));
        shell.run_line(&format!("onlyb > {}", out.display()));

        assert_eq!(fs::read_to_string(&out).unwrap(), "from b\n");

        let _ = fs::remove_dir_all(a);
        let _ = fs::remove_dir_all(b);
    }

    #[test]
    #[cfg(unix)]
    fn scripts_stop_at_exit() {
        let dir = make_unique_temp_dir("script");
        install_program(&dir, "greet", "echo hello");
        let before = dir.join("before.txt");
        let after = dir.join("after.txt");
        let script = dir.join("script.lsh");
        fs::write(
            &script,
            format!(
                "path {}\ngreet > {}\nexit\ngreet > {}\n",
                dir.display(),
                before.display(),
                after.display()
            ),
        )
        .unwrap();

        let mut shell = Interpreter::default();
        let code = shell.run_script(&script.to_string_lossy()).unwrap();

        assert_eq!(code, 0);
        assert!(before.exists());
        assert!(!after.exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_script_is_an_error() {
        let mut shell = Interpreter::default();
        assert!(shell.run_script("/no/such/script/anywhere").is_err());
    }
}
