use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, shell-wide state shared by the built-ins and the program
/// launcher.
///
/// The environment contains:
/// - `search_path`: the ordered directories consulted to resolve external
///   program names; wholly replaced by the `path` built-in.
/// - `current_dir`: the working directory inherited by launched programs.
/// - `should_exit`: a flag the read loops check to know when to terminate.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Ordered list of directories searched for external programs.
    pub search_path: Vec<PathBuf>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that an input loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// A fresh environment: a search path of just `/bin`, the process's
    /// working directory, and the exit flag cleared.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            search_path: vec![PathBuf::from("/bin")],
            current_dir,
            should_exit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_bin_only() {
        let env = Environment::new();
        assert_eq!(env.search_path, vec![PathBuf::from("/bin")]);
        assert!(!env.should_exit);
    }
}
