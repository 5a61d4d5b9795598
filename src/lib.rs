//! A tiny POSIX-style command shell.
//!
//! This crate implements the full line-processing pipeline of a minimal
//! shell: operator detection (`&` for same-line parallel commands, `>` for
//! output redirection), whitespace tokenization, built-in dispatch (`exit`,
//! `cd`, `path`), search-path resolution of external programs, and child
//! process lifecycle management. The interactive prompt and the batch-file
//! reader are thin adapters on top of [`Interpreter::run_line`].
//!
//! The main entry point is [`Interpreter`], which processes raw input lines
//! using a set of pluggable factories. The public modules [`command`] and
//! [`env`] expose the traits and state types the pipeline is built on.

mod builtin;
pub mod command;
pub mod env;
mod error;
mod external;
mod interpreter;
mod lexer;
mod parser;

pub use error::{ERROR_MESSAGE, ShellError};
pub use interpreter::Interpreter;
pub use parser::SyntaxError;
