use std::process;

use log::LevelFilter;
use lsh::{ERROR_MESSAGE, Interpreter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Route internal diagnostics to stderr when `LSH_LOG` asks for them
/// (e.g. `LSH_LOG=debug`); default output stays silent.
fn init_logging() {
    let level = std::env::var("LSH_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LevelFilter::Off);
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut shell = Interpreter::default();
    let outcome = match args.as_slice() {
        [] => shell.repl(),
        [script] => shell.run_script(script),
        _ => {
            eprintln!("{ERROR_MESSAGE}");
            process::exit(1);
        }
    };

    match outcome {
        Ok(code) => process::exit(code),
        Err(err) => {
            log::debug!("{err:#}");
            eprintln!("{ERROR_MESSAGE}");
            process::exit(1);
        }
    }
}
