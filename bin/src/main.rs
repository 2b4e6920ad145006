use std::{
    io::{stdin, stdout, Stderr, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

use lox::Lox;

/// Exit code for malformed command lines (`EX_USAGE`).
const USAGE_ERROR: u8 = 64;
/// Exit code when the input had syntax errors (`EX_DATAERR`).
const DATA_ERROR: u8 = 65;

/// Parses Lox expressions and prints their syntax tree.
#[derive(clap::Parser)]
struct Args {
    /// Script to parse. Starts an interactive prompt if omitted.
    #[arg(value_name = "script")]
    scripts: Vec<PathBuf>,
}

fn run_file(path: &Path, lox: &mut Lox<Stderr>) -> anyhow::Result<ExitCode> {
    log::debug!("Running {}", path.display());
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    lox.run_source(&source, &mut stdout())?;

    Ok(if lox.had_error() { ExitCode::from(DATA_ERROR) } else { ExitCode::SUCCESS })
}

fn run_prompt(lox: &mut Lox<Stderr>) -> anyhow::Result<ExitCode> {
    let mut line = String::new();
    loop {
        print!("> ");
        stdout().flush()?;

        line.clear();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(ExitCode::SUCCESS);
        }

        lox.run_line(&line, &mut stdout())?;
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let mut lox = Lox::new();

    match args.scripts.as_slice() {
        [] => run_prompt(&mut lox),
        [script] => run_file(script, &mut lox),
        _ => {
            println!("Usage: rlox-parse [script]");
            Ok(ExitCode::from(USAGE_ERROR))
        }
    }
}
