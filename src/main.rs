//! interpolate CLI entry point.
//!
//! Usage:
//!   interpolate < input          # Expand each line against the process environment
//!   interpolate --help
//!   interpolate --version

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use interpolate::{interpolate, SliceEnv};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries expanded lines. Respects RUST_LOG.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => expand_stdin(),

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("interpolate {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some(arg) => {
            eprintln!("Unknown argument: {arg}");
            print_help();
            Ok(ExitCode::from(2))
        }
    }
}

fn expand_stdin() -> Result<ExitCode> {
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    for (n, line) in stdin.lines().enumerate() {
        let line = line.context("Failed to read from stdin")?;
        // The environment is captured per line, as a NAME=VALUE block.
        let env = SliceEnv::new(process_environ());
        match interpolate(&env, &line) {
            Ok(expanded) => {
                tracing::debug!(line = n + 1, input = %line, output = %expanded, "expanded");
                writeln!(stdout, "{expanded}").context("Failed to write to stdout")?;
                stdout.flush().context("Failed to write to stdout")?;
            }
            Err(e) => {
                tracing::debug!(line = n + 1, input = %line, error = ?e, "expansion failed");
                eprintln!("Error while interpolating: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn process_environ() -> impl Iterator<Item = String> {
    env::vars_os().map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
}

fn print_help() {
    println!(
        r#"interpolate - expand shell-style variables in text

USAGE:
    interpolate < input

Each line read from stdin is expanded against the process environment
and written to stdout. The first failing line stops processing.

SUPPORTED FORMS:
    $NAME ${{NAME}}         Value, empty when unset
    ${{NAME-default}}        Default when unset
    ${{NAME:-default}}       Default when unset or empty
    ${{NAME?message}}        Fail when unset
    ${{NAME:offset:length}}  Substring
    ${{NAME#pat}} ${{NAME##pat}}   Remove shortest/longest matching prefix
    ${{NAME%pat}} ${{NAME%%pat}}   Remove shortest/longest matching suffix
    $$ \$                 Literal dollar

OPTIONS:
    -h, --help      Show this help
    -V, --version   Show version

ENVIRONMENT:
    RUST_LOG        Log filter for diagnostics written to stderr"#
    );
}
