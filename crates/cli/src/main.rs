// ABOUTME: CLI entry point for haras: crawls a horse catalog and scrapes fact sheets.
// ABOUTME: Loads .env, parses arguments, runs one mode, and maps failures to exit codes.

use std::env;
use std::process::ExitCode;

use clap::Parser;
use haras_cli::{run, Cli};

/// Loads `.env` (or the file named by `HARAS_ENV_FILE`) so clap's env fallbacks see it.
fn load_env_file() {
    let loaded = match env::var_os("HARAS_ENV_FILE") {
        Some(path) => dotenvy::from_path(path).map(|_| ()),
        None => dotenvy::dotenv().map(|_| ()),
    };
    if let Err(err) = loaded {
        if !err.not_found() {
            eprintln!("warning: ignoring env file: {}", err);
        }
    }
}

fn main() -> ExitCode {
    load_env_file();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
