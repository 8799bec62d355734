//! dbsetup - Create PostgreSQL roles and databases from a Rails-style database.yml

mod cli;
mod command;
mod config;

use clap::Parser;
use cli::Cli;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    process::exit(run(&cli));
}

/// Run the pipeline: locate, read, parse, then create user and database.
///
/// A failure before the command stage always ends the run; commands are
/// never built from empty parameters. Lenient mode downgrades the exit code
/// to 0 and, within the command stage, continues to the next command after
/// a failure (a role that already exists should not block `createdb` in CI).
fn run(cli: &Cli) -> i32 {
    let path = match config::locate(&cli.path, default_config_dir) {
        Ok(path) => path,
        Err(e) => return fail(cli, &e.to_string()),
    };

    println!("Using configuration file: {}", path.display());

    let data = match config::read(&path) {
        Ok(data) => data,
        Err(e) => return fail(cli, &e.to_string()),
    };

    let db = match config::parse(&data, &cli.environment) {
        Ok(db) => db,
        Err(e) => return fail(cli, &e.to_string()),
    };

    let specs = [command::create_user(&db), command::create_database(&db)];

    if cli.dry_run {
        for spec in &specs {
            println!("Would run: {}", spec);
        }
    } else if !command::run_each(&specs, cli.lenient, |e| print_error(&e.to_string())) {
        print_error("Exiting...");
        return 1;
    }

    println!("Done");
    0
}

/// Report a fatal step failure and pick the exit code for it.
fn fail(cli: &Cli, message: &str) -> i32 {
    print_error(message);
    if cli.lenient {
        0
    } else {
        print_error("Exiting...");
        1
    }
}

/// Directory used when no path is given: next to the running executable.
fn default_config_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn red(text: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", text)
}

fn print_error(message: &str) {
    eprintln!("{}", red(&format!("\n\t{}", message)));
}
