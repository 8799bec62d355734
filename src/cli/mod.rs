//! CLI module for dbsetup
//!
//! Defines command-line interface using clap.

use clap::Parser;

#[derive(Parser)]
#[command(name = "dbsetup")]
#[command(about = "Create PostgreSQL roles and databases from a Rails-style database.yml")]
pub struct Cli {
    /// Print the current version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Path to the yaml file, or to a directory containing config/database.yml
    #[arg(short = 'p', long = "path", default_value = "config/database.yml")]
    pub path: String,

    /// Environment block to create the role and database for
    #[arg(short = 'e', long = "environment", default_value = "test")]
    pub environment: String,

    /// Log errors but keep going, useful for CI
    #[arg(short = 'c', long = "lenient")]
    pub lenient: bool,

    /// Print the commands without executing them
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}
