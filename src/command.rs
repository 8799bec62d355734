//! Building and running the PostgreSQL administration commands
//!
//! Command lines are built as inspectable [`CommandSpec`] values so dry-run
//! mode and tests can look at the argv without spawning anything.

use crate::config::DbConfig;
use std::fmt;
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: &'static str,
        status: ExitStatus,
        stderr: String,
    },
}

/// A fully built external command: program name plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl CommandSpec {
    fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// `createuser` invocation: a role that may create databases but is neither
/// superuser nor allowed to create roles, with no password prompt.
pub fn create_user(config: &DbConfig) -> CommandSpec {
    CommandSpec {
        program: "createuser",
        args: vec![
            "-h".to_string(),
            config.host.clone(),
            "-S".to_string(),
            "-d".to_string(),
            "-R".to_string(),
            "-e".to_string(),
            "-w".to_string(),
            config.username.clone(),
        ],
    }
}

/// `createdb` invocation: database owned by the configured user, connecting
/// as that user, with no password prompt.
pub fn create_database(config: &DbConfig) -> CommandSpec {
    CommandSpec {
        program: "createdb",
        args: vec![
            "-h".to_string(),
            config.host.clone(),
            "-O".to_string(),
            config.username.clone(),
            "-U".to_string(),
            config.username.clone(),
            "-d".to_string(),
            "-w".to_string(),
            "-e".to_string(),
            config.database.clone(),
        ],
    }
}

/// Run a built command, printing captured stdout before reporting failure.
pub fn run(spec: &CommandSpec) -> Result<String, ExecError> {
    println!("Running: {}", spec);

    let output = spec.to_command().output().map_err(|source| ExecError::Spawn {
        program: spec.program,
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !stdout.is_empty() {
        println!("{}", stdout);
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ExecError::Failed {
            program: spec.program,
            status: output.status,
            stderr,
        });
    }

    Ok(stdout)
}

/// Run commands in order, reporting each failure through `report`.
///
/// Strict mode stops at the first failure and returns false. Lenient mode
/// keeps going through the remaining commands and returns true, leaving the
/// failures to whatever `report` did with them.
pub fn run_each(
    specs: &[CommandSpec],
    lenient: bool,
    mut report: impl FnMut(&ExecError),
) -> bool {
    for spec in specs {
        if let Err(e) = run(spec) {
            report(&e);
            if !lenient {
                return false;
            }
        }
    }
    true
}
