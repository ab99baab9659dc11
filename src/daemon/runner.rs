use std::{fmt::Display, path::PathBuf, process::ExitStatus};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// How a launched command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Exited(i32),
    Signaled(i32),
    Unknown,
}

impl CommandStatus {
    /// The value a shell would store in `$?`: the exit code, or `128 + signal`.
    pub fn shell_code(&self) -> i32 {
        match self {
            CommandStatus::Exited(code) => *code,
            CommandStatus::Signaled(signal) => signal + 128,
            CommandStatus::Unknown => -1,
        }
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return CommandStatus::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return CommandStatus::Signaled(signal);
            }
        }
        CommandStatus::Unknown
    }
}

impl Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$? = {}", self.shell_code())
    }
}

/// Runs a command line to completion. An error means the command could not be started at all;
/// a command that ran and failed is reported through [CommandStatus].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send {
    async fn run(&mut self, command: &str) -> Result<CommandStatus>;
}

/// Hands the command line to a shell and blocks until it finishes. Standard streams are inherited.
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: Option<PathBuf>) -> Self {
        Self {
            shell: shell.unwrap_or_else(default_shell),
        }
    }
}

fn default_shell() -> PathBuf {
    if cfg!(windows) {
        "cmd".into()
    } else {
        "/bin/sh".into()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&mut self, command: &str) -> Result<CommandStatus> {
        let status = Command::new(&self.shell)
            .arg(if cfg!(windows) { "/C" } else { "-c" })
            .arg(command)
            .status()
            .await
            .with_context(|| format!("cannot run: {command}"))?;
        Ok(status.into())
    }
}
