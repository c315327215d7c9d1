use crate::common::error::{Result, U8VectorToString};
use async_trait::async_trait;
use snafu::ResultExt;
use std::{io, process::Stdio, str};
use tokio::process::Command;
use tracing::{debug, warn};

/// The captured result of a command which ran to completion.
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    /// True if the command exited with a zero exit code.
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Standard output as UTF-8.
    pub fn stdout_str(&self) -> Result<&str> {
        str::from_utf8(self.stdout.as_slice()).context(U8VectorToString)
    }

    /// Standard error as UTF-8.
    pub fn stderr_str(&self) -> Result<&str> {
        str::from_utf8(self.stderr.as_slice()).context(U8VectorToString)
    }
}

/// How a command which is attached to the terminal came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attached {
    /// The command exited on its own.
    Exited { success: bool },
    /// The operator interrupted the command with Ctrl-C.
    Interrupted,
}

/// Runs external binaries. All calls to helm and kubectl go through this.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion and captures its output.
    async fn output(&self, command: &str, args: &[String]) -> io::Result<CommandOutput>;

    /// Runs the command with the terminal's stdio until it exits or the operator interrupts it.
    async fn attached(&self, command: &str, args: &[String]) -> io::Result<Attached>;
}

/// A CommandRunner which spawns real child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn output(&self, command: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn attached(&self, command: &str, args: &[String]) -> io::Result<Attached> {
        let mut child = Command::new(command).args(args).kill_on_drop(true).spawn()?;

        let exited = tokio::select! {
            status = child.wait() => Some(status?),
            signal = tokio::signal::ctrl_c() => {
                if let Err(error) = signal {
                    warn!(%error, "Failed to listen for Ctrl-C");
                }
                None
            }
        };

        match exited {
            Some(status) => Ok(Attached::Exited {
                success: status.success(),
            }),
            None => {
                // The child may already have exited on the same SIGINT.
                if let Err(error) = child.kill().await {
                    debug!(%error, %command, "Failed to kill interrupted command");
                }
                Ok(Attached::Interrupted)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{Attached, CommandRunner, SystemRunner};

    #[tokio::test]
    async fn test_system_runner_output() {
        let output = SystemRunner
            .output("sh", &["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()])
            .await
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.stdout_str().unwrap(), "out\n");
        assert_eq!(output.stderr_str().unwrap(), "err\n");
    }

    #[tokio::test]
    async fn test_system_runner_missing_binary() {
        let error = SystemRunner
            .output("definitely-not-a-real-binary-name", &[])
            .await
            .unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_system_runner_attached_exit() {
        let attached = SystemRunner
            .attached("sh", &["-c".to_string(), "exit 0".to_string()])
            .await
            .unwrap();
        assert_eq!(attached, Attached::Exited { success: true });
    }
}
