// SPDX-FileCopyrightText: Copyright © 2025 AerynOS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! External command execution.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// A command line to run, with the directory to run it in
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Runs the command inside `dir`
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Errors that prevent a command from producing any output
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Capability to run external commands
///
/// Implementations report the exit status instead of failing on it, callers
/// decide which failures are fatal.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as child processes of this one
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(std::process::Stdio::null());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| CommandError::Spawn {
            command: spec.to_string(),
            source,
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let spec = CommandSpec::new("/usr/bin/git", ["import-orig", "--uscan"]);
        assert_eq!(spec.to_string(), "/usr/bin/git import-orig --uscan");
    }

    #[tokio::test]
    async fn test_system_runner_status() {
        let ok = SystemRunner
            .run(&CommandSpec::new("sh", ["-c", "echo hello"]))
            .await
            .unwrap();
        assert!(ok.success());
        assert_eq!(ok.stdout, "hello\n");

        let failed = SystemRunner
            .run(&CommandSpec::new("sh", ["-c", "echo oops >&2; exit 3"]))
            .await
            .unwrap();
        assert_eq!(failed.code, Some(3));
        assert_eq!(failed.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_system_runner_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let out = SystemRunner
            .run(&CommandSpec::new("pwd", Vec::<String>::new()).current_dir(dir.path()))
            .await
            .unwrap();
        let reported = std::path::PathBuf::from(out.stdout.trim_end());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_system_runner_spawn_error() {
        let err = SystemRunner
            .run(&CommandSpec::new("/nonexistent/debpin-tool", ["-v"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/debpin-tool -v"));
    }
}
