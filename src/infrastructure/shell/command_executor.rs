//! Command executor for running external programs
//!
//! The project generator, the dependency installer and backend config
//! generators all run through this seam so tests can stub them out.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::error::{Error, Result};

/// Trait for executing external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `program` with `args` in the given working directory
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult>;
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Program and arguments joined for logs and error messages
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default command executor using tokio::process
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult> {
        tracing::debug!(
            command = %command_line(program, args),
            working_dir = %working_dir.display(),
            "Executing command"
        );

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Command {
                command: command_line(program, args),
                source: e,
            })?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Mock command executor for testing, keyed by the joined command line
#[cfg(test)]
pub struct MockCommandExecutor {
    pub results: std::collections::HashMap<String, CommandResult>,
    pub calls: std::sync::Mutex<Vec<(String, std::path::PathBuf)>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            results: std::collections::HashMap::new(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(
        mut self,
        command: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.results.insert(
            command.to_string(),
            CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<(String, std::path::PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult> {
        let command = command_line(program, args);
        self.calls
            .lock()
            .unwrap()
            .push((command.clone(), working_dir.to_path_buf()));
        self.results.get(&command).cloned().ok_or_else(|| Error::Command {
            command: command.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Mock executor has no result for command: {command}"),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_command_executor_success() {
        let executor = ShellCommandExecutor::new();
        let dir = tempdir().unwrap();

        let result = executor
            .execute("echo", &["hello".to_string()], dir.path())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_command_executor_failure() {
        let executor = ShellCommandExecutor::new();
        let dir = tempdir().unwrap();

        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let result = executor.execute("sh", &args, dir.path()).await.unwrap();

        assert!(!result.is_success());
        assert_eq!(result.exit_code, 3);
    }

    #[tokio::test]
    async fn test_missing_program_is_a_command_error() {
        let executor = ShellCommandExecutor::new();
        let dir = tempdir().unwrap();

        let err = executor
            .execute("enginex-definitely-not-installed", &[], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Command { .. }));
    }

    #[tokio::test]
    async fn test_mock_command_executor() {
        let executor = MockCommandExecutor::new()
            .with_result("bundle install", 0, "Bundle complete!", "")
            .with_result("rails g mongoid:config", 1, "", "error");

        let dir = tempdir().unwrap();

        let result1 = executor
            .execute("bundle", &["install".to_string()], dir.path())
            .await
            .unwrap();
        assert!(result1.is_success());
        assert_eq!(result1.stdout, "Bundle complete!");

        let args = vec!["g".to_string(), "mongoid:config".to_string()];
        let result2 = executor.execute("rails", &args, dir.path()).await.unwrap();
        assert!(!result2.is_success());
        assert_eq!(result2.stderr, "error");

        assert_eq!(executor.calls().len(), 2);
    }
}
