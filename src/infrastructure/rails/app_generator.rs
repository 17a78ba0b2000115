//! `rails new` adapter for the project generator port

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use crate::core::error::{Error, Result};
use crate::generation::{AppFlags, ProjectGenerator};
use crate::infrastructure::shell::{CommandExecutor, command_line};

/// Program used when no override is configured
pub const DEFAULT_RAILS_COMMAND: &str = "rails";

/// Runs `rails new <path>` with the skip flags of a variant
pub struct RailsAppGenerator {
    program: String,
    executor: Arc<dyn CommandExecutor>,
}

impl RailsAppGenerator {
    pub fn new(program: impl Into<String>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            program: program.into(),
            executor,
        }
    }

    /// Arguments after the program name
    pub fn args(destination: &Path, flags: &AppFlags) -> Vec<String> {
        let mut args = vec!["new".to_string(), destination.display().to_string()];
        if flags.skip_test_unit {
            args.push("-T".to_string());
        }
        if flags.skip_javascript {
            args.push("-J".to_string());
        }
        if flags.skip_active_record {
            args.push("-O".to_string());
        }
        args
    }
}

#[async_trait]
impl ProjectGenerator for RailsAppGenerator {
    async fn generate(&self, destination: &Path, flags: &AppFlags) -> Result<()> {
        let working_dir = destination.parent().unwrap_or(destination);
        fs::create_dir_all(working_dir)
            .await
            .map_err(|e| Error::write(working_dir, e))?;

        let args = Self::args(destination, flags);
        let command = command_line(&self.program, &args);
        tracing::info!(command = %command, "Generating dummy app");

        let result = self
            .executor
            .execute(&self.program, &args, working_dir)
            .await?;

        if !result.is_success() {
            return Err(Error::ExternalGenerator {
                command,
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        if !result.stdout.trim().is_empty() {
            tracing::debug!(command = %command, output = %result.stdout.trim(), "Generator output");
        }
        Ok(())
    }
}
