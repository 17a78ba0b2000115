//! Mongoid document-store configuration for dummy apps

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::Result;
use crate::generation::BackendStrategy;
use crate::infrastructure::output::GemfileEdit;
use crate::infrastructure::shell::{CommandExecutor, command_line};

pub const SQLITE_GEM: &str = "gem \"sqlite3\"";
pub const MONGOID_GEMS: &str = "gem \"mongoid\"\ngem \"bson_ext\"\n";

/// Swaps sqlite3 for mongoid in the Gemfile, installs and generates the config
pub struct MongoidStrategy {
    rails_program: String,
    executor: Arc<dyn CommandExecutor>,
}

impl MongoidStrategy {
    pub fn new(rails_program: impl Into<String>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            rails_program: rails_program.into(),
            executor,
        }
    }

    pub fn gemfile_edit() -> GemfileEdit {
        GemfileEdit::new()
            .insert_after(SQLITE_GEM, MONGOID_GEMS)
            .remove_lines_containing(SQLITE_GEM)
    }

    /// Exit status is reported, never fatal
    async fn run_unchecked(&self, program: &str, args: &[String], app_path: &Path) {
        let command = command_line(program, args);
        match self.executor.execute(program, args, app_path).await {
            Ok(result) if result.is_success() => {
                tracing::debug!(command = %command, "Command completed successfully");
            }
            Ok(result) => {
                tracing::warn!(
                    command = %command,
                    exit_code = result.exit_code,
                    stderr = %result.stderr.trim(),
                    "Command failed, continuing"
                );
            }
            Err(e) => {
                tracing::warn!(command = %command, error = %e, "Failed to execute command, continuing");
            }
        }
    }
}

#[async_trait]
impl BackendStrategy for MongoidStrategy {
    async fn configure(&self, app_path: &Path) -> Result<()> {
        Self::gemfile_edit().apply(&app_path.join("Gemfile")).await?;

        self.run_unchecked("bundle", &["install".to_string()], app_path)
            .await;
        self.run_unchecked(
            &self.rails_program,
            &["g".to_string(), "mongoid:config".to_string()],
            app_path,
        )
        .await;
        Ok(())
    }
}
