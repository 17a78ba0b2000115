//! Port interfaces for the generation domain

use async_trait::async_trait;
use std::path::Path;

use crate::core::GenerationOptions;
use crate::core::error::Result;
use crate::generation::{StepAction, Variant};

/// Flags handed to the external project generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppFlags {
    pub skip_test_unit: bool,
    pub skip_javascript: bool,
    /// Set whenever the backend is not the canonical relational one
    pub skip_active_record: bool,
}

impl AppFlags {
    pub fn for_variant(options: &GenerationOptions, variant: &Variant) -> Self {
        Self {
            skip_test_unit: !options.generate_test_unit,
            skip_javascript: !options.generate_javascript,
            skip_active_record: !variant.is_active_record(),
        }
    }
}

/// Produces a conventional host-framework project skeleton at a path
#[async_trait]
pub trait ProjectGenerator: Send + Sync {
    async fn generate(&self, destination: &Path, flags: &AppFlags) -> Result<()>;
}

/// Backend-specific edits applied to a freshly generated dummy app
#[async_trait]
pub trait BackendStrategy: Send + Sync {
    async fn configure(&self, app_path: &Path) -> Result<()>;
}

/// Executes the action behind one declared step
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(&self, action: &StepAction) -> Result<()>;
}
