//! Generation options captured once at the start of a run

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::Error;

/// Identifier of the canonical relational backend
pub const DEFAULT_BACKEND: &str = "active_record";

/// Test framework used for the engine and its dummy apps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestFramework {
    #[default]
    TestUnit,
    Rspec,
}

impl TestFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestFramework::TestUnit => "test_unit",
            TestFramework::Rspec => "rspec",
        }
    }

    /// Directory holding the engine tests and dummy apps
    pub fn test_path(&self) -> &'static str {
        match self {
            TestFramework::TestUnit => "test",
            TestFramework::Rspec => "spec",
        }
    }

    pub fn is_rspec(&self) -> bool {
        matches!(self, TestFramework::Rspec)
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestFramework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test_unit" | "testunit" => Ok(TestFramework::TestUnit),
            "rspec" => Ok(TestFramework::Rspec),
            _ => Err(Error::config(format!(
                "Unknown test framework '{s}', expected test_unit or rspec"
            ))),
        }
    }
}

/// Returns true for the canonical relational backend and its short alias
pub fn is_active_record(backend: &str) -> bool {
    matches!(backend, "active_record" | "ar")
}

/// Backends and postfixes name directories, so each must stay a single plain segment
fn is_path_segment(name: &str) -> bool {
    !name.contains(['/', '\\']) && !name.contains("..")
}

/// Immutable configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub test_framework: TestFramework,
    pub backends: Vec<String>,
    /// Generate test-unit files in the dummy apps
    pub generate_test_unit: bool,
    /// Generate JavaScript files in the dummy apps
    pub generate_javascript: bool,
    /// Additional configuration variants, empty for a single unqualified variant
    pub postfixes: Vec<String>,
    /// Custom template directory replacing the embedded templates
    pub template_dir: Option<PathBuf>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            test_framework: TestFramework::default(),
            backends: vec![DEFAULT_BACKEND.to_string()],
            generate_test_unit: true,
            generate_javascript: true,
            postfixes: Vec::new(),
            template_dir: None,
        }
    }
}

impl GenerationOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.backends.is_empty() {
            return Err(Error::config("At least one backend is required"));
        }
        for backend in &self.backends {
            if backend.trim().is_empty() || !is_path_segment(backend) {
                return Err(Error::config(format!("Invalid backend name '{backend}'")));
            }
        }
        for postfix in self.postfixes.iter().filter(|p| !p.is_empty()) {
            if !is_path_segment(postfix) {
                return Err(Error::config(format!("Invalid postfix '{postfix}'")));
            }
        }
        Ok(())
    }

    pub fn test_path(&self) -> &'static str {
        self.test_framework.test_path()
    }
}

/// Trait for reading template configuration, allowing dependency injection for testing
pub trait TemplateConfigReader {
    fn get_template_dir(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvTemplateConfigReader;

impl TemplateConfigReader for EnvTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        std::env::var("ENGINEX_TEMPLATE_DIR").ok()
    }
}

/// Resolve the template directory: an explicit value wins over the reader
pub fn resolve_template_dir(
    explicit: Option<PathBuf>,
    reader: &dyn TemplateConfigReader,
) -> Option<PathBuf> {
    explicit.or_else(|| {
        reader
            .get_template_dir()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
    })
}
