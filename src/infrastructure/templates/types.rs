//! Core template types for the infrastructure layer
//!
//! These types are storage-agnostic and shared by the embedded and filesystem
//! template sources.

use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Suffix marking a template file that must be rendered
pub const TEMPLATE_SUFFIX: &str = ".tera";

/// Raw file loaded from a template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTemplateFile {
    /// Path relative to the requested template, `/`-separated
    pub relative_path: String,
    pub contents: Vec<u8>,
}

impl RawTemplateFile {
    pub fn is_rendered(&self) -> bool {
        self.relative_path.ends_with(TEMPLATE_SUFFIX)
    }

    /// Relative output path with the template suffix removed
    pub fn output_path(&self) -> &str {
        self.relative_path
            .strip_suffix(TEMPLATE_SUFFIX)
            .unwrap_or(&self.relative_path)
    }
}

/// What a template name resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEntry {
    File(RawTemplateFile),
    Directory(Vec<RawTemplateFile>),
}

/// Variables available to template expressions
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub variables: HashMap<String, JsonValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, key: impl Into<String>, value: JsonValue) {
        self.variables.insert(key.into(), value);
    }

    /// Builder-style variant of `add_variable`
    pub fn with(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.add_variable(key, value);
        self
    }

    pub fn to_tera_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.variables {
            context.insert(key.as_str(), value);
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_strips_suffix() {
        let rendered = RawTemplateFile {
            relative_path: "lib/{{ underscored }}.rb.tera".to_string(),
            contents: vec![],
        };
        assert!(rendered.is_rendered());
        assert_eq!(rendered.output_path(), "lib/{{ underscored }}.rb");

        let verbatim = RawTemplateFile {
            relative_path: "Gemfile".to_string(),
            contents: vec![],
        };
        assert!(!verbatim.is_rendered());
        assert_eq!(verbatim.output_path(), "Gemfile");
    }

    #[test]
    fn test_render_context_to_tera() {
        let context = RenderContext::new().with("name", serde_json::json!("blog"));
        let tera_context = context.to_tera_context();
        assert_eq!(tera_context.get("name"), Some(&serde_json::json!("blog")));
    }
}
