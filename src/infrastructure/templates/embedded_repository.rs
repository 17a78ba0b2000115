//! Embedded template repository implementation

use async_trait::async_trait;
use rust_embed::RustEmbed;
use tracing::debug;

use super::traits::{TemplateRepository, base_name, normalize_name};
use super::types::{RawTemplateFile, TEMPLATE_SUFFIX, TemplateEntry};
use crate::core::error::{Error, Result};

/// Container for all templates embedded at compile time
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Template repository backed by embedded templates
pub struct EmbeddedTemplateRepository;

impl EmbeddedTemplateRepository {
    pub fn new() -> Self {
        Self
    }

    /// Every embedded template path, sorted
    pub fn list(&self) -> Vec<String> {
        let mut paths: Vec<String> = EmbeddedTemplates::iter().map(|p| p.to_string()).collect();
        paths.sort();
        paths
    }

    fn file(path: &str) -> Option<RawTemplateFile> {
        EmbeddedTemplates::get(path).map(|file| RawTemplateFile {
            relative_path: base_name(path).to_string(),
            contents: file.data.to_vec(),
        })
    }
}

impl Default for EmbeddedTemplateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateRepository for EmbeddedTemplateRepository {
    async fn resolve(&self, name: &str) -> Result<TemplateEntry> {
        let name = normalize_name(name);

        if let Some(file) = Self::file(name) {
            return Ok(TemplateEntry::File(file));
        }
        if let Some(file) = Self::file(&format!("{name}{TEMPLATE_SUFFIX}")) {
            return Ok(TemplateEntry::File(file));
        }

        let prefix = format!("{name}/");
        let mut files: Vec<RawTemplateFile> = EmbeddedTemplates::iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(&prefix)?.to_string();
                EmbeddedTemplates::get(&path).map(|file| RawTemplateFile {
                    relative_path: relative,
                    contents: file.data.to_vec(),
                })
            })
            .collect();

        if files.is_empty() {
            return Err(Error::template_not_found(name));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(template = %name, files = files.len(), "Resolved embedded template directory");
        Ok(TemplateEntry::Directory(files))
    }

    fn describe(&self) -> String {
        format!("embedded templates ({} files)", self.list().len())
    }
}
