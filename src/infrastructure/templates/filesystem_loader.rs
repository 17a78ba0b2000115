//! Filesystem-based template repository
//!
//! Loads templates from a directory on disk, typically specified via the
//! `--template-dir` CLI flag or `ENGINEX_TEMPLATE_DIR`. The layout mirrors the
//! embedded templates.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::traits::{TemplateRepository, base_name, normalize_name};
use super::types::{RawTemplateFile, TEMPLATE_SUFFIX, TemplateEntry};
use crate::core::error::{Error, Result};

/// Template repository rooted at a directory
pub struct FileSystemTemplateLoader {
    root: PathBuf,
}

impl FileSystemTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read_file(path: &Path, relative_path: String) -> Result<RawTemplateFile> {
        let contents = fs::read(path).await?;
        Ok(RawTemplateFile {
            relative_path,
            contents,
        })
    }
}

#[async_trait]
impl TemplateRepository for FileSystemTemplateLoader {
    async fn resolve(&self, name: &str) -> Result<TemplateEntry> {
        let name = normalize_name(name);
        let path = self.root.join(name);

        if fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            let file = Self::read_file(&path, base_name(name).to_string()).await?;
            return Ok(TemplateEntry::File(file));
        }

        let rendered = self.root.join(format!("{name}{TEMPLATE_SUFFIX}"));
        if fs::metadata(&rendered).await.map(|m| m.is_file()).unwrap_or(false) {
            let relative = format!("{}{TEMPLATE_SUFFIX}", base_name(name));
            let file = Self::read_file(&rendered, relative).await?;
            return Ok(TemplateEntry::File(file));
        }

        if !fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(Error::template_not_found(path.display().to_string()));
        }

        let files = load_tree(&path).await?;
        if files.is_empty() {
            return Err(Error::template_not_found(path.display().to_string()));
        }
        Ok(TemplateEntry::Directory(files))
    }

    fn describe(&self) -> String {
        format!("templates at {}", self.root.display())
    }
}

/// Every regular file below `dir`, with `/`-separated relative paths, sorted
async fn load_tree(dir: &Path) -> Result<Vec<RawTemplateFile>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let relative = path
                    .strip_prefix(dir)
                    .map_err(|e| Error::config(e.to_string()))?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push(FileSystemTemplateLoader::read_file(&path, relative).await?);
            }
        }
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}
