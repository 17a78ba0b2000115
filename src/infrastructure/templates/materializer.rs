//! Template materializer: copies or renders templates into the destination tree

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::Tera;
use tokio::fs;
use tracing::{debug, info};

use super::traits::TemplateRepository;
use super::types::{RawTemplateFile, RenderContext, TemplateEntry};
use crate::core::error::{Error, Result};

/// What happened to one destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// Existing content was already identical
    Identical,
}

/// Tera-backed materializer over a template repository.
///
/// Files ending in `.tera` are rendered and lose the suffix, anything else is
/// copied byte for byte. Path segments containing `{{` are rendered too.
pub struct TemplateMaterializer {
    repository: Arc<dyn TemplateRepository>,
}

impl TemplateMaterializer {
    pub fn new(repository: Arc<dyn TemplateRepository>) -> Self {
        Self { repository }
    }

    /// Materialize the template `name` at `destination`.
    ///
    /// A directory template is copied recursively below `destination`; a single
    /// file template is written to `destination` itself. Without `force`, an
    /// existing file with different content is a `Conflict`. Returns the written
    /// paths in template order.
    pub async fn materialize(
        &self,
        name: &str,
        destination: &Path,
        force: bool,
        context: &RenderContext,
    ) -> Result<Vec<(PathBuf, WriteOutcome)>> {
        let entry = self.repository.resolve(name).await?;
        let tera_context = context.to_tera_context();

        let mut written = Vec::new();
        match entry {
            TemplateEntry::File(file) => {
                let contents = render_contents(&file, &tera_context)?;
                let outcome = write_file(destination, &contents, force).await?;
                written.push((destination.to_path_buf(), outcome));
            }
            TemplateEntry::Directory(files) => {
                for file in &files {
                    let relative = render_path(file.output_path(), &tera_context)?;
                    let target = destination.join(relative);
                    let contents = render_contents(file, &tera_context)?;
                    let outcome = write_file(&target, &contents, force).await?;
                    written.push((target, outcome));
                }
            }
        }

        info!(
            template = %name,
            destination = %destination.display(),
            files = written.len(),
            "Materialized template"
        );
        Ok(written)
    }
}

fn render_contents(file: &RawTemplateFile, context: &tera::Context) -> Result<Vec<u8>> {
    if !file.is_rendered() {
        return Ok(file.contents.clone());
    }

    let source = std::str::from_utf8(&file.contents).map_err(|e| {
        Error::Render(tera::Error::msg(format!(
            "Template '{}' is not valid UTF-8: {e}",
            file.relative_path
        )))
    })?;

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(&file.relative_path, source)?;
    Ok(tera.render(&file.relative_path, context)?.into_bytes())
}

fn render_path(path: &str, context: &tera::Context) -> Result<PathBuf> {
    if !path.contains("{{") {
        return Ok(PathBuf::from(path));
    }
    let rendered = Tera::one_off(path, context, false)?;
    Ok(PathBuf::from(rendered))
}

async fn write_file(path: &Path, contents: &[u8], force: bool) -> Result<WriteOutcome> {
    let existing = match fs::read(path).await {
        Ok(existing) => Some(existing),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(Error::write(path, e)),
    };

    let outcome = match existing {
        Some(existing) if existing == contents => {
            debug!(path = %path.display(), "Identical, skipping");
            return Ok(WriteOutcome::Identical);
        }
        Some(_) if !force => return Err(Error::Conflict { path: path.to_path_buf() }),
        Some(_) => WriteOutcome::Overwritten,
        None => WriteOutcome::Created,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::write(parent, e))?;
    }
    fs::write(path, contents)
        .await
        .map_err(|e| Error::write(path, e))?;

    debug!(path = %path.display(), ?outcome, "Wrote file");
    Ok(outcome)
}
