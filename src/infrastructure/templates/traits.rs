//! Template repository port

use async_trait::async_trait;

use super::types::TemplateEntry;
use crate::core::error::Result;

/// Resolves a template name to a single file or a directory of files.
///
/// For a name `n`, a file `n` wins over a file `n.tera`, which wins over a
/// directory `n/`. Unknown names fail with `TemplateNotFound`.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<TemplateEntry>;

    /// Short description used in logs
    fn describe(&self) -> String;
}

/// Final `/`-separated segment of a template name
pub(crate) fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Template names are `/`-separated and never start or end with a separator
pub(crate) fn normalize_name(name: &str) -> &str {
    name.trim_matches('/')
}
