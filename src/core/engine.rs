//! The engine being scaffolded and its derived names

use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::utils::{to_camel_case, to_snake_case};

/// Engine identified by its absolute destination root.
///
/// Name forms are computed once here, after the root is fixed, and never change
/// for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    root: PathBuf,
    name: String,
    camelized: String,
    underscored: String,
}

impl Engine {
    /// Fix the destination root, resolving relative paths against `base`
    pub fn new(path: impl AsRef<Path>, base: &Path) -> Result<Self> {
        let path = path.as_ref();
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };
        let root = normalize(&root);

        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "Cannot derive an engine name from '{}'",
                    path.display()
                ))
            })?;

        Ok(Self {
            camelized: to_camel_case(&name),
            underscored: to_snake_case(&name),
            root,
            name,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn camelized(&self) -> &str {
        &self.camelized
    }

    pub fn underscored(&self) -> &str {
        &self.underscored
    }
}

/// Lexically drop `.` segments and fold `..` segments
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_names_from_relative_path() {
        let engine = Engine::new("work/my-engine", Path::new("/home/dev")).unwrap();
        assert_eq!(engine.root(), Path::new("/home/dev/work/my-engine"));
        assert_eq!(engine.name(), "my-engine");
        assert_eq!(engine.camelized(), "MyEngine");
        assert_eq!(engine.underscored(), "my_engine");
    }

    #[test]
    fn test_engine_absolute_path_ignores_base() {
        let engine = Engine::new("/srv/engines/./BlogEngine", Path::new("/ignored")).unwrap();
        assert_eq!(engine.root(), Path::new("/srv/engines/BlogEngine"));
        assert_eq!(engine.underscored(), "blog_engine");
        assert_eq!(engine.camelized(), "BlogEngine");
    }

    #[test]
    fn test_engine_trailing_parent_segment() {
        let engine = Engine::new("blog/..", Path::new("/home/dev")).unwrap();
        assert_eq!(engine.name(), "dev");
    }

    #[test]
    fn test_engine_rejects_nameless_root() {
        assert!(Engine::new("/", Path::new("/")).is_err());
    }
}
