//! Literal, line-oriented edits of already materialized files
//!
//! Each file operation reads the whole file, edits it in memory and writes it
//! back atomically. Tokens are literal strings, never regular expressions.

use std::path::Path;
use tokio::fs;

use super::filesystem_output::write_atomic;
use crate::core::error::{Error, Result};

/// Replace every literal occurrence of `token`
pub fn replace_all(content: &str, token: &str, replacement: &str) -> String {
    if token.is_empty() {
        return content.to_string();
    }
    content.replace(token, replacement)
}

/// Drop every line containing `token`, keeping the other lines' endings
pub fn remove_lines_containing(content: &str, token: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| !line.contains(token))
        .collect()
}

/// Insert `text` right after the first line exactly equal to `anchor`.
///
/// Only the line terminator (`\n` or `\r\n`) is ignored when comparing. Returns
/// `None` when no line matches.
pub fn insert_after_anchor(content: &str, anchor: &str, text: &str) -> Option<String> {
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        offset += line.len();
        let bare = line.strip_suffix('\n').unwrap_or(line);
        if bare.strip_suffix('\r').unwrap_or(bare) != anchor {
            continue;
        }

        let mut patched = String::with_capacity(content.len() + text.len() + 2);
        patched.push_str(&content[..offset]);
        if !line.ends_with('\n') {
            patched.push('\n');
        }
        patched.push_str(text);
        if !text.ends_with('\n') && offset < content.len() {
            patched.push('\n');
        }
        patched.push_str(&content[offset..]);
        return Some(patched);
    }
    None
}

/// File-level patch operations
pub struct ContentPatcher;

impl ContentPatcher {
    /// Returns whether the file changed; an absent token is a no-op
    pub async fn replace_all(path: &Path, token: &str, replacement: &str) -> Result<bool> {
        Self::edit(path, |content| Ok(replace_all(content, token, replacement))).await
    }

    pub async fn remove_lines_containing(path: &Path, token: &str) -> Result<bool> {
        Self::edit(path, |content| Ok(remove_lines_containing(content, token))).await
    }

    /// Fails with `AnchorNotFound` if no line matches `anchor`
    pub async fn insert_after_anchor(path: &Path, anchor: &str, text: &str) -> Result<bool> {
        Self::edit(path, |content| {
            insert_after_anchor(content, anchor, text).ok_or_else(|| Error::AnchorNotFound {
                path: path.to_path_buf(),
                anchor: anchor.to_string(),
            })
        })
        .await
    }

    async fn edit<F>(path: &Path, edit: F) -> Result<bool>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let content = fs::read_to_string(path).await?;
        let patched = edit(&content)?;
        if patched == content {
            return Ok(false);
        }
        write_atomic(path, patched.as_bytes()).await?;
        tracing::debug!(path = %path.display(), "Patched file");
        Ok(true)
    }
}

/// Edit of a dependency manifest: an optional insertion after an anchor line,
/// then an optional removal of matching lines, applied in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GemfileEdit {
    pub insert_after: Option<(String, String)>,
    pub remove_lines_containing: Option<String>,
}

impl GemfileEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_after(mut self, anchor: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_after = Some((anchor.into(), text.into()));
        self
    }

    pub fn remove_lines_containing(mut self, token: impl Into<String>) -> Self {
        self.remove_lines_containing = Some(token.into());
        self
    }

    pub fn apply_to(&self, content: &str, path: &Path) -> Result<String> {
        let mut content = content.to_string();
        if let Some((anchor, text)) = &self.insert_after {
            content = insert_after_anchor(&content, anchor, text).ok_or_else(|| {
                Error::AnchorNotFound {
                    path: path.to_path_buf(),
                    anchor: anchor.clone(),
                }
            })?;
        }
        if let Some(token) = &self.remove_lines_containing {
            content = remove_lines_containing(&content, token);
        }
        Ok(content)
    }

    pub async fn apply(&self, path: &Path) -> Result<bool> {
        ContentPatcher::edit(path, |content| self.apply_to(content, path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GEMFILE: &str = "source 'https://rubygems.org'\n\ngem \"rails\"\ngem \"sqlite3\"\ngem \"puma\"\n";

    #[test]
    fn test_replace_all_is_literal() {
        assert_eq!(replace_all("a.b a.b axb", "a.b", "#"), "# # axb");
        assert_eq!(replace_all("nothing here", "#orm#", "mongoid"), "nothing here");
    }

    #[test]
    fn test_replace_all_is_idempotent() {
        let once = replace_all("describe '#orm#' do # #orm#", "#orm#", "mongoid");
        let twice = replace_all(&once, "#orm#", "mongoid");
        assert_eq!(once, twice);
        assert_eq!(once, "describe 'mongoid' do # mongoid");
    }

    #[test]
    fn test_remove_lines_without_match_is_noop() {
        assert_eq!(remove_lines_containing(GEMFILE, "mongoid"), GEMFILE);
    }

    #[test]
    fn test_remove_lines_containing() {
        assert_eq!(
            remove_lines_containing(GEMFILE, "sqlite3"),
            "source 'https://rubygems.org'\n\ngem \"rails\"\ngem \"puma\"\n"
        );
        assert_eq!(remove_lines_containing("a\nb", "b"), "a\n");
    }

    #[test]
    fn test_insert_after_anchor() {
        let patched = insert_after_anchor(GEMFILE, "gem \"rails\"", "gem \"devise\"").unwrap();
        assert_eq!(
            patched,
            "source 'https://rubygems.org'\n\ngem \"rails\"\ngem \"devise\"\ngem \"sqlite3\"\ngem \"puma\"\n"
        );
    }

    #[test]
    fn test_insert_after_last_line_without_newline() {
        assert_eq!(
            insert_after_anchor("gem \"rails\"", "gem \"rails\"", "gem \"pg\"\n").unwrap(),
            "gem \"rails\"\ngem \"pg\"\n"
        );
    }

    #[test]
    fn test_insert_requires_exact_line() {
        assert!(insert_after_anchor(GEMFILE, "gem \"sqlite\"", "x").is_none());
        assert!(insert_after_anchor("  gem \"sqlite3\"  \n", "gem \"sqlite3\"", "x").is_none());
        assert_eq!(
            insert_after_anchor("gem \"sqlite3\"\r\nend\n", "gem \"sqlite3\"", "x\n").unwrap(),
            "gem \"sqlite3\"\r\nx\nend\n"
        );
    }

    #[test]
    fn test_gemfile_edit_swaps_sqlite_for_mongoid() {
        let edit = GemfileEdit::new()
            .insert_after("gem \"sqlite3\"", "gem \"mongoid\"\ngem \"bson_ext\"\n")
            .remove_lines_containing("gem \"sqlite3\"");

        let patched = edit.apply_to(GEMFILE, Path::new("Gemfile")).unwrap();
        assert_eq!(
            patched,
            "source 'https://rubygems.org'\n\ngem \"rails\"\ngem \"mongoid\"\ngem \"bson_ext\"\ngem \"puma\"\n"
        );
    }

    #[tokio::test]
    async fn test_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Gemfile");
        std::fs::write(&path, GEMFILE).unwrap();

        assert!(!ContentPatcher::replace_all(&path, "#orm#", "x").await.unwrap());
        assert!(ContentPatcher::remove_lines_containing(&path, "puma").await.unwrap());
        assert!(
            ContentPatcher::insert_after_anchor(&path, "gem \"rails\"", "gem \"pg\"\n")
                .await
                .unwrap()
        );

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "source 'https://rubygems.org'\n\ngem \"rails\"\ngem \"pg\"\ngem \"sqlite3\"\n"
        );
    }

    #[tokio::test]
    async fn test_missing_anchor_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Gemfile");
        std::fs::write(&path, GEMFILE).unwrap();

        let err = ContentPatcher::insert_after_anchor(&path, "gem \"mysql2\"", "x")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AnchorNotFound { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), GEMFILE);
    }
}
