//! Filesystem mutation helpers for the destination tree

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::error::{Error, Result};

/// Replace `path` with `contents` through a sibling temporary file and a rename,
/// so readers never observe a partially written file.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::config(format!("Not a file path: {}", path.display())))?;
    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".enginex-tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)
        .await
        .map_err(|e| Error::write(&temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(Error::write(path, e));
    }
    Ok(())
}

/// Remove each relative path below `root`, files and directories alike.
///
/// Missing paths are skipped. Returns the paths that were actually removed.
pub async fn remove_paths(root: &Path, relative: &[&str]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for entry in relative {
        let path = root.join(entry);
        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Nothing to remove");
                continue;
            }
            Err(e) => return Err(Error::write(&path, e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        result.map_err(|e| Error::write(&path, e))?;

        tracing::debug!(path = %path.display(), "Removed");
        removed.push(path);
    }

    Ok(removed)
}
