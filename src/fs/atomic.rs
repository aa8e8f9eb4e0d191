//! Atomic file writes.
//!
//! Content goes to a sibling `.{filename}.tmp` file, is synced to disk, and is
//! then renamed over the target, so a crash never leaves a half-written
//! template behind. The rename is only atomic when the temporary file and the
//! target share a filesystem, which holds because they share a directory.

use crate::error::{PromptError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write `content` to `path`, creating parent directories.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            PromptError::io(
                format!("failed to create directory '{}'", parent.display()),
                e,
            )
        })?;
    }

    let temp_path = temp_path_for(path)?;
    if let Err(e) = write_synced(&temp_path, content.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(PromptError::io(
            format!("failed to write '{}'", temp_path.display()),
            e,
        ));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(PromptError::io(
            format!("failed to replace '{}'", path.display()),
            e,
        ));
    }

    sync_parent(path);
    Ok(())
}

/// Write `content` to `path` unless something already exists there.
///
/// Returns `true` when the file was written.
pub fn write_if_absent<P: AsRef<Path>>(path: P, content: &str) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    atomic_write_file(path, content)?;
    Ok(true)
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            PromptError::configuration(format!("invalid file path: {}", target.display()))
        })?;
    Ok(target.with_file_name(format!(".{}.tmp", file_name)))
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Persist the directory entry; best effort, not every platform supports it.
#[cfg(unix)]
fn sync_parent(path: &Path) {
    if let Some(dir) = path.parent().and_then(|p| File::open(p).ok()) {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}
