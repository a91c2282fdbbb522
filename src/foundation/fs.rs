use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::YardResult;

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> YardResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `path` has one of `exts` as its extension (case-insensitive, no dot).
pub fn has_extension(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Regular files directly inside `dir` whose extension is in `exts`, sorted by file name.
pub fn list_files_with_extensions(dir: &Path, exts: &[&str]) -> YardResult<Vec<PathBuf>> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("cannot list directory contents of '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, exts) {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

/// Move a file, falling back to copy + remove when `rename` cannot cross filesystems.
pub fn move_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    match std::fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !src.is_file() {
                return Err(rename_err);
            }
            std::fs::copy(src, dst)?;
            std::fs::remove_file(src)
        }
    }
}
