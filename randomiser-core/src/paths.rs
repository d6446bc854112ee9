use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{RandomiserError, Result};

/// Recursively lists every regular file under `input_root/dir`, returning
/// paths relative to `input_root`.
///
/// Entries are visited depth-first in file-name order, so the result is
/// identical from run to run and a companion such as `stone.png.mcmeta`
/// directly follows `stone.png`, unless a sibling such as `stone.png-old.png`
/// sorts between them (byte order puts `-` before `.`).
pub fn collect_file_paths(input_root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    let start = input_root.join(dir);
    let mut paths = Vec::new();

    for entry in WalkDir::new(&start).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(input_root).map_err(|_| {
            RandomiserError::Config(format!(
                "{} is not below input root {}",
                entry.path().display(),
                input_root.display()
            ))
        })?;
        paths.push(relative.to_path_buf());
    }

    tracing::debug!(dir = %dir.display(), files = paths.len(), "collected file paths");
    Ok(paths)
}

/// Lists the immediate child directories of `input_root/dir`, sorted by
/// name and relative to `input_root`.
pub fn list_subdirectories(input_root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(input_root.join(dir))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name());
        }
    }
    names.sort();

    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}
