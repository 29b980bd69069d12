//! File listing with optional extension filter and recursion.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::fs_op::error::{FsOpError, Result};

/// List files inside `dir`.
///
/// - `extension` filters on the file extension; a leading dot is ignored so
///   `"py"` and `".py"` are equivalent. `None` keeps every file.
/// - `recursive` descends into subdirectories (directory symlinks are not
///   followed); otherwise only immediate children are returned.
///
/// Symlinks pointing at regular files are listed like the files themselves.
/// Results are sorted by path.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: Option<&str>, recursive: bool) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(FsOpError::DirectoryNotFound(dir.to_path_buf()));
    }
    let wanted = extension.map(|e| e.trim_start_matches('.'));

    let candidates: Vec<PathBuf> = if recursive {
        WalkDir::new(dir)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| FsOpError::Io(e.into()))?
            .into_iter()
            .map(|e| e.into_path())
            .collect()
    } else {
        fs::read_dir(dir)?
            .map(|e| e.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?
    };

    let mut files: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|p| p.is_file() && matches_extension(p, wanted))
        .collect();
    files.sort();
    debug!("Listed {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}

fn matches_extension(path: &Path, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(ext) => path.extension().is_some_and(|e| e == ext),
    }
}
