use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use directories_next::BaseDirs;

use crate::fs_op::error::{FsOpError, Result};

/// Normalize a user-supplied path.
///
/// Behaviour:
/// - A leading `~` (alone or followed by a separator) is expanded to the
///   user's home directory. `~user` forms are left as typed.
/// - Relative paths are made absolute against the current directory and
///   `.`/`..` components are folded.
/// - Symlinks are resolved on the longest prefix that exists; the rest of
///   the path is appended unchanged, so the target need not exist yet.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let raw = path.as_ref();
    let fail = |reason: String| FsOpError::PathNormalize {
        path: raw.display().to_string(),
        reason,
    };

    let expanded = expand_tilde(raw).ok_or_else(|| fail("could not determine home directory".into()))?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| fail(e.to_string()))?;
        cwd.join(expanded)
    };
    resolve_existing_prefix(&lexical_normalize(&absolute)).map_err(|e| fail(e.to_string()))
}

/// Join `path` onto `root`. Absolute `path`s replace the root, as with
/// `Path::join`.
pub fn resolve_under<P: AsRef<Path>>(root: &Path, path: P) -> PathBuf {
    root.join(path)
}

// Expand a leading `~` into the home directory. Returns `None` when the
// path needs expansion but no home directory can be determined.
fn expand_tilde(input: &Path) -> Option<PathBuf> {
    let mut comps = input.components();
    match comps.next() {
        Some(Component::Normal(first)) if first == OsStr::new("~") => {
            let dirs = BaseDirs::new()?;
            let mut p = dirs.home_dir().to_path_buf();
            p.extend(comps);
            Some(p)
        }
        _ => Some(input.to_path_buf()),
    }
}

// Fold `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn resolve_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut tail: Vec<OsString> = Vec::new();
    loop {
        match fs::canonicalize(&existing) {
            Ok(mut resolved) => {
                resolved.extend(tail.iter().rev());
                return Ok(resolved);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        tail.push(name.to_os_string());
                        existing = parent.to_path_buf();
                    }
                    // Nothing on the path exists, not even the root.
                    _ => return Ok(path.to_path_buf()),
                }
            }
            Err(e) => return Err(e),
        }
    }
}
