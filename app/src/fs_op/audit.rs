//! Recursive normalization of directory permission bits.
//!
//! The root and every directory below it are compared against a target
//! mode and rewritten when they differ. Plain files are left alone.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::permissions::{change_permissions, mode_of, Mode};

/// A single rewritten path together with the mode it had before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub path: PathBuf,
    pub previous: Mode,
}

/// Outcome of [`audit_permissions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Nodes whose permissions were read.
    pub visited: usize,
    /// Nodes whose permissions were rewritten, in visit order.
    pub corrected: Vec<Correction>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.corrected.is_empty()
    }
}

/// Walk `root` pre-order and set every directory's permissions to `target`.
///
/// A missing `root` (including a dangling link) is a no-op; any other
/// failure to stat it is an error. Each node is corrected before its
/// children are listed, so a directory that was unreadable under its old
/// mode can still be descended into. The first failure aborts the walk;
/// nodes already visited keep their new mode.
///
/// `follow_symlinks` only picks which bits are compared: the link target's
/// or the link's own. Writes and traversal always go through the link, and
/// every resolved directory is visited at most once so link cycles
/// terminate.
pub fn audit_permissions<P: AsRef<Path>>(root: P, target: Mode, follow_symlinks: bool) -> Result<AuditReport> {
    let root = root.as_ref();
    match fs::metadata(root) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Audit root {} does not exist, nothing to do", root.display());
            return Ok(AuditReport::default());
        }
        Err(e) => return Err(permission_error(root, e)),
    }

    let mut walk = Walk {
        target,
        follow_symlinks,
        seen: HashSet::new(),
        report: AuditReport::default(),
    };
    walk.visit(root)?;
    Ok(walk.report)
}

struct Walk {
    target: Mode,
    follow_symlinks: bool,
    seen: HashSet<PathBuf>,
    report: AuditReport,
}

impl Walk {
    fn visit(&mut self, path: &Path) -> Result<()> {
        let resolved = fs::canonicalize(path).map_err(|e| permission_error(path, e))?;
        if !self.seen.insert(resolved) {
            debug!("Already audited {}, skipping", path.display());
            return Ok(());
        }

        self.check_and_correct(path)?;

        for child in self.child_dirs(path)? {
            self.visit(&child)?;
        }
        Ok(())
    }

    fn check_and_correct(&mut self, path: &Path) -> Result<()> {
        let meta = if self.follow_symlinks {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        }
        .map_err(|e| permission_error(path, e))?;
        self.report.visited += 1;

        let current = mode_of(&meta);
        if current != self.target {
            change_permissions(path, self.target).map_err(|e| permission_error(path, e))?;
            info!(
                "Permissions corrected: '{}': {:o} -> {:o}",
                path.display(),
                current,
                self.target
            );
            self.report.corrected.push(Correction {
                path: path.to_path_buf(),
                previous: current,
            });
        }
        Ok(())
    }

    fn child_dirs(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let traversal = |e: io::Error| permission_error(path, e);
        if !fs::metadata(path).map_err(traversal)?.is_dir() {
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(path).map_err(traversal)? {
            let entry = entry.map_err(traversal)?;
            let ft = entry.file_type().map_err(traversal)?;
            // Dangling links are not directories.
            if ft.is_dir() || (ft.is_symlink() && entry.path().is_dir()) {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

fn permission_error(path: &Path, source: io::Error) -> FsOpError {
    FsOpError::Permission {
        path: path.to_path_buf(),
        source,
    }
}
