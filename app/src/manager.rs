//! `FileManager`: one entry point rooted at a normalized directory.
//!
//! Every method joins its path argument onto the root and delegates to the
//! matching helper in [`crate::fs_op`] or [`crate::tree`].

use std::path::{Path, PathBuf};

use crate::fs_op::error::Result;
use crate::fs_op::{self, AuditReport, FolderOptions, Mode, PermissionInfo};
use crate::tree::{self, TreeOptions, TreeRender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileManager {
    root: PathBuf,
}

impl FileManager {
    /// Create a manager rooted at `root` after normalizing it.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Ok(FileManager {
            root: fs_op::normalize_path(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute form of `path` under this manager's root.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        fs_op::resolve_under(&self.root, path)
    }

    pub fn create_folder<P: AsRef<Path>>(&self, name: P, opts: &FolderOptions) -> Result<()> {
        fs_op::create_folder(self.resolve(name), opts)
    }

    /// Create an empty file, under `sub_folder` when given.
    pub fn create_file<P: AsRef<Path>>(&self, file: P, sub_folder: Option<&Path>) -> Result<()> {
        let base = match sub_folder {
            Some(sub) => self.resolve(sub),
            None => self.root.clone(),
        };
        fs_op::create_file(base.join(file))
    }

    pub fn list_files<P: AsRef<Path>>(&self, dir: P, extension: Option<&str>, recursive: bool) -> Result<Vec<PathBuf>> {
        fs_op::list_files(self.resolve(dir), extension, recursive)
    }

    pub fn get_permissions<P: AsRef<Path>>(&self, path: P) -> Result<Mode> {
        fs_op::get_permissions(self.resolve(path))
    }

    pub fn inspect_permissions<P: AsRef<Path>>(&self, path: P) -> Result<PermissionInfo> {
        fs_op::inspect_permissions(self.resolve(path))
    }

    pub fn audit_permissions<P: AsRef<Path>>(&self, dir: P, target: Mode, follow_symlinks: bool) -> Result<AuditReport> {
        fs_op::audit_permissions(self.resolve(dir), target, follow_symlinks)
    }

    pub fn render_tree<P: AsRef<Path>>(
        &self,
        dir: P,
        opts: &TreeOptions,
        post_process: Option<&dyn Fn(&str) -> String>,
    ) -> Result<TreeRender> {
        tree::render_tree(&self.resolve(dir), opts, post_process)
    }
}
